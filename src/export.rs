//! Project export - composes the repository, the compositor, and the
//! document-writing collaborator into a paginated document.
//!
//! The codec and writer are capability traits so the export logic stays
//! testable without a real raster decoder or PDF library. Unlike the model
//! import batch, export fails fast: one undecodable image aborts the whole
//! run, because a partially-correct document is worse than no document.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::fs;
use std::path::Path;

use crate::error::{HyugaError, HyugaResult};
use crate::layout::{
    fit_to_page, fit_to_region, split_page_vertically, Placement, A4_HEIGHT_PT, A4_WIDTH_PT,
    DEFAULT_MARGIN_PT,
};
use crate::models::SENTINEL_REFERENCE;
use crate::projects::{AssetMetadata, ProjectRepository};

/// Gap between the model and cutout regions on a split page.
pub const SPLIT_GAP_PT: f64 = 18.0;

/// Share of the content height given to the model image on a split page.
pub const MODEL_TOP_FRACTION: f64 = 0.5;

/// Decodes encoded image bytes into pixel dimensions.
pub trait ImageCodec {
    fn decode_dimensions(&self, bytes: &[u8]) -> HyugaResult<(u32, u32)>;
}

/// Receives ordered draw instructions and materializes the document.
pub trait DocumentWriter {
    fn begin_page(&mut self, width: f64, height: f64) -> HyugaResult<()>;
    fn draw_image(&mut self, bytes: &[u8], placement: &Placement) -> HyugaResult<()>;
    fn save(&mut self, output: &Path) -> HyugaResult<()>;
}

/// Per-asset page policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutPolicy {
    /// One full-bleed page per asset, drawing the cutout image.
    #[default]
    FullPage,
    /// A full-page sheet followed by a split page: model above, cutout below.
    SheetAndDetail,
}

/// Resolve an asset image value into raw encoded bytes.
///
/// A value is either an inline base64 payload (optionally wrapped in a
/// `data:<mime>;base64,` marker) or a filesystem path, typically into the
/// model store. Empty values and the catalog sentinel resolve to `None`.
pub fn resolve_image_value(value: &str) -> HyugaResult<Option<Vec<u8>>> {
    let value = value.trim();
    if value.is_empty() || value == SENTINEL_REFERENCE {
        return Ok(None);
    }
    if let Some(rest) = strip_data_url_prefix(value) {
        return Ok(Some(decode_base64(rest)?));
    }
    if fs::metadata(value).is_ok() {
        return Ok(Some(fs::read(value)?));
    }
    Ok(Some(decode_base64(value)?))
}

fn strip_data_url_prefix(value: &str) -> Option<&str> {
    if !value.starts_with("data:") {
        return None;
    }
    let idx = value.find("base64,")?;
    Some(&value[idx + "base64,".len()..])
}

fn decode_base64(payload: &str) -> HyugaResult<Vec<u8>> {
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(STANDARD.decode(compact)?)
}

struct PlannedImage {
    bytes: Vec<u8>,
    placement: Placement,
}

struct PlannedPage {
    images: Vec<PlannedImage>,
}

/// Export a project to `output` in asset order.
///
/// The full page plan is computed before anything is handed to the writer,
/// so a decode failure anywhere leaves no output behind.
pub fn export_project(
    repo: &ProjectRepository,
    project_id: &str,
    policy: LayoutPolicy,
    codec: &dyn ImageCodec,
    writer: &mut dyn DocumentWriter,
    output: &Path,
) -> HyugaResult<()> {
    if project_id.is_empty() {
        return Err(HyugaError::InvalidArgument("project id is required".into()));
    }
    let project = repo.load(project_id)?;

    let mut pages = Vec::new();
    for asset in &project.assets {
        plan_asset_pages(asset, policy, codec, &mut pages)?;
    }

    for page in &pages {
        writer.begin_page(A4_WIDTH_PT, A4_HEIGHT_PT)?;
        for image in &page.images {
            writer.draw_image(&image.bytes, &image.placement)?;
        }
    }
    writer.save(output)
}

fn plan_asset_pages(
    asset: &AssetMetadata,
    policy: LayoutPolicy,
    codec: &dyn ImageCodec,
    pages: &mut Vec<PlannedPage>,
) -> HyugaResult<()> {
    match policy {
        LayoutPolicy::FullPage => {
            if let Some(image) = plan_full_page(&asset.cutout, codec)? {
                pages.push(PlannedPage { images: vec![image] });
            }
            Ok(())
        }
        LayoutPolicy::SheetAndDetail => {
            if let Some(image) = plan_full_page(&asset.sheet, codec)? {
                pages.push(PlannedPage { images: vec![image] });
            }
            let model = resolve_decoded(&asset.model, codec)?;
            let cutout = resolve_decoded(&asset.cutout, codec)?;
            match (model, cutout) {
                (Some((model_bytes, mw, mh)), Some((cut_bytes, cw, ch))) => {
                    let (top, bottom) = split_page_vertically(
                        A4_WIDTH_PT,
                        A4_HEIGHT_PT,
                        DEFAULT_MARGIN_PT,
                        SPLIT_GAP_PT,
                        MODEL_TOP_FRACTION,
                    );
                    pages.push(PlannedPage {
                        images: vec![
                            PlannedImage {
                                bytes: model_bytes,
                                placement: fit_to_region(mw as i64, mh as i64, top, 0.0),
                            },
                            PlannedImage {
                                bytes: cut_bytes,
                                placement: fit_to_region(cw as i64, ch as i64, bottom, 0.0),
                            },
                        ],
                    });
                }
                (None, Some((cut_bytes, cw, ch))) => {
                    // No model: the cutout gets the whole page.
                    pages.push(PlannedPage {
                        images: vec![PlannedImage {
                            bytes: cut_bytes,
                            placement: fit_to_page(
                                cw as i64,
                                ch as i64,
                                A4_WIDTH_PT,
                                A4_HEIGHT_PT,
                                DEFAULT_MARGIN_PT,
                            ),
                        }],
                    });
                }
                _ => {}
            }
            Ok(())
        }
    }
}

fn plan_full_page(value: &str, codec: &dyn ImageCodec) -> HyugaResult<Option<PlannedImage>> {
    let Some((bytes, w, h)) = resolve_decoded(value, codec)? else {
        return Ok(None);
    };
    let placement = fit_to_page(w as i64, h as i64, A4_WIDTH_PT, A4_HEIGHT_PT, DEFAULT_MARGIN_PT);
    Ok(Some(PlannedImage { bytes, placement }))
}

fn resolve_decoded(
    value: &str,
    codec: &dyn ImageCodec,
) -> HyugaResult<Option<(Vec<u8>, u32, u32)>> {
    let Some(bytes) = resolve_image_value(value)? else {
        return Ok(None);
    };
    let (w, h) = codec.decode_dimensions(&bytes)?;
    Ok(Some((bytes, w, h)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::NameGenerator;
    use crate::projects::AppendOutcome;
    use tempfile::tempdir;

    struct FixedName;
    impl NameGenerator for FixedName {
        fn generate(&self) -> String {
            "test-project".into()
        }
    }

    /// Pretends every payload is a 100x50 image.
    struct StubCodec;
    impl ImageCodec for StubCodec {
        fn decode_dimensions(&self, bytes: &[u8]) -> HyugaResult<(u32, u32)> {
            if bytes.is_empty() {
                return Err(HyugaError::InvalidArgument("empty image".into()));
            }
            Ok((100, 50))
        }
    }

    #[derive(Default)]
    struct RecordingWriter {
        pages: Vec<Vec<Placement>>,
        saved: bool,
    }
    impl DocumentWriter for RecordingWriter {
        fn begin_page(&mut self, _w: f64, _h: f64) -> HyugaResult<()> {
            self.pages.push(vec![]);
            Ok(())
        }
        fn draw_image(&mut self, _bytes: &[u8], placement: &Placement) -> HyugaResult<()> {
            self.pages
                .last_mut()
                .ok_or_else(|| HyugaError::InvalidArgument("draw before page".into()))?
                .push(*placement);
            Ok(())
        }
        fn save(&mut self, _output: &Path) -> HyugaResult<()> {
            self.saved = true;
            Ok(())
        }
    }

    fn payload() -> String {
        STANDARD.encode(b"image-bytes")
    }

    fn asset(id: &str, model: &str) -> AssetMetadata {
        AssetMetadata {
            id: id.into(),
            sheet: payload(),
            cutout: payload(),
            model: model.into(),
            page_number: "12".into(),
            section: "A".into(),
        }
    }

    #[test]
    fn data_url_prefix_is_stripped() {
        let encoded = format!("data:image/png;base64,{}", payload());
        let bytes = resolve_image_value(&encoded).unwrap().unwrap();
        assert_eq!(bytes, b"image-bytes");
    }

    #[test]
    fn bare_payload_decodes() {
        let bytes = resolve_image_value(&payload()).unwrap().unwrap();
        assert_eq!(bytes, b"image-bytes");
    }

    #[test]
    fn payload_whitespace_is_tolerated() {
        let encoded = payload();
        let (head, tail) = encoded.split_at(4);
        let wrapped = format!("{head}\n{tail}");
        let bytes = resolve_image_value(&wrapped).unwrap().unwrap();
        assert_eq!(bytes, b"image-bytes");
    }

    #[test]
    fn empty_and_sentinel_resolve_to_none() {
        assert!(resolve_image_value("").unwrap().is_none());
        assert!(resolve_image_value("  ").unwrap().is_none());
        assert!(resolve_image_value(SENTINEL_REFERENCE).unwrap().is_none());
    }

    #[test]
    fn path_value_reads_from_disk() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("model.png");
        std::fs::write(&file, b"stored").unwrap();
        let bytes = resolve_image_value(&file.to_string_lossy()).unwrap().unwrap();
        assert_eq!(bytes, b"stored");
    }

    #[test]
    fn full_page_policy_emits_one_page_per_asset() {
        let dir = tempdir().unwrap();
        let repo = ProjectRepository::new(dir.path(), Box::new(FixedName));
        let project = repo.create().unwrap();
        assert_eq!(
            repo.append_asset(&project.id, asset("a1", "")).unwrap(),
            AppendOutcome::Appended
        );
        assert_eq!(
            repo.append_asset(&project.id, asset("a2", "")).unwrap(),
            AppendOutcome::Appended
        );

        let mut writer = RecordingWriter::default();
        export_project(
            &repo,
            &project.id,
            LayoutPolicy::FullPage,
            &StubCodec,
            &mut writer,
            &dir.path().join("out.pdf"),
        )
        .unwrap();

        assert!(writer.saved);
        assert_eq!(writer.pages.len(), 2);
        // 100x50 on A4 with 36pt margins is width-bound.
        let p = writer.pages[0][0];
        assert!((p.w - (A4_WIDTH_PT - 72.0)).abs() < 1e-9);
        assert!((p.h - p.w / 2.0).abs() < 1e-9);
    }

    #[test]
    fn full_page_policy_skips_asset_without_cutout() {
        let dir = tempdir().unwrap();
        let repo = ProjectRepository::new(dir.path(), Box::new(FixedName));
        let project = repo.create().unwrap();
        let mut empty = asset("no-cutout", "");
        empty.cutout = String::new();
        repo.append_asset(&project.id, empty).unwrap();
        repo.append_asset(&project.id, asset("with-cutout", "")).unwrap();

        let mut writer = RecordingWriter::default();
        export_project(
            &repo,
            &project.id,
            LayoutPolicy::FullPage,
            &StubCodec,
            &mut writer,
            &dir.path().join("out.pdf"),
        )
        .unwrap();

        // An asset with no cutout contributes no page; it is a missing
        // image, not a failed decode, so the export still succeeds.
        assert_eq!(writer.pages.len(), 1);
        assert!(writer.saved);
    }

    #[test]
    fn sheet_and_detail_policy_emits_split_page() {
        let dir = tempdir().unwrap();
        let model_file = dir.path().join("model.png");
        std::fs::write(&model_file, b"model-bytes").unwrap();

        let repo = ProjectRepository::new(dir.path(), Box::new(FixedName));
        let project = repo.create().unwrap();
        repo.append_asset(&project.id, asset("a1", &model_file.to_string_lossy()))
            .unwrap();

        let mut writer = RecordingWriter::default();
        export_project(
            &repo,
            &project.id,
            LayoutPolicy::SheetAndDetail,
            &StubCodec,
            &mut writer,
            &dir.path().join("out.pdf"),
        )
        .unwrap();

        // Sheet page plus one split page with two placements.
        assert_eq!(writer.pages.len(), 2);
        assert_eq!(writer.pages[0].len(), 1);
        assert_eq!(writer.pages[1].len(), 2);

        let (top, bottom) = (writer.pages[1][0], writer.pages[1][1]);
        assert!(top.y < bottom.y);
        // Both stay inside the content area.
        assert!(top.y >= DEFAULT_MARGIN_PT);
        assert!(bottom.y + bottom.h <= A4_HEIGHT_PT - DEFAULT_MARGIN_PT + 1e-9);
    }

    #[test]
    fn decode_failure_aborts_whole_export() {
        let dir = tempdir().unwrap();
        let repo = ProjectRepository::new(dir.path(), Box::new(FixedName));
        let project = repo.create().unwrap();
        repo.append_asset(&project.id, asset("good", "")).unwrap();
        let mut bad = asset("bad", "");
        bad.cutout = "%%% not base64 %%%".into();
        repo.append_asset(&project.id, bad).unwrap();

        let mut writer = RecordingWriter::default();
        let result = export_project(
            &repo,
            &project.id,
            LayoutPolicy::FullPage,
            &StubCodec,
            &mut writer,
            &dir.path().join("out.pdf"),
        );

        assert!(result.is_err());
        // Fail-fast: nothing was handed to the writer.
        assert!(writer.pages.is_empty());
        assert!(!writer.saved);
    }
}
