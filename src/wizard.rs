//! Add-asset wizard - glue between the host shell's file dialogs and the
//! project repository.
//!
//! The host dialog is a capability trait so the flow runs in tests without a
//! display: pick a sheet image, pick a cutout image, default the model to the
//! first real catalog entry, guess page/section labels from the filenames,
//! then append the assembled asset.

use log::info;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use uuid::Uuid;

use crate::error::HyugaResult;
use crate::models::{ModelStore, SENTINEL_REFERENCE};
use crate::projects::{AppendOutcome, AssetMetadata, ProjectRepository};

/// Host-shell file picker. `None` means the user canceled.
pub trait ImagePicker {
    fn pick_image(&self, title: &str) -> HyugaResult<Option<PathBuf>>;
}

fn page_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)p(?:ag|age)?[_\-]?(\d{1,4})").ok())
        .as_ref()
}

fn section_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)sec(?:tion)?[_\-]?([A-Za-z]{1,4})").ok())
        .as_ref()
}

/// Guess page and section labels from the two filenames; first match wins,
/// sections are uppercased. Misses yield empty labels the user edits later.
pub fn guess_meta_from_filenames(sheet: &Path, cutout: &Path) -> (String, String) {
    let mut page = String::new();
    let mut section = String::new();
    for path in [sheet, cutout] {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        if page.is_empty() {
            if let Some(c) = page_regex().and_then(|re| re.captures(&name)) {
                page = c[1].to_string();
            }
        }
        if section.is_empty() {
            if let Some(c) = section_regex().and_then(|re| re.captures(&name)) {
                section = c[1].to_uppercase();
            }
        }
    }
    (page, section)
}

/// Run the wizard against a project. Returns `None` when the user cancels
/// either picker; otherwise the asset that was appended (or found already
/// present, which the wizard treats as done).
pub fn run_add_asset_wizard(
    repo: &ProjectRepository,
    store: &ModelStore,
    picker: &dyn ImagePicker,
    project_id: &str,
) -> HyugaResult<Option<AssetMetadata>> {
    let Some(sheet) = picker.pick_image("Seleccionar imagen de HOJA")? else {
        return Ok(None);
    };
    let Some(cutout) = picker.pick_image("Seleccionar imagen de NOTA")? else {
        return Ok(None);
    };

    // The sentinel row is a UI placeholder, not a usable template.
    let model = store
        .list()?
        .into_iter()
        .find(|m| m.reference != SENTINEL_REFERENCE)
        .map(|m| m.reference)
        .unwrap_or_default();

    let (page_number, section) = guess_meta_from_filenames(&sheet, &cutout);
    let asset = AssetMetadata {
        id: Uuid::new_v4().to_string(),
        sheet: sheet.to_string_lossy().into_owned(),
        cutout: cutout.to_string_lossy().into_owned(),
        model,
        page_number,
        section,
    };

    if repo.append_asset(project_id, asset.clone())? == AppendOutcome::AlreadyPresent {
        info!("wizard asset {} was already present", asset.id);
    }
    Ok(Some(asset))
}
