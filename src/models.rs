//! Model store - shared catalog of reusable template images.
//!
//! Images are deduplicated by content digest: the digest is both the lookup
//! key and the stored filename stem, so the same template re-selected under a
//! different name never lands on disk twice. The catalog itself is a single
//! JSON array, append-only, replaced atomically once per import batch.

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{HyugaError, HyugaResult};
use crate::fsutil::atomic_write_json;
use crate::hashing::{digest_from_reference, sha256_hex};

/// Placeholder row the UI shows before any model is chosen.
pub const SENTINEL_LABEL: &str = "Seleciona Machote";
pub const SENTINEL_REFERENCE: &str = "empty";

/// One catalog row: a display name and the path of the deduplicated image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub label: String,
    pub reference: String,
}

/// Catalog of template images rooted at `<base>/models`.
pub struct ModelStore {
    models_dir: PathBuf,
}

impl ModelStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: base_dir.into().join("models"),
        }
    }

    fn catalog_path(&self) -> PathBuf {
        self.models_dir.join("models.json")
    }

    fn images_dir(&self) -> PathBuf {
        self.models_dir.join("images")
    }

    /// Write the sentinel-only catalog if no catalog exists yet. Idempotent.
    pub fn initialize_catalog_if_absent(&self) -> HyugaResult<()> {
        let path = self.catalog_path();
        if path.exists() {
            return Ok(());
        }
        fs::create_dir_all(&self.models_dir)?;
        let sentinel = vec![ModelEntry {
            label: SENTINEL_LABEL.to_string(),
            reference: SENTINEL_REFERENCE.to_string(),
        }];
        atomic_write_json(&path, &sentinel)
    }

    /// Read the full catalog. An absent file is an empty catalog, not an
    /// error; an unparsable file is [`HyugaError::CorruptCatalog`].
    pub fn list(&self) -> HyugaResult<Vec<ModelEntry>> {
        let path = self.catalog_path();
        let data = match fs::read(&path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&data).map_err(|e| HyugaError::CorruptCatalog {
            path,
            message: e.to_string(),
        })
    }

    /// Import a batch of image files into the store.
    ///
    /// Per file: read bytes, digest, derive `<digest><lowercased ext>`.
    /// A digest already in the catalog appends at most a new label row that
    /// reuses the stored file; a new digest stores the file (skipping the
    /// write when a prior partial run already left it in place) and appends a
    /// row. Read or write failures for one file are logged and skipped; they
    /// never abort the batch. The catalog is persisted once, atomically,
    /// after the whole batch.
    ///
    /// Returns the entries appended by this batch.
    pub fn import_images(&self, paths: &[PathBuf]) -> HyugaResult<Vec<ModelEntry>> {
        self.initialize_catalog_if_absent()?;
        let images_dir = self.images_dir();
        fs::create_dir_all(&images_dir)?;

        let mut catalog = self.list()?;

        // Dedup indexes built from what the catalog already references.
        let mut seen_digest: HashMap<String, String> = HashMap::new();
        let mut seen_refs: HashSet<String> = HashSet::new();
        for entry in &catalog {
            if let Some(digest) = digest_from_reference(&entry.reference) {
                seen_digest.entry(digest).or_insert_with(|| entry.reference.clone());
            }
            seen_refs.insert(entry.reference.clone());
        }

        let mut appended = Vec::new();
        for path in paths {
            let label = match path.file_name() {
                Some(name) => name.to_string_lossy().into_owned(),
                None => {
                    warn!("skipping import with no file name: {}", path.display());
                    continue;
                }
            };
            let bytes = match fs::read(path) {
                Ok(b) => b,
                Err(e) => {
                    warn!("could not read file {}: {e}", path.display());
                    continue;
                }
            };

            let digest = sha256_hex(&bytes);
            let ext = lowercase_extension(path);
            let out_path = images_dir.join(format!("{digest}{ext}"));
            let out_ref = out_path.to_string_lossy().into_owned();

            if let Some(existing_ref) = seen_digest.get(&digest) {
                if seen_refs.contains(&out_ref) {
                    // Same bytes, same derived name: a true duplicate.
                    continue;
                }
                // Same bytes under a new display name: reuse the stored file.
                let entry = ModelEntry {
                    label,
                    reference: existing_ref.clone(),
                };
                seen_refs.insert(out_ref);
                catalog.push(entry.clone());
                appended.push(entry);
                continue;
            }

            if !out_path.exists() {
                if let Err(e) = fs::write(&out_path, &bytes) {
                    warn!("could not write file {}: {e}", out_path.display());
                    continue;
                }
            }

            let entry = ModelEntry {
                label,
                reference: out_ref.clone(),
            };
            seen_digest.insert(digest, out_ref.clone());
            seen_refs.insert(out_ref);
            catalog.push(entry.clone());
            appended.push(entry);
        }

        atomic_write_json(&self.catalog_path(), &catalog)?;
        Ok(appended)
    }
}

fn lowercase_extension(path: &Path) -> String {
    match path.extension() {
        Some(ext) => format!(".{}", ext.to_string_lossy().to_lowercase()),
        None => String::new(),
    }
}
