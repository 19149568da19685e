//! Hyuga Core - asset backend for the Hyuga scrapbook authoring tool
//!
//! # Guarantees
//! 1. Model images are deduplicated by content digest, never by filename
//! 2. Catalog and project documents are replaced atomically (temp + rename)
//! 3. Asset ids are unique within a project
//! 4. Page placements scale uniformly - images are never distorted
//! 5. Export fails fast: no partially-correct documents

pub mod error;
pub mod export;
pub mod fsutil;
pub mod hashing;
pub mod layout;
pub mod models;
pub mod naming;
pub mod pdf;
pub mod projects;
pub mod wizard;

pub use error::{HyugaError, HyugaResult};
pub use export::{export_project, DocumentWriter, ImageCodec, LayoutPolicy};
pub use hashing::{digest_from_reference, sha256_hex};
pub use layout::{fit_to_page, fit_to_region, split_page_vertically, Placement, Region};
pub use models::{ModelEntry, ModelStore};
pub use naming::{NameGenerator, WordPairGenerator};
pub use pdf::{PdfWriter, RasterCodec};
pub use projects::{AppendOutcome, AssetMetadata, Project, ProjectRepository};
pub use wizard::{run_add_asset_wizard, ImagePicker};
