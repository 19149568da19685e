//! Project aggregates and their repository.
//!
//! A project is one JSON document (`project.json`) holding identity, display
//! name, creation time, and the ordered asset list. The document is the unit
//! of atomicity: every mutation rewrites it whole via temp-file-then-rename,
//! so a reader never observes a partially constructed project.

use chrono::Local;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

use crate::error::{HyugaError, HyugaResult};
use crate::fsutil::atomic_write_json;
use crate::naming::NameGenerator;

/// Directory naming convention: `project-<id>`.
pub const PROJECT_DIR_PREFIX: &str = "project-";

const DOCUMENT_FILE: &str = "project.json";
const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub assets: Vec<AssetMetadata>,
}

/// Per-asset metadata. `sheet`, `cutout`, and `model` each hold either an
/// inline base64 payload or a path (typically into the model store).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMetadata {
    pub id: String,
    pub sheet: String,
    pub cutout: String,
    #[serde(default)]
    pub model: String,
    pub page_number: String,
    pub section: String,
}

/// Result of an asset append: duplicates are reported, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended,
    AlreadyPresent,
}

/// Repository of project documents rooted at `<base>/projects`.
pub struct ProjectRepository {
    projects_dir: PathBuf,
    namer: Box<dyn NameGenerator>,
}

impl ProjectRepository {
    pub fn new(base_dir: impl Into<PathBuf>, namer: Box<dyn NameGenerator>) -> Self {
        Self {
            projects_dir: base_dir.into().join("projects"),
            namer,
        }
    }

    fn project_dir(&self, id: &str) -> PathBuf {
        self.projects_dir.join(format!("{PROJECT_DIR_PREFIX}{id}"))
    }

    fn document_path(&self, id: &str) -> PathBuf {
        self.project_dir(id).join(DOCUMENT_FILE)
    }

    /// Directory holding the project's document; also the default home of
    /// its export output.
    pub fn project_dir_path(&self, id: &str) -> PathBuf {
        self.project_dir(id)
    }

    /// Create a new empty project with a generated display name.
    pub fn create(&self) -> HyugaResult<Project> {
        let project = Project {
            id: Uuid::new_v4().to_string(),
            name: self.namer.generate(),
            created_at: Local::now().format(CREATED_AT_FORMAT).to_string(),
            assets: vec![],
        };
        fs::create_dir_all(self.project_dir(&project.id))?;
        self.write_document(&project)?;
        Ok(project)
    }

    /// Enumerate all projects. A subdirectory whose document is missing or
    /// unparsable is skipped, not a batch failure; only directories matching
    /// the `project-` naming convention are considered at all.
    pub fn list(&self) -> HyugaResult<Vec<Project>> {
        fs::create_dir_all(&self.projects_dir)?;
        let mut projects = Vec::new();
        for entry in fs::read_dir(&self.projects_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name();
            let Some(id) = name.to_string_lossy().strip_prefix(PROJECT_DIR_PREFIX).map(String::from)
            else {
                continue;
            };
            match self.read_document(&id) {
                Ok(project) => projects.push(project),
                Err(e) => debug!("skipping unreadable project dir {:?}: {e}", name),
            }
        }
        Ok(projects)
    }

    /// Load one project by id.
    pub fn load(&self, id: &str) -> HyugaResult<Project> {
        if id.is_empty() {
            return Err(HyugaError::InvalidArgument("project id is required".into()));
        }
        self.read_document(id)
    }

    /// Remove the project's whole directory tree. Idempotent: deleting an
    /// already-absent project is not an error.
    pub fn delete(&self, id: &str) -> HyugaResult<()> {
        if id.is_empty() {
            return Err(HyugaError::InvalidArgument("project id is required".into()));
        }
        match fs::remove_dir_all(self.project_dir(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Append an asset if its id is not already present in the project.
    ///
    /// A duplicate id is an idempotent no-op reported as
    /// [`AppendOutcome::AlreadyPresent`] so callers can surface a warning if
    /// they want one.
    pub fn append_asset(&self, project_id: &str, asset: AssetMetadata) -> HyugaResult<AppendOutcome> {
        if project_id.is_empty() || asset.id.is_empty() {
            return Err(HyugaError::InvalidArgument(
                "project id and asset id are required".into(),
            ));
        }
        let mut project = self.read_document(project_id)?;
        if project.assets.iter().any(|a| a.id == asset.id) {
            info!("asset {} already present in project {project_id}", asset.id);
            return Ok(AppendOutcome::AlreadyPresent);
        }
        project.assets.push(asset);
        self.write_document(&project)?;
        Ok(AppendOutcome::Appended)
    }

    /// Remove an asset by id.
    ///
    /// Removal swaps the last asset into the vacated slot (O(1)); the former
    /// last asset changes position, all other assets keep their order.
    pub fn remove_asset(&self, project_id: &str, asset_id: &str) -> HyugaResult<()> {
        if project_id.is_empty() || asset_id.is_empty() {
            return Err(HyugaError::InvalidArgument(
                "project id and asset id are required".into(),
            ));
        }
        let mut project = self.read_document(project_id)?;
        let index = project
            .assets
            .iter()
            .position(|a| a.id == asset_id)
            .ok_or_else(|| {
                HyugaError::NotFound(format!("asset {asset_id} in project {project_id}"))
            })?;
        project.assets.swap_remove(index);
        self.write_document(&project)
    }

    fn read_document(&self, id: &str) -> HyugaResult<Project> {
        let path = self.document_path(id);
        let data = match fs::read(&path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(HyugaError::NotFound(format!("project {id}")));
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&data).map_err(|e| HyugaError::CorruptDocument {
            path,
            message: e.to_string(),
        })
    }

    fn write_document(&self, project: &Project) -> HyugaResult<()> {
        atomic_write_json(&self.document_path(&project.id), project)
    }
}
