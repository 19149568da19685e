//! Hyuga CLI - host interface for the asset backend
//!
//! Commands: project CRUD, model import/list, asset append/remove, export
//! Outputs JSON to stdout
//! Returns non-zero on failure

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use hyuga_core::{
    export_project, AppendOutcome, AssetMetadata, LayoutPolicy, ModelStore, PdfWriter,
    ProjectRepository, RasterCodec, WordPairGenerator,
};

#[derive(Parser)]
#[command(name = "hyuga-cli")]
#[command(about = "Hyuga CLI - project storage, model catalog, PDF export")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base data directory (defaults to <user config dir>/hyuga)
    #[arg(short, long)]
    base_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new empty project
    CreateProject,

    /// List all projects
    Projects,

    /// Show one project's full document, including its asset list
    Project {
        /// Project ID
        id: String,
    },

    /// Delete a project and everything under it
    DeleteProject {
        /// Project ID
        id: String,
    },

    /// Import image files into the shared model catalog
    ImportModels {
        /// Image files to import
        paths: Vec<PathBuf>,
    },

    /// List the model catalog
    Models,

    /// Append an asset to a project
    AddAsset {
        /// Project ID
        #[arg(short, long)]
        project: String,

        /// JSON payload (AssetMetadata)
        #[arg(long)]
        payload: String,
    },

    /// Remove an asset from a project
    RemoveAsset {
        /// Project ID
        #[arg(short, long)]
        project: String,

        /// Asset ID
        #[arg(short, long)]
        asset: String,
    },

    /// Export a project to a PDF document
    Export {
        /// Project ID
        #[arg(short, long)]
        project: String,

        /// Output file (defaults to output.pdf inside the project directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Page layout policy
        #[arg(long, value_enum, default_value_t = LayoutArg::Full)]
        layout: LayoutArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    /// One full-bleed page per asset
    Full,
    /// Sheet page plus a model/cutout split page per asset
    Split,
}

impl From<LayoutArg> for LayoutPolicy {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Full => LayoutPolicy::FullPage,
            LayoutArg::Split => LayoutPolicy::SheetAndDetail,
        }
    }
}

fn main() -> ExitCode {
    let _logger = flexi_logger::Logger::try_with_env_or_str("info")
        .and_then(|logger| logger.start())
        .ok();

    let cli = Cli::parse();

    let base_dir = match cli.base_dir.clone().or_else(|| {
        dirs::config_dir().map(|dir| dir.join("hyuga"))
    }) {
        Some(dir) => dir,
        None => {
            eprintln!(r#"{{"error": "could not resolve a base data directory"}}"#);
            return ExitCode::FAILURE;
        }
    };

    let repo = ProjectRepository::new(&base_dir, Box::new(WordPairGenerator));
    let store = ModelStore::new(&base_dir);

    match cli.command {
        Commands::CreateProject => match repo.create() {
            Ok(project) => {
                println!("{}", serde_json::to_string_pretty(&project).unwrap());
                ExitCode::SUCCESS
            }
            Err(e) => fail(&e),
        },

        Commands::Projects => match repo.list() {
            Ok(projects) => {
                let summaries: Vec<_> = projects
                    .iter()
                    .map(|p| {
                        serde_json::json!({
                            "id": p.id,
                            "name": p.name,
                            "createdAt": p.created_at,
                            "assetCount": p.assets.len(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&summaries).unwrap());
                ExitCode::SUCCESS
            }
            Err(e) => fail(&e),
        },

        Commands::Project { id } => match repo.load(&id) {
            Ok(project) => {
                println!("{}", serde_json::to_string_pretty(&project).unwrap());
                ExitCode::SUCCESS
            }
            Err(e) => fail(&e),
        },

        Commands::DeleteProject { id } => match repo.delete(&id) {
            Ok(()) => {
                println!(r#"{{"deleted": "{id}"}}"#);
                ExitCode::SUCCESS
            }
            Err(e) => fail(&e),
        },

        Commands::ImportModels { paths } => match store.import_images(&paths) {
            Ok(appended) => {
                let output = serde_json::json!({
                    "imported": appended.len(),
                    "entries": appended,
                });
                println!("{}", serde_json::to_string_pretty(&output).unwrap());
                ExitCode::SUCCESS
            }
            Err(e) => fail(&e),
        },

        Commands::Models => match store.list() {
            Ok(entries) => {
                println!("{}", serde_json::to_string_pretty(&entries).unwrap());
                ExitCode::SUCCESS
            }
            Err(e) => fail(&e),
        },

        Commands::AddAsset { project, payload } => {
            let asset: AssetMetadata = match serde_json::from_str(&payload) {
                Ok(a) => a,
                Err(e) => {
                    eprintln!(r#"{{"error": "invalid payload: {e}"}}"#);
                    return ExitCode::FAILURE;
                }
            };
            match repo.append_asset(&project, asset) {
                Ok(AppendOutcome::Appended) => {
                    println!(r#"{{"status": "appended"}}"#);
                    ExitCode::SUCCESS
                }
                Ok(AppendOutcome::AlreadyPresent) => {
                    println!(r#"{{"status": "alreadyPresent"}}"#);
                    ExitCode::SUCCESS
                }
                Err(e) => fail(&e),
            }
        }

        Commands::RemoveAsset { project, asset } => match repo.remove_asset(&project, &asset) {
            Ok(()) => {
                println!(r#"{{"removed": "{asset}"}}"#);
                ExitCode::SUCCESS
            }
            Err(e) => fail(&e),
        },

        Commands::Export { project, output, layout } => {
            let output = output.unwrap_or_else(|| repo.project_dir_path(&project).join("output.pdf"));
            let mut writer = PdfWriter::new();
            match export_project(
                &repo,
                &project,
                layout.into(),
                &RasterCodec,
                &mut writer,
                &output,
            ) {
                Ok(()) => {
                    println!(r#"{{"exported": "{}"}}"#, output.display());
                    ExitCode::SUCCESS
                }
                Err(e) => fail(&e),
            }
        }
    }
}

fn fail(e: &hyuga_core::HyugaError) -> ExitCode {
    eprintln!(r#"{{"error": "{e}"}}"#);
    ExitCode::FAILURE
}
