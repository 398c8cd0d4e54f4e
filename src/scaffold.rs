//! Project scaffolding: generate the skeleton of a new CLI application
//! wired to this framework, and add command source files to an existing
//! one.
//!
//! All configuration is passed in explicitly; the scaffolder never reads
//! ambient environment state.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::exitcode;

#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("{0} already exists")]
    AlreadyExists(PathBuf),

    #[error("target directory is not empty: {0}")]
    NotEmpty(PathBuf),

    #[error("manifest serialization failed: {0}")]
    Manifest(#[from] toml::ser::Error),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl ScaffoldError {
    fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ScaffoldError::AlreadyExists(_) | ScaffoldError::NotEmpty(_) => exitcode::CANTCREAT,
            ScaffoldError::Manifest(_) => exitcode::DATAERR,
            ScaffoldError::Io { .. } => exitcode::IOERR,
        }
    }
}

/// Explicit scaffolding configuration.
#[derive(Debug, Clone)]
pub struct ScaffoldConfig {
    pub project_name: String,
    pub author: Option<String>,
    pub output_dir: PathBuf,
}

#[derive(Serialize)]
struct Manifest {
    package: Package,
    dependencies: BTreeMap<String, String>,
}

#[derive(Serialize)]
struct Package {
    name: String,
    version: String,
    edition: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    authors: Vec<String>,
}

const MAIN_TEMPLATE: &str = r#"use rscmd::{Command, CommandTree, Commander};

fn main() {
    let mut tree = CommandTree::new();
    tree.insert(
        Command::new("{{name}}")
            .short("{{name}} root command")
            .run(|_cmd, args| {
                println!("{{name}} called with {:?}", args);
            }),
        None,
    );

    let mut app = Commander::new(tree);
    if let Err(e) = app.execute() {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
"#;

const COMMAND_TEMPLATE: &str = r#"use rscmd::Command;

/// Build the `{{name}}` command; wire it into the tree in main.rs.
pub fn {{fn_name}}_command() -> Command {
    Command::new("{{name}}")
        .short("Describe {{name}} here")
        .run(|_cmd, args| {
            println!("{{name}} called with {:?}", args);
        })
}
"#;

pub struct Scaffolder {
    config: ScaffoldConfig,
}

impl Scaffolder {
    pub fn new(config: ScaffoldConfig) -> Self {
        Self { config }
    }

    /// Create a new project skeleton: manifest plus a `main.rs` hosting a
    /// one-command tree. Refuses to touch a non-empty target directory.
    #[instrument(skip(self))]
    pub fn create_project(&self) -> Result<Vec<PathBuf>, ScaffoldError> {
        let dir = &self.config.output_dir;
        if dir.exists() && !is_empty(dir)? {
            return Err(ScaffoldError::NotEmpty(dir.clone()));
        }
        debug!(project = %self.config.project_name, dir = %dir.display(), "creating project");

        let manifest_path = dir.join("Cargo.toml");
        safe_write(&manifest_path, &self.render_manifest()?)?;

        let main_path = dir.join("src").join("main.rs");
        safe_write(&main_path, &render(MAIN_TEMPLATE, &self.config.project_name))?;

        Ok(vec![manifest_path, main_path])
    }

    /// Add a command source file under `src/commands/` in the target
    /// project. Fails if the file already exists.
    #[instrument(skip(self))]
    pub fn add_command(&self, name: &str) -> Result<PathBuf, ScaffoldError> {
        let fn_name = name.replace('-', "_");
        let path = self
            .config
            .output_dir
            .join("src")
            .join("commands")
            .join(format!("{}.rs", fn_name));
        let contents = render(COMMAND_TEMPLATE, name).replace("{{fn_name}}", &fn_name);
        safe_write(&path, &contents)?;
        Ok(path)
    }

    fn render_manifest(&self) -> Result<String, ScaffoldError> {
        let manifest = Manifest {
            package: Package {
                name: self.config.project_name.clone(),
                version: "0.1.0".to_string(),
                edition: "2021".to_string(),
                authors: self.config.author.iter().cloned().collect(),
            },
            dependencies: BTreeMap::from([(
                "rscmd".to_string(),
                env!("CARGO_PKG_VERSION").to_string(),
            )]),
        };
        Ok(toml::to_string_pretty(&manifest)?)
    }
}

fn render(template: &str, name: &str) -> String {
    template.replace("{{name}}", name)
}

/// Write `contents` to `path`, creating parent directories but refusing to
/// overwrite an existing file.
fn safe_write(path: &Path, contents: &str) -> Result<(), ScaffoldError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .map_err(|e| ScaffoldError::io(format!("creating {}", dir.display()), e))?;
    }
    if path.exists() {
        return Err(ScaffoldError::AlreadyExists(path.to_path_buf()));
    }
    fs::write(path, contents)
        .map_err(|e| ScaffoldError::io(format!("writing {}", path.display()), e))
}

/// True when `path` is an empty directory or an empty file.
fn is_empty(path: &Path) -> Result<bool, ScaffoldError> {
    let meta = fs::metadata(path)
        .map_err(|e| ScaffoldError::io(format!("inspecting {}", path.display()), e))?;
    if meta.is_dir() {
        let mut entries = fs::read_dir(path)
            .map_err(|e| ScaffoldError::io(format!("reading {}", path.display()), e))?;
        Ok(entries.next().is_none())
    } else {
        Ok(meta.len() == 0)
    }
}
