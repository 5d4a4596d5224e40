use crate::error::{AppError, Result};
use log;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const MARKER_DIR: &str = ".flatten";
pub const CONFIG_FILENAME: &str = "config.json";
pub const DEFAULT_OUTPUT_DIR: &str = ".flatten/output";

/// Immutable per-invocation configuration, loaded once from
/// `.flatten/config.json` merged over built-in defaults.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_line_limit")]
    pub line_limit: usize,
    #[serde(default = "default_output_format")]
    pub output_format: String,
    #[serde(default = "default_supported_extensions")]
    pub supported_extensions: Vec<String>,
    #[serde(default = "default_excluded_dir_names")]
    pub excluded_dir_names: Vec<String>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_alias_manifests")]
    pub alias_manifests: Vec<PathBuf>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_true")]
    pub log_to_terminal: bool,
    #[serde(default = "default_false")]
    pub log_to_file: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_line_limit() -> usize {
    500
}
fn default_output_format() -> String {
    "txt".to_string()
}
fn default_supported_extensions() -> Vec<String> {
    [
        ".js", ".jsx", ".ts", ".tsx", ".mjs", ".cjs", ".py", ".json", ".md",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_excluded_dir_names() -> Vec<String> {
    [
        "node_modules",
        ".git",
        "__pycache__",
        "dist",
        "build",
        MARKER_DIR,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}
fn default_alias_manifests() -> Vec<PathBuf> {
    vec![
        PathBuf::from("tsconfig.json"),
        PathBuf::from("jsconfig.json"),
    ]
}
fn default_log_dir() -> PathBuf {
    PathBuf::from(MARKER_DIR).join("logs")
}
fn default_log_file() -> String {
    "flatten.log".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            line_limit: default_line_limit(),
            output_format: default_output_format(),
            supported_extensions: default_supported_extensions(),
            excluded_dir_names: default_excluded_dir_names(),
            output_dir: default_output_dir(),
            alias_manifests: default_alias_manifests(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_to_terminal: default_true(),
            log_to_file: default_false(),
            log_dir: default_log_dir(),
            log_file: default_log_file(),
        }
    }
}

impl Config {
    /// Load the configuration for an initialized project.
    ///
    /// The `.flatten` marker directory must exist; a missing config file
    /// inside it yields the defaults, while a malformed one is fatal.
    pub fn load(project_root: &Path) -> Result<Self> {
        let marker_dir = project_root.join(MARKER_DIR);
        if !marker_dir.is_dir() {
            log::debug!("Marker directory not found at: {}", marker_dir.display());
            return Err(AppError::NotInitialized);
        }

        let config_path = marker_dir.join(CONFIG_FILENAME);
        if !config_path.is_file() {
            log::debug!(
                "No config file at {}, using defaults.",
                config_path.display()
            );
            return Ok(Config::default());
        }

        log::info!("Loading configuration from: {}", config_path.display());
        let json_content = fs::read_to_string(&config_path).map_err(|e| AppError::FileRead {
            path: config_path.clone(),
            source: e,
        })?;
        serde_json::from_str::<Config>(&json_content).map_err(|e| {
            AppError::JsonParse(format!(
                "Error parsing config file '{}': {}. Check JSON syntax and structure.",
                config_path.display(),
                e
            ))
        })
    }

    pub fn is_supported(&self, path: &Path) -> bool {
        match path.extension() {
            Some(ext) => {
                let dotted = format!(".{}", ext.to_string_lossy());
                self.supported_extensions.iter().any(|e| *e == dotted)
            }
            None => false,
        }
    }

    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.excluded_dir_names.iter().any(|d| d == name)
    }

    pub fn project_name(project_root: &Path) -> String {
        project_root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "project".to_string())
    }

    /// Default output filename: `<project>_flattened.<format>`.
    pub fn default_output_name(&self, project_root: &Path) -> String {
        format!(
            "{}_flattened.{}",
            Self::project_name(project_root),
            self.output_format
        )
    }
}
