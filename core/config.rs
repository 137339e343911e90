use crate::error::{AppError, Result};
use crate::paths::{absolutize, normalize_paths};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_CONFIG_FILENAME: &str = "filebundle.toml";
pub const LEGACY_CONFIG_FILENAME: &str = "config.json";
pub const DEFAULT_OUTPUT_FILE: &str = "combined.txt";
pub const DEFAULT_LOG_FILE: &str = "filebundle.log";

const STARTER_CONFIG: &str = r#"# filebundle configuration

# Directory every relative path below is resolved against. Required.
start_path = "."

# Collect every file under start_path with one of these extensions.
extensions = [".java", ".md"]

# Directories (relative to start_path or absolute) that are never entered.
# Matching is by path prefix: "build" also excludes "build-tools".
exclude_dirs = ["target", ".git"]

# Take every file under these directories, whatever the extension.
include_all_from = []

# Individual files: absolute, relative to start_path, or a bare name to search for.
extra_files = []

# Drop import lines from collected files: "none", "all" or "non_static".
remove_imports = "none"

output_file = "combined.txt"
log_file = "filebundle.log"
overwrite_output = true
overwrite_log = true
"#;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub start_path: PathBuf,
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub exclude_dirs: Vec<String>,
    #[serde(default)]
    pub include_all_from: Vec<String>,
    #[serde(default)]
    pub extra_files: Vec<String>,
    #[serde(default)]
    pub remove_imports: RemoveImports,
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    #[serde(default = "default_true")]
    pub overwrite_output: bool,
    #[serde(default = "default_true")]
    pub overwrite_log: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RemoveImports {
    #[default]
    None,
    All,
    NonStatic,
}

impl RemoveImports {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoveImports::None => "none",
            RemoveImports::All => "all",
            RemoveImports::NonStatic => "non_static",
        }
    }
}

impl fmt::Display for RemoveImports {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RemoveImports {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(RemoveImports::None),
            "all" => Ok(RemoveImports::All),
            "non_static" => Ok(RemoveImports::NonStatic),
            other => Err(AppError::Config(format!(
                "Invalid 'remove_imports' value '{}': must be 'none', 'all' or 'non_static'",
                other
            ))),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_output_file() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_FILE)
}
fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

impl Config {
    pub fn with_start_path(start_path: impl Into<PathBuf>) -> Self {
        Self {
            start_path: start_path.into(),
            extensions: Vec::new(),
            exclude_dirs: Vec::new(),
            include_all_from: Vec::new(),
            extra_files: Vec::new(),
            remove_imports: RemoveImports::default(),
            output_file: default_output_file(),
            log_file: default_log_file(),
            overwrite_output: default_true(),
            overwrite_log: default_true(),
        }
    }

    pub fn default_toml() -> &'static str {
        STARTER_CONFIG
    }

    /// Picks the configuration file to load.
    ///
    /// An explicit path must exist (a bare name without extension is retried
    /// with `.toml`). Without one, `filebundle.toml` and then `config.json` are
    /// looked up in `working_dir`.
    pub fn resolve_config_path(
        working_dir: &Path,
        cli_config_file: Option<&str>,
    ) -> Result<PathBuf> {
        match cli_config_file {
            Some(p_str) => {
                let expanded = shellexpand::tilde(p_str);
                let mut path = PathBuf::from(expanded.as_ref());
                if path.is_relative() {
                    path = working_dir.join(path);
                }
                if !path.exists() && path.extension().is_none() {
                    path.set_extension("toml");
                }
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Specified config file not found at path: {}",
                        path.display()
                    )));
                }
                log::debug!("Using specified config file path: {}", path.display());
                Ok(path)
            }
            None => {
                let candidates = [DEFAULT_CONFIG_FILENAME, LEGACY_CONFIG_FILENAME];
                for name in candidates {
                    let candidate = working_dir.join(name);
                    if candidate.is_file() {
                        log::debug!("Using config file: {}", candidate.display());
                        return Ok(candidate);
                    }
                    log::trace!("No config at {}", candidate.display());
                }
                Err(AppError::Config(format!(
                    "No config file found in {} (looked for {} and {}). Run 'filebundle config --save' to create one.",
                    working_dir.display(),
                    DEFAULT_CONFIG_FILENAME,
                    LEGACY_CONFIG_FILENAME
                )))
            }
        }
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        log::info!("Loading configuration from: {}", config_path.display());
        let content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        let is_json = config_path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config: Config = if is_json {
            serde_json::from_str(&content).map_err(|e| {
                AppError::Config(format!(
                    "Error parsing config file '{}': {}",
                    config_path.display(),
                    e
                ))
            })?
        } else {
            toml::from_str(&content).map_err(|e| {
                AppError::TomlParse(format!(
                    "Error parsing config file '{}': {}. Check TOML syntax and structure.",
                    config_path.display(),
                    e
                ))
            })?
        };
        config.finalize()
    }

    /// Validates required fields and turns `start_path` into an absolute,
    /// normalized directory path (with `~` expanded).
    pub fn finalize(mut self) -> Result<Self> {
        let raw = self.start_path.to_string_lossy().trim().to_string();
        if raw.is_empty() {
            return Err(AppError::Config(
                "Missing required 'start_path' in config".to_string(),
            ));
        }
        let expanded = PathBuf::from(shellexpand::tilde(&raw).as_ref());
        self.start_path = absolutize(&expanded);
        log::debug!("Effective start_path: {}", self.start_path.display());
        Ok(self)
    }

    pub fn normalized_extensions(&self) -> HashSet<String> {
        self.extensions
            .iter()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .map(|e| if e.starts_with('.') { e } else { format!(".{}", e) })
            .collect()
    }

    pub fn exclusion_prefixes(&self) -> Vec<PathBuf> {
        normalize_paths(&self.exclude_dirs, &self.start_path)
    }

    pub fn include_all_dirs(&self) -> Vec<PathBuf> {
        normalize_paths(&self.include_all_from, &self.start_path)
    }
}
