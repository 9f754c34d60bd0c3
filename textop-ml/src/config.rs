//! Configuration system for textop.
//!
//! Uses `figment` for layered configuration: defaults -> config files -> environment.
//! Configuration is loaded from `~/.config/textop/config.toml` and/or `.textop/config.toml`
//! in the workspace directory.

use crate::text::params::Word2VecOptions;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextOpConfig {
    /// Word2vec options used when a hyperparameter set leaves
    /// `text_processing_options` empty.
    #[serde(default)]
    pub word2vec: Word2VecOptions,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Check hyperparameters against the operator schema before construction.
    #[serde(default = "default_true")]
    pub validate_hyperparams: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            validate_hyperparams: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also write JSON logs to a daily-rolling file.
    #[serde(default)]
    pub json_file: bool,
    /// Directory for JSON log files (platform data dir when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

impl TextOpConfig {
    /// Fill an empty `text_processing_options` map with the configured word2vec options.
    pub fn apply_word2vec_defaults(&self, options: &mut Map<String, Value>) {
        if options.is_empty() {
            if let Ok(value) = serde_json::to_value(&self.word2vec) {
                options.insert("word2vec".into(), value);
            }
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("dev", "textop", "textop")
}

/// Path of the workspace-level config file.
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".textop").join("config.toml")
}

/// Directory for log files when none is configured.
pub fn default_log_dir() -> PathBuf {
    project_dirs()
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with `TEXTOP_`, nested keys split on `__`)
/// 2. Workspace-local config (`.textop/config.toml`)
/// 3. User config (`~/.config/textop/config.toml`)
/// 4. Built-in defaults
pub fn load_config(workspace: Option<&Path>) -> Result<TextOpConfig, Box<figment::Error>> {
    let mut figment = Figment::from(Serialized::defaults(TextOpConfig::default()));

    // User-level config
    if let Some(dirs) = project_dirs() {
        let user_config = dirs.config_dir().join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    // Workspace-level config
    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // Environment variables (TEXTOP_WORD2VEC__EPOCHS, TEXTOP_LOGGING__JSON_FILE, etc.)
    figment = figment.merge(Env::prefixed("TEXTOP_").split("__"));

    figment.extract().map_err(Box::new)
}

/// Load configuration from a single explicit file layered over the defaults.
pub fn load_config_file(path: &Path) -> Result<TextOpConfig, Box<figment::Error>> {
    Figment::from(Serialized::defaults(TextOpConfig::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("TEXTOP_").split("__"))
        .extract()
        .map_err(Box::new)
}

/// Check whether a user-level or workspace-level config file exists.
pub fn config_exists(workspace: Option<&Path>) -> bool {
    if let Some(dirs) = project_dirs() {
        if dirs.config_dir().join("config.toml").exists() {
            return true;
        }
    }

    if let Some(ws) = workspace {
        if workspace_config_path(ws).exists() {
            return true;
        }
    }

    false
}
