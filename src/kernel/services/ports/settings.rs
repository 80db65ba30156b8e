use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::PathBuf;

pub const LAST_OPEN_FOLDER: &str = "lastOpenFolder";
pub const RECENT_FOLDERS: &str = "recentFolders";
pub const AUTO_SAVE: &str = "autoSave";
pub const FILE_EXTENSIONS: &str = "fileExtensions";
pub const CLOSE_TABS_ON_FOLDER_SWITCH: &str = "closeTabsOnFolderSwitch";
pub const LOG_LEVEL: &str = "logLevel";

pub const MAX_RECENT_FOLDERS: usize = 5;
pub const DEFAULT_FILE_EXTENSIONS: [&str; 6] = ["c", "h", "makefile", "png", "wav", "json"];

#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "settings IO error: {}", e),
            SettingsError::Json(e) => write!(f, "settings JSON error: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Json(e)
    }
}

/// Flat, schema-less key-value settings scoped to the installation.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;

    /// Setting `Value::Null` removes the key.
    fn set(&self, key: &str, value: Value) -> Result<(), SettingsError>;

    fn remove(&self, key: &str) -> Result<(), SettingsError> {
        self.set(key, Value::Null)
    }
}

fn get_or<T: DeserializeOwned>(store: &dyn SettingsStore, key: &str, default: T) -> T {
    match store.get(key) {
        Some(Value::Null) | None => default,
        Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "ignoring malformed setting");
            default
        }),
    }
}

/// Typed view over the settings the workbench reads at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbenchConfig {
    pub auto_save: bool,
    pub file_extensions: Vec<String>,
    pub close_tabs_on_folder_switch: bool,
    pub log_level: String,
    pub last_open_folder: Option<PathBuf>,
    pub recent_folders: Vec<PathBuf>,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            auto_save: false,
            file_extensions: DEFAULT_FILE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            close_tabs_on_folder_switch: false,
            log_level: "info".to_string(),
            last_open_folder: None,
            recent_folders: Vec::new(),
        }
    }
}

impl WorkbenchConfig {
    pub fn from_store(store: &dyn SettingsStore) -> Self {
        let defaults = Self::default();

        let mut file_extensions: Vec<String> =
            get_or(store, FILE_EXTENSIONS, defaults.file_extensions.clone())
                .into_iter()
                .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect();
        if file_extensions.is_empty() {
            file_extensions = defaults.file_extensions.clone();
        }
        if !file_extensions.iter().any(|ext| ext == "json") {
            file_extensions.push("json".to_string());
        }

        let mut recent_folders: Vec<PathBuf> = get_or(store, RECENT_FOLDERS, Vec::new());
        recent_folders.truncate(MAX_RECENT_FOLDERS);

        Self {
            auto_save: get_or(store, AUTO_SAVE, defaults.auto_save),
            file_extensions,
            close_tabs_on_folder_switch: get_or(
                store,
                CLOSE_TABS_ON_FOLDER_SWITCH,
                defaults.close_tabs_on_folder_switch,
            ),
            log_level: get_or(store, LOG_LEVEL, defaults.log_level),
            last_open_folder: get_or(store, LAST_OPEN_FOLDER, None),
            recent_folders,
        }
    }

    /// Whether a file with this name belongs to the project (listing and creation).
    pub fn allows_file_name(&self, name: &str) -> bool {
        let lower = name.to_ascii_lowercase();
        if lower == "makefile" {
            return true;
        }
        match lower.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => self.file_extensions.iter().any(|e| e == ext),
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/settings.rs"]
mod tests;
