use crate::{console_debug, console_warn};
use gloo_storage::{LocalStorage, Storage};
use serde::{Deserialize, Serialize};

/// LocalStorage key holding an optional JSON override of [`FormsConfig`].
pub const CONFIG_STORAGE_KEY: &str = "ledger_ui_config";

/// Settings shared by every composer. Provided to components as context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormsConfig {
    pub autosave: AutosaveSettings,
    pub files: FileSettings,
    pub notifications: NotificationSettings,
    pub api: ApiSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveSettings {
    /// Quiet period before a debounced save fires
    pub debounce_ms: u32,
    pub saved_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    /// Default upper bound for file fields, in megabytes
    pub max_size_mb: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub toast_duration_ms: u32,
    pub low_emphasis_duration_ms: u32,
    pub success_message: String,
    pub error_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
}

impl Default for AutosaveSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 1000,
            saved_message: "Changes saved automatically".to_string(),
        }
    }
}

impl Default for FileSettings {
    fn default() -> Self {
        Self { max_size_mb: 5.0 }
    }
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            toast_duration_ms: 4000,
            low_emphasis_duration_ms: 2000,
            success_message: "Form submitted successfully".to_string(),
            error_message: "An error occurred while submitting the form".to_string(),
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "/api".to_string(),
        }
    }
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            autosave: AutosaveSettings::default(),
            files: FileSettings::default(),
            notifications: NotificationSettings::default(),
            api: ApiSettings::default(),
        }
    }
}

impl FormsConfig {
    /// Defaults overlaid with whatever the override key in LocalStorage holds.
    pub fn load() -> Self {
        match LocalStorage::get::<FormsConfig>(CONFIG_STORAGE_KEY) {
            Ok(config) => {
                console_debug!("[Config] Loaded override from {}", CONFIG_STORAGE_KEY);
                config
            }
            Err(gloo_storage::errors::StorageError::KeyNotFound(_)) => Self::default(),
            Err(e) => {
                console_warn!("[Config] Ignoring unreadable override: {}", e);
                Self::default()
            }
        }
    }

    /// Parse a JSON override; missing sections and fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
