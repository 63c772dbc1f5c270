use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A model known to a backend, as reported by its listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ModelInfo {
    /// Tag the backend resolves, e.g. `qwen2.5:7b`.
    name: String,
    /// When the model files last changed, if the backend reports it.
    #[serde(default)]
    modified_at: Option<DateTime<Utc>>,
    /// On-disk size in bytes, if the backend reports it.
    #[serde(default)]
    size: Option<u64>,
}

impl ModelInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modified_at: None,
            size: None,
        }
    }

    pub fn with_details(
        name: impl Into<String>,
        modified_at: Option<DateTime<Utc>>,
        size: Option<u64>,
    ) -> Self {
        Self {
            name: name.into(),
            modified_at,
            size,
        }
    }
}
