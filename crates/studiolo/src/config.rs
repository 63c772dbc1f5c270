//! Workspace-level configuration.
//!
//! One TOML file with a section per concern:
//!
//! ```toml
//! [ollama]
//! base_url = "http://localhost:11434"
//! model = "qwen2.5:7b"
//!
//! [admission]
//! gate_capacity = 1
//!
//! [tutor]
//! fast_model = "llama3.2:3b"
//! ```
//!
//! Every field defaults, so an empty file (or a missing section) yields a
//! working local setup.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use studiolo_admission::{AdmissionGate, ResilientClient, RetryConfig};
use studiolo_error::{ConfigError, StudioloResult};
use studiolo_models::{OllamaClient, OllamaConfig};
use studiolo_tutor::{Tutor, TutorConfig};
use typed_builder::TypedBuilder;

fn default_gate_capacity() -> usize {
    1
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_secs() -> u64 {
    2
}

fn default_cooldown_secs() -> u64 {
    5
}

/// Settings for the admission gate and retry policy.
///
/// The capacity default of one matches what a local backend survives. Raising
/// it is a config edit, not a code change, for the day the backend can take
/// parallel load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, TypedBuilder)]
pub struct AdmissionConfig {
    /// Generations allowed in flight at once
    #[serde(default = "default_gate_capacity")]
    #[builder(default = default_gate_capacity())]
    gate_capacity: usize,
    /// Attempts per generation call, including the first
    #[serde(default = "default_max_attempts")]
    #[builder(default = default_max_attempts())]
    max_attempts: u32,
    /// Backoff unit in seconds; attempt `n` waits `n` units
    #[serde(default = "default_backoff_secs")]
    #[builder(default = default_backoff_secs())]
    backoff_secs: u64,
    /// Extra cool-down in seconds after a backend crash or 5xx
    #[serde(default = "default_cooldown_secs")]
    #[builder(default = default_cooldown_secs())]
    cooldown_secs: u64,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl AdmissionConfig {
    /// Builds the gate these settings describe.
    pub fn gate(&self) -> AdmissionGate {
        AdmissionGate::new(self.gate_capacity)
    }

    /// Builds the retry policy these settings describe.
    pub fn retry(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.max_attempts,
            backoff_unit: Duration::from_secs(self.backoff_secs),
            cooldown: Duration::from_secs(self.cooldown_secs),
        }
    }
}

/// Top-level configuration for a Studiolo deployment.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Getters, TypedBuilder)]
pub struct StudioloConfig {
    /// Backend connection settings
    #[serde(default)]
    #[builder(default)]
    ollama: OllamaConfig,
    /// Gate and retry settings
    #[serde(default)]
    #[builder(default)]
    admission: AdmissionConfig,
    /// Tutoring operation settings
    #[serde(default)]
    #[builder(default)]
    tutor: TutorConfig,
}

impl StudioloConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the file cannot be read or parsed.
    #[tracing::instrument(skip(path))]
    pub fn from_file(path: impl AsRef<Path>) -> StudioloResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the text does not parse.
    pub fn from_toml(content: &str) -> StudioloResult<Self> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)).into())
    }

    /// Wires up the full stack this configuration describes: an Ollama
    /// client behind the admission gate and retry policy, driving a tutor.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn connect(&self) -> StudioloResult<Tutor<ResilientClient<OllamaClient>>> {
        let client = OllamaClient::new(&self.ollama)?;
        let resilient =
            ResilientClient::with_policy(client, self.admission.gate(), self.admission.retry());
        Ok(Tutor::with_config(resilient, self.tutor.clone()))
    }
}
