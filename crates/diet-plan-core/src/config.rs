//! Practice branding and plan constants.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Longest plan validity accepted from a config file (about ten years).
pub const MAX_VALIDITY_DAYS: i64 = 3650;

/// Branding and plan settings shared by the document and the exporters.
///
/// Missing keys in a config file fall back to the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanConfig {
    /// Practice name in the document header
    pub clinic_name: String,
    /// Line under the practice name
    pub tagline: String,
    /// Signature name in the document footer
    pub nutritionist: String,
    /// Credential lines under the signature
    pub credentials: Vec<String>,
    /// "Created by" value in exports
    pub created_by: String,
    /// Application name recorded in export metadata
    pub application_name: String,
    /// Export format version
    pub export_version: String,
    /// Number of days a plan stays valid
    pub validity_days: i64,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            clinic_name: "Holistic Fitness by Priya".to_string(),
            tagline: "Your Health & Nutrition Partner".to_string(),
            nutritionist: "Priya".to_string(),
            credentials: vec![
                "Certified Nutritionist".to_string(),
                "Lifestyle & Health Modifier".to_string(),
            ],
            created_by: "Priya - Certified Nutritionist".to_string(),
            application_name: "Priya Jana Diet Plan App".to_string(),
            export_version: "1.0.0".to_string(),
            validity_days: 28,
        }
    }
}

impl PlanConfig {
    /// Parse a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde can't.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_VALIDITY_DAYS).contains(&self.validity_days) {
            return Err(ConfigError::Invalid(format!(
                "validity_days must be between 1 and {}, got {}",
                MAX_VALIDITY_DAYS, self.validity_days
            )));
        }
        Ok(())
    }

    /// Load a config file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}
