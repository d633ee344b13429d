//! # Engine Settings
//!
//! Display precision and currency, loadable from a small JSON file. Missing
//! keys take their defaults, so `{}` is a valid settings file.
//!
//! ```rust
//! use tally_core::config::EngineSettings;
//!
//! let settings: EngineSettings = serde_json::from_str(r#"{"currency": "USD"}"#).unwrap();
//! assert_eq!(settings.precision, 3);
//! assert_eq!(settings.currency, "USD");
//! assert!(settings.validate().is_ok());
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Default number of decimals shown for computed values
pub const DEFAULT_PRECISION: u8 = 3;
/// Default currency code
pub const DEFAULT_CURRENCY: &str = "INR";
/// Largest precision accepted by [`EngineSettings::validate`]
pub const MAX_PRECISION: u8 = 9;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Decimals used for display and persisted values
    #[serde(default = "default_precision")]
    pub precision: u8,

    /// Currency code attached to every cost line (`INR`)
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_precision() -> u8 {
    DEFAULT_PRECISION
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            precision: DEFAULT_PRECISION,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl EngineSettings {
    /// Load and validate settings from a JSON file.
    pub fn load(path: &Path) -> CalcResult<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read settings", path.display().to_string(), e.to_string()))?;

        let settings: EngineSettings = serde_json::from_str(&contents).map_err(|e| {
            CalcError::serialization(format!("Invalid settings in {}: {}", path.display(), e))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Check the settings are usable.
    pub fn validate(&self) -> CalcResult<()> {
        if self.precision > MAX_PRECISION {
            return Err(CalcError::invalid_input(
                "precision",
                self.precision.to_string(),
                format!("must be at most {}", MAX_PRECISION),
            ));
        }

        if self.currency.is_empty() || !self.currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CalcError::invalid_input(
                "currency",
                self.currency.clone(),
                "must be a non-empty alphabetic code",
            ));
        }

        Ok(())
    }
}
