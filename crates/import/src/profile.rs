use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ImportError;

fn default_tolerance() -> i64 {
    parkmatch_core::TOLERANCE_MINUTES
}

fn default_delimiter() -> String {
    ",".to_string()
}

/// Run configuration, loadable from a TOML file. Delimiters are explicit
/// per export; there is no separator sniffing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunProfile {
    #[serde(default = "default_tolerance")]
    pub tolerance_minutes: i64,
    #[serde(default = "default_delimiter")]
    pub accesspark_delimiter: String,
    #[serde(default = "default_delimiter")]
    pub gopass_delimiter: String,
}

impl Default for RunProfile {
    fn default() -> Self {
        RunProfile {
            tolerance_minutes: default_tolerance(),
            accesspark_delimiter: default_delimiter(),
            gopass_delimiter: default_delimiter(),
        }
    }
}

impl RunProfile {
    pub fn from_toml_str(s: &str) -> Result<Self, ImportError> {
        let profile: RunProfile = toml::from_str(s)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn load(path: &Path) -> Result<Self, ImportError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Rejects configuration the engine cannot honor. Zero is allowed and
    /// means exact-key matching only.
    pub fn validate(&self) -> Result<(), ImportError> {
        if self.tolerance_minutes < 0 {
            return Err(ImportError::BadTolerance(self.tolerance_minutes));
        }
        Ok(())
    }

    pub fn accesspark_delimiter_byte(&self) -> Result<u8, ImportError> {
        delimiter_byte(&self.accesspark_delimiter)
    }

    pub fn gopass_delimiter_byte(&self) -> Result<u8, ImportError> {
        delimiter_byte(&self.gopass_delimiter)
    }
}

fn delimiter_byte(s: &str) -> Result<u8, ImportError> {
    match s.as_bytes() {
        [b] => Ok(*b),
        _ => Err(ImportError::BadDelimiter(s.to_string())),
    }
}
