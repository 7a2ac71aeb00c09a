//! API credentials and their loading from the process environment.

use std::env;
use std::fmt;
use thiserror::Error;

/// Environment variable holding the picture feed key.
pub const PICTURE_KEY_VAR: &str = "APOD_API_KEY";
/// Environment variable holding the near-earth object feed key.
pub const NEO_KEY_VAR: &str = "NEO_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API key not found: set {0} in the environment or a .env file")]
    MissingKey(&'static str),
}

/// The two feed API keys. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    picture_key: String,
    neo_key: String,
}

impl Credential {
    pub fn new(picture_key: impl Into<String>, neo_key: impl Into<String>) -> Self {
        Self {
            picture_key: picture_key.into(),
            neo_key: neo_key.into(),
        }
    }

    /// Load both keys from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load both keys through an arbitrary lookup. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fetch = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::MissingKey(name))
        };

        let credential = Self::new(fetch(PICTURE_KEY_VAR)?, fetch(NEO_KEY_VAR)?);

        tracing::info!("Loaded APOD API key: {}", mask(&credential.picture_key));
        tracing::info!("Loaded NEO API key: {}", mask(&credential.neo_key));

        Ok(credential)
    }

    pub fn picture_key(&self) -> &str {
        &self.picture_key
    }

    pub fn neo_key(&self) -> &str {
        &self.neo_key
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("picture_key", &mask(&self.picture_key))
            .field("neo_key", &mask(&self.neo_key))
            .finish()
    }
}

/// First four characters of a key followed by an ellipsis.
pub fn mask(key: &str) -> String {
    let prefix: String = key.chars().take(4).collect();
    format!("{}...", prefix)
}
