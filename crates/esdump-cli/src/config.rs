//! Configuration management for esdump CLI
//!
//! Connection settings come from the environment (and a `.env` file loaded at
//! startup); command-line flags override them.

use crate::error::{CliError, Result};
use crate::AuthArgs;
use esdump_pipeline::client::elastic::DEFAULT_TIMEOUT_SECS;
use esdump_pipeline::client::ClientConfig;
use std::time::Duration;

// ============================================================================
// Environment Variables
// ============================================================================

pub const USERNAME_VAR: &str = "ESDUMP_USERNAME";
pub const PASSWORD_VAR: &str = "ESDUMP_PASSWORD";
pub const TIMEOUT_VAR: &str = "ESDUMP_TIMEOUT_SECS";

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load config from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let timeout = match lookup(TIMEOUT_VAR) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    CliError::config(format!("{} must be a number of seconds, got '{}'", TIMEOUT_VAR, raw))
                })?;
                if secs == 0 {
                    return Err(CliError::config(format!("{} must be greater than 0", TIMEOUT_VAR)));
                }
                Duration::from_secs(secs)
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            username: lookup(USERNAME_VAR).filter(|v| !v.is_empty()),
            password: lookup(PASSWORD_VAR).filter(|v| !v.is_empty()),
            timeout,
        })
    }

    /// Flags win over the environment
    pub fn with_auth(mut self, auth: &AuthArgs) -> Self {
        if auth.username.is_some() {
            self.username = auth.username.clone();
        }
        if auth.password.is_some() {
            self.password = auth.password.clone();
        }
        self
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            username: self.username.clone(),
            password: self.password.clone(),
            timeout: self.timeout,
        }
    }
}
