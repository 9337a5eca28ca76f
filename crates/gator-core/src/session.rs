//! Session context: the loaded configuration plus where it is persisted.
//!
//! The logged-in user is tracked by name in the config file. Handlers read and
//! update it only through the [`Session`] carried in the command state.

use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::Result;

#[derive(Debug, Clone)]
pub struct Session {
    config: AppConfig,
    path: PathBuf,
}

impl Session {
    /// Load the session from a config file; a missing file starts an empty session
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let config = AppConfig::load_from(&path)?;
        Ok(Self { config, path })
    }

    pub fn new(config: AppConfig, path: impl Into<PathBuf>) -> Self {
        Self {
            config,
            path: path.into(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current_user_name(&self) -> Option<&str> {
        self.config.session.current_user_name.as_deref()
    }

    /// Record `name` as the logged-in user and persist the config file
    pub fn set_user(&mut self, name: &str) -> Result<()> {
        self.config.session.current_user_name = Some(name.to_string());
        self.config.save_to(&self.path)?;
        tracing::debug!(user = name, path = %self.path.display(), "Session user updated");
        Ok(())
    }
}
