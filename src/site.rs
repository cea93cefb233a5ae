//! Wiring: config → data source → repository → generator.
//!
//! The CLI commands all start from a config directory. This module turns that
//! directory into a loaded [`UserRepository`] and drives a full build.

use crate::config::{self, ConfigError, SiteConfig};
use crate::controller::UserController;
use crate::generate::{self, GenerateError, GenerateReport};
use crate::metadata::EntityMetadata;
use crate::model::{Hydrate, User};
use crate::repository::{RepositoryError, UserRepository};
use crate::requests::UserRequests;
use crate::source::{DataSource, FileSource, StaticUsers};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("Generate error: {0}")]
    Generate(#[from] GenerateError),
}

/// A loaded site: resolved config plus hydrated users.
pub struct Site {
    pub config: SiteConfig,
    pub repository: UserRepository,
}

impl Site {
    /// Load `config.toml` from `root` and hydrate the configured data source.
    ///
    /// `data_override` replaces `data.path` and is used as given (not
    /// resolved against `root`).
    pub fn load(root: &Path, data_override: Option<&Path>) -> Result<Self, SiteError> {
        let config = config::load_config(root)?;
        let data_path: Option<PathBuf> = match data_override {
            Some(path) => Some(path.to_path_buf()),
            None => config.data.resolved_path(root),
        };

        let source: Box<dyn DataSource> = match data_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading users from data file");
                Box::new(FileSource::new(path))
            }
            None => {
                tracing::info!("loading built-in users");
                Box::new(StaticUsers)
            }
        };

        let repository = UserRepository::new(source, user_metadata(&config))?;
        tracing::info!(users = repository.find_all().len(), "users loaded");
        Ok(Self { config, repository })
    }

    /// Render every page into `output_dir`.
    pub fn build(&self, output_dir: &Path) -> Result<GenerateReport, SiteError> {
        let controller = UserController::new(&self.repository);
        let requests = UserRequests::new(&self.repository).get_users();
        Ok(generate::generate(
            &controller,
            &requests,
            &self.config,
            output_dir,
        )?)
    }
}

fn user_metadata(config: &SiteConfig) -> EntityMetadata {
    User::metadata().strict(config.data.strict)
}
