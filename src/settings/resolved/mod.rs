use std::time::Duration;

use log::LevelFilter;
use sharetree::browser::BrowserOptions;
use sharetree_remote_api::ConnectionContext;

mod errors;
mod sources;
mod summary;
mod validation;

pub(crate) use errors::ConfigError;
pub(crate) use sources::{ConfigSources, SettingSource};

/// Application-ready configuration derived from user input, config files and
/// sensible defaults.
#[derive(Debug)]
pub struct ResolvedConfig {
    pub server: String,
    pub context: ConnectionContext,
    pub timeout: Option<Duration>,
    pub browser: BrowserOptions,
    pub log_level: LevelFilter,
    pub initial_query: Option<String>,
    pub reveal: Option<String>,
}

impl ResolvedConfig {
    pub(super) fn validate(&self, sources: &ConfigSources) -> Result<(), ConfigError> {
        validation::validate(self, sources)
    }

    /// Print a human readable summary of the effective configuration.
    pub fn print_summary(&self) {
        summary::print_summary(self);
    }
}
