use std::env;
use std::str::FromStr;

use anyhow::{Error, Result};
use log::LevelFilter;
use serde::Deserialize;

use crate::cli::CliArgs;

use super::resolved::{ConfigError, ConfigSources, ResolvedConfig, SettingSource};

mod browser;
mod connection;

use browser::{IndexSection, SearchSection, UiSection, browser_options};
use connection::ConnectionSection;

/// Mirror of the configuration file representation before CLI overrides and
/// validation are applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawConfig {
    connection: ConnectionSection,
    search: SearchSection,
    index: IndexSection,
    ui: UiSection,
}

impl RawConfig {
    /// Apply CLI overrides on top of the raw configuration values.
    pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
        self.connection.apply_cli_overrides(cli);
        self.search.apply_cli_overrides(cli);
        self.index.apply_cli_overrides(cli);
        self.ui.apply_cli_overrides(cli);
    }

    /// Convert the raw configuration into a [`ResolvedConfig`], validating and
    /// filling defaults where required.
    pub(super) fn resolve(self, cli: &CliArgs) -> Result<ResolvedConfig> {
        let sources = ConfigSources {
            server: detect_source(
                cli.server.is_some(),
                self.connection.server.is_some(),
                "SHARETREE__CONNECTION__SERVER",
                "--server",
                "connection.server",
            ),
            timeout: detect_source(
                cli.timeout_secs.is_some(),
                self.connection.timeout_secs.is_some(),
                "SHARETREE__CONNECTION__TIMEOUT_SECS",
                "--timeout",
                "connection.timeout_secs",
            ),
            search_limit: detect_source(
                cli.search_limit.is_some(),
                self.search.limit.is_some(),
                "SHARETREE__SEARCH__LIMIT",
                "--search-limit",
                "search.limit",
            ),
            poll_interval: detect_source(
                false,
                self.index.poll_interval_ms.is_some(),
                "SHARETREE__INDEX__POLL_INTERVAL_MS",
                "",
                "index.poll_interval_ms",
            ),
            log_level: detect_source(
                cli.log_level.is_some(),
                self.ui.log_level.is_some(),
                "SHARETREE__UI__LOG_LEVEL",
                "--log-level",
                "ui.log_level",
            ),
        };

        let browser = browser_options(&self.search, &self.index, &self.ui);
        let log_level = match self.ui.log_level.as_deref() {
            None => LevelFilter::Info,
            Some(value) => LevelFilter::from_str(value.trim()).map_err(|_| {
                ConfigError::invalid(
                    "ui.log_level",
                    value,
                    sources.source_for_log_level(),
                    "expected one of off, error, warn, info, debug, trace",
                )
            })?,
        };
        let connection = self.connection.resolve()?;

        let config = ResolvedConfig {
            server: connection.server,
            context: connection.context,
            timeout: connection.timeout,
            browser,
            log_level,
            initial_query: cli.initial_query.clone(),
            reveal: cli.reveal.clone(),
        };

        config.validate(&sources).map_err(Error::new)?;

        Ok(config)
    }
}

fn detect_source(
    cli_present: bool,
    value_present: bool,
    env_var: &'static str,
    cli_flag: &'static str,
    key: &'static str,
) -> Option<SettingSource> {
    if !value_present {
        return None;
    }

    if cli_present {
        return Some(SettingSource::CliFlag(cli_flag));
    }

    if env::var_os(env_var).is_some() {
        return Some(SettingSource::Environment(env_var));
    }

    Some(SettingSource::ConfigKey(key))
}
