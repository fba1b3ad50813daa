use super::{ConfigError, ConfigSources, ResolvedConfig};

pub(super) fn validate(
    config: &ResolvedConfig,
    sources: &ConfigSources,
) -> Result<(), ConfigError> {
    if !(config.server.starts_with("http://") || config.server.starts_with("https://")) {
        return Err(ConfigError::invalid(
            "connection.server",
            config.server.clone(),
            sources.source_for_server(),
            "must be an http:// or https:// URL",
        ));
    }

    if let Some(timeout) = config.timeout
        && timeout.is_zero()
    {
        return Err(ConfigError::invalid(
            "connection.timeout_secs",
            timeout.as_secs().to_string(),
            sources.source_for_timeout(),
            "must be greater than zero",
        ));
    }

    if config.browser.search_limit == 0 {
        return Err(ConfigError::invalid(
            "search.limit",
            config.browser.search_limit.to_string(),
            sources.source_for_search_limit(),
            "must be at least 1",
        ));
    }

    if config.browser.poll_interval.is_zero() {
        return Err(ConfigError::invalid(
            "index.poll_interval_ms",
            config.browser.poll_interval.as_millis().to_string(),
            sources.source_for_poll_interval(),
            "must be greater than zero",
        ));
    }

    Ok(())
}
