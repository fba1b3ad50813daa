use std::fmt;

#[derive(Debug, Clone)]
pub(crate) enum SettingSource {
    CliFlag(&'static str),
    Environment(&'static str),
    ConfigKey(&'static str),
}

impl fmt::Display for SettingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CliFlag(flag) => write!(f, "CLI flag `{flag}`"),
            Self::Environment(var) => write!(f, "environment variable `{var}`"),
            Self::ConfigKey(key) => write!(f, "configuration key `{key}`"),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct ConfigSources {
    pub(crate) server: Option<SettingSource>,
    pub(crate) timeout: Option<SettingSource>,
    pub(crate) search_limit: Option<SettingSource>,
    pub(crate) poll_interval: Option<SettingSource>,
    pub(crate) log_level: Option<SettingSource>,
}

impl ConfigSources {
    pub(crate) fn source_for_server(&self) -> SettingSource {
        self.server
            .clone()
            .unwrap_or(SettingSource::ConfigKey("connection.server"))
    }

    pub(crate) fn source_for_timeout(&self) -> SettingSource {
        self.timeout
            .clone()
            .unwrap_or(SettingSource::ConfigKey("connection.timeout_secs"))
    }

    pub(crate) fn source_for_search_limit(&self) -> SettingSource {
        self.search_limit
            .clone()
            .unwrap_or(SettingSource::ConfigKey("search.limit"))
    }

    pub(crate) fn source_for_poll_interval(&self) -> SettingSource {
        self.poll_interval
            .clone()
            .unwrap_or(SettingSource::ConfigKey("index.poll_interval_ms"))
    }

    pub(crate) fn source_for_log_level(&self) -> SettingSource {
        self.log_level
            .clone()
            .unwrap_or(SettingSource::ConfigKey("ui.log_level"))
    }
}
