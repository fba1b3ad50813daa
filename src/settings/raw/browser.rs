use std::time::Duration;

use serde::Deserialize;
use sharetree::browser::BrowserOptions;

use crate::cli::CliArgs;

/// Search tuning as read from disk.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct SearchSection {
    pub(super) limit: Option<usize>,
    pub(super) debounce_indexed_ms: Option<u64>,
    pub(super) debounce_live_ms: Option<u64>,
}

/// Background index behaviour as read from disk.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct IndexSection {
    pub(super) auto_start: Option<bool>,
    pub(super) poll_interval_ms: Option<u64>,
    pub(super) ready_fade_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct UiSection {
    pub(super) highlight_ms: Option<u64>,
    pub(super) log_level: Option<String>,
}

impl SearchSection {
    pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
        if let Some(limit) = cli.search_limit {
            self.limit = Some(limit);
        }
    }
}

impl IndexSection {
    pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
        if cli.no_index {
            self.auto_start = Some(false);
        }
    }
}

impl UiSection {
    pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
        if let Some(level) = cli.log_level {
            self.log_level = Some(level.as_str().to_string());
        }
    }
}

/// Fill [`BrowserOptions`] from the sections, keeping defaults for anything
/// left unset.
pub(super) fn browser_options(
    search: &SearchSection,
    index: &IndexSection,
    ui: &UiSection,
) -> BrowserOptions {
    let defaults = BrowserOptions::default();
    let millis = |value: Option<u64>, default: Duration| {
        value.map(Duration::from_millis).unwrap_or(default)
    };
    BrowserOptions {
        search_limit: search.limit.unwrap_or(defaults.search_limit),
        debounce_indexed: millis(search.debounce_indexed_ms, defaults.debounce_indexed),
        debounce_live: millis(search.debounce_live_ms, defaults.debounce_live),
        poll_interval: millis(index.poll_interval_ms, defaults.poll_interval),
        highlight: millis(ui.highlight_ms, defaults.highlight),
        ready_fade: millis(index.ready_fade_ms, defaults.ready_fade),
        auto_index: index.auto_start.unwrap_or(defaults.auto_index),
        expand_first: defaults.expand_first,
    }
}
