//! Runtime logging into the in-UI log pane.
//!
//! Records go through the `log` facade into `tui-logger`, whose background
//! thread moves them into the history the log pane renders.

use std::sync::Once;

use log::LevelFilter;

static INIT: Once = Once::new();

/// Install the logger with `level` as the default filter. Later calls only
/// adjust the level.
pub fn initialize(level: LevelFilter) {
    INIT.call_once(|| {
        if let Err(err) = tui_logger::init_logger(LevelFilter::Trace) {
            eprintln!("sharetree: logging disabled: {err}");
        }
    });
    tui_logger::set_default_level(level);
    log::set_max_level(level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reinitializing_only_moves_the_level() {
        initialize(LevelFilter::Info);
        assert_eq!(log::max_level(), LevelFilter::Info);

        initialize(LevelFilter::Debug);
        assert_eq!(log::max_level(), LevelFilter::Debug);
        log::debug!("recorded without a draining call");
    }
}
