//! Terminal front end.
//!
//! The screen is split into a header (connection and index badge), the tree or
//! search results on the left, the preview on the right and a status line. A
//! runtime log pane can be toggled with `F2`.

mod actions;
mod format;
mod logs;
mod render;
mod runtime;
mod state;
mod theme;

pub use logs::LoggerWidgetState;
pub use state::{App, Flow, Focus};
pub use theme::Theme;
