//! Terminal browser for remote file shares.
//!
//! The [`browser::Browser`] orchestrates a lazily expanded tree, debounced
//! search and the backend index over a [`RemoteHierarchy`](sharetree_remote_api::RemoteHierarchy);
//! [`ui::App`] puts it on screen.

pub mod app_dirs;
pub mod browser;
pub mod indexing;
pub mod logging;
pub mod preview;
pub mod search;
pub mod session;
pub mod tree;
pub mod ui;

pub use browser::{Browser, BrowserOptions};
pub use ui::App;
