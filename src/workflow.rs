use std::rc::Rc;

use anyhow::Result;
use log::warn;
use sharetree::app_dirs;
use sharetree::{App, Browser};
use sharetree_remote_api::{ConnectionContext, HttpHierarchy};

use crate::settings::ResolvedConfig;

/// Folder under the data directory that receives saved previews.
const DOWNLOADS_DIR: &str = "downloads";

/// Coordinates building and running the interactive browser.
pub(crate) struct BrowseWorkflow {
    app: App<'static>,
    context: ConnectionContext,
    reveal: Option<String>,
}

impl BrowseWorkflow {
    pub(crate) fn from_config(config: ResolvedConfig) -> Result<Self> {
        let ResolvedConfig {
            server,
            context,
            timeout,
            browser,
            log_level: _,
            initial_query,
            reveal,
        } = config;

        let remote = HttpHierarchy::new(server, timeout)?;
        let mut app = App::new(Browser::new(Rc::new(remote), browser));
        match app_dirs::get_data_dir() {
            Ok(dir) => app = app.with_downloads(dir.join(DOWNLOADS_DIR)),
            Err(err) => warn!("saving previews is disabled: {err}"),
        }
        if let Some(query) = initial_query {
            app = app.with_query(&query);
        }

        Ok(Self {
            app,
            context,
            reveal,
        })
    }

    /// Connect and hand the terminal to the UI. Must be polled inside a
    /// `LocalSet`.
    pub(crate) async fn run(self) -> Result<()> {
        let Self {
            mut app,
            context,
            reveal,
        } = self;
        app.start(context, reveal);
        app.run().await
    }
}
