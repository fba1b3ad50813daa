//! State of the terminal front end.
//!
//! [`App`] owns what only the screen cares about (cursor positions, the search
//! box, which pane has focus) and drives a [`Browser`] for everything else.
//! The tree cursor is kept as a [`TreePath`] rather than a row index so it
//! survives rows appearing and disappearing under it while listings land.

use std::path::PathBuf;

use log::debug;
use ratatui::style::Style;
use ratatui::widgets::ListState;
use sharetree_remote_api::ConnectionContext;
use throbber_widgets_tui::ThrobberState;
use tui_textarea::TextArea;

use super::logs::LoggerWidgetState;
use super::theme::Theme;
use crate::browser::{Browser, NavigationOutcome};
use crate::search::SearchView;
use crate::tree::{TreePath, TreeRow};

/// Pane receiving key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Tree,
    Search,
    Results,
    Logs,
}

/// Whether the event loop keeps going after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App<'a> {
    pub(crate) browser: Browser,
    pub(crate) input: TextArea<'a>,
    pub(crate) focus: Focus,
    pub(crate) selected: Option<TreePath>,
    pub(crate) tree_state: ListState,
    pub(crate) results_state: ListState,
    pub(crate) preview_scroll: u16,
    preview_path: Option<TreePath>,
    pub theme: Theme,
    pub(crate) throbber_state: ThrobberState,
    pub(crate) logs: LoggerWidgetState,
    pub(crate) show_logs: bool,
    pub(crate) downloads: Option<PathBuf>,
}

impl<'a> App<'a> {
    pub fn new(browser: Browser) -> Self {
        Self {
            browser,
            input: search_input(""),
            focus: Focus::Tree,
            selected: None,
            tree_state: ListState::default(),
            results_state: ListState::default(),
            preview_scroll: 0,
            preview_path: None,
            theme: Theme::default(),
            throbber_state: ThrobberState::default(),
            logs: LoggerWidgetState::new(),
            show_logs: false,
            downloads: None,
        }
    }

    /// Folder that `s` saves previewed files into.
    pub fn with_downloads(mut self, dir: PathBuf) -> Self {
        self.downloads = Some(dir);
        self
    }

    /// Prefill the search box; the query runs once connected.
    pub fn with_query(mut self, query: &str) -> Self {
        self.input = search_input(query);
        self
    }

    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn selected(&self) -> Option<&TreePath> {
        self.selected.as_ref()
    }

    /// Connect in the background, then run the prefilled query and reveal
    /// `reveal` when given.
    pub fn start(&self, context: ConnectionContext, reveal: Option<String>) {
        let browser = self.browser.clone();
        let query = self.query_text();
        tokio::task::spawn_local(async move {
            if let Err(err) = browser.connect(context).await {
                browser.report("Connect", &err);
                return;
            }
            if !query.trim().is_empty() {
                browser.set_query(&query);
            }
            let Some(path) = reveal else {
                return;
            };
            match browser.expand_to_path(&path, true).await {
                Ok(NavigationOutcome::NotFound { missing }) => {
                    debug!("reveal {path}: {missing} not found");
                }
                Ok(_) => {}
                Err(err) => browser.report("Reveal", &err),
            }
        });
    }

    pub(crate) fn query_text(&self) -> String {
        self.input.lines().join(" ")
    }

    pub(crate) fn reset_input(&mut self) {
        self.input = search_input("");
    }

    /// Rows of the tree pane, narrowed by the local filter when one is shown.
    pub(crate) fn visible_rows(&self) -> Vec<TreeRow> {
        let state = self.browser.state();
        let filter = match state.search().view() {
            SearchView::LocalFilter(matches) => Some(matches),
            _ => None,
        };
        state.tree().rows(filter)
    }

    /// Row of the cursor, falling back to its nearest visible ancestor.
    pub(crate) fn selected_index(&self, rows: &[TreeRow]) -> Option<usize> {
        let mut candidate = self.selected.clone();
        while let Some(path) = candidate {
            if let Some(index) = rows.iter().position(|row| row.path == path) {
                return Some(index);
            }
            candidate = path.parent();
        }
        None
    }

    pub(crate) fn result_count(&self) -> usize {
        self.browser
            .state()
            .search()
            .results()
            .map_or(0, |results| results.hits.len())
    }

    /// Reconcile screen state with the browser before a frame is drawn.
    pub(crate) fn sync(&mut self) {
        if let Some(path) = self.browser.take_focus() {
            self.selected = Some(path);
            if self.focus == Focus::Results {
                self.focus = Focus::Tree;
            }
        }

        let rows = self.visible_rows();
        match self.selected_index(&rows) {
            Some(index) => {
                self.selected = Some(rows[index].path.clone());
                self.tree_state.select(Some(index));
            }
            None => {
                self.selected = rows.first().map(|row| row.path.clone());
                self.tree_state.select(self.selected.as_ref().map(|_| 0));
            }
        }

        let count = self.result_count();
        if count == 0 {
            self.results_state.select(None);
        } else {
            let index = self.results_state.selected().unwrap_or(0).min(count - 1);
            self.results_state.select(Some(index));
        }
        let searching = matches!(
            self.browser.state().search().view(),
            SearchView::Results(_) | SearchView::Failed { .. }
        );
        if self.focus == Focus::Results && !searching {
            self.focus = Focus::Search;
        }

        let preview_path = self.browser.state().preview().state().path().cloned();
        if preview_path != self.preview_path {
            self.preview_scroll = 0;
            self.preview_path = preview_path;
        }
    }
}

fn search_input<'a>(text: &str) -> TextArea<'a> {
    let mut input = TextArea::new(vec![text.to_string()]);
    input.set_cursor_line_style(Style::default());
    input.set_placeholder_text("Search files and folders");
    input.move_cursor(tui_textarea::CursorMove::End);
    input
}
