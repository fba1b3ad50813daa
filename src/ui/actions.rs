use std::future::Future;

use log::{info, warn};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use sharetree_remote_api::{EntryKind, MatchScope, RemoteError};

use super::state::{App, Flow, Focus};
use crate::preview::PreviewState;
use crate::search::SearchView;
use crate::tree::ExpansionState;

const PREVIEW_PAGE: u16 = 10;

impl<'a> App<'a> {
    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }
        if self.browser.state().notice().is_some() {
            self.browser.dismiss_notice();
        }
        if key.code == KeyCode::F(2) {
            self.toggle_logs();
            return Flow::Continue;
        }
        match self.focus {
            Focus::Tree => return self.handle_tree_key(key),
            Focus::Search => self.handle_search_key(key),
            Focus::Results => self.handle_results_key(key),
            Focus::Logs => self.handle_logs_key(key),
        }
        Flow::Continue
    }

    fn handle_tree_key(&mut self, key: KeyEvent) -> Flow {
        match key.code {
            KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Home | KeyCode::Char('g') => self.move_selection(isize::MIN),
            KeyCode::End | KeyCode::Char('G') => self.move_selection(isize::MAX),
            KeyCode::Enter | KeyCode::Right | KeyCode::Char(' ') => self.activate_selected(),
            KeyCode::Left => self.collapse_or_ascend(),
            KeyCode::Char('/') => self.focus = Focus::Search,
            KeyCode::Char('R') => {
                let browser = self.browser.clone();
                self.spawn("Reconnect", async move { browser.reconnect().await });
            }
            KeyCode::Char('C') => {
                if !self.browser.clear_index() {
                    self.browser.alert("Only share locations can be indexed");
                }
            }
            KeyCode::Tab if self.show_logs => self.focus = Focus::Logs,
            KeyCode::Esc => self.browser.close_preview(),
            _ => self.handle_preview_key(key),
        }
        Flow::Continue
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.clear_search(),
            KeyCode::Tab => self.focus = Focus::Tree,
            KeyCode::Enter | KeyCode::Down => self.leave_search_box(key.code),
            KeyCode::Char('n') if control => self.browser.set_match_scope(MatchScope::Name),
            KeyCode::Char('p') if control => self.browser.set_match_scope(MatchScope::Path),
            KeyCode::Char('t') if control => self.browser.cycle_kind_filter(),
            KeyCode::Char('e') if control => self.browser.toggle_exact(),
            _ => {
                if self.input.input(key) {
                    let text = self.query_text();
                    self.browser.set_query(&text);
                }
            }
        }
    }

    fn leave_search_box(&mut self, code: KeyCode) {
        let view = self.browser.state().search().view().clone();
        match view {
            SearchView::Results(results) if !results.hits.is_empty() => {
                self.results_state.select(Some(0));
                self.focus = Focus::Results;
            }
            SearchView::Failed { .. } if code == KeyCode::Enter => self.browser.retry_search(),
            SearchView::Tree | SearchView::LocalFilter(_) => self.focus = Focus::Tree,
            _ => {}
        }
    }

    fn handle_results_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_result(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_result(1),
            KeyCode::Enter => self.open_selected_result(),
            KeyCode::Char('l') => self.locate_selected_result(),
            KeyCode::Char('r') => self.browser.retry_search(),
            KeyCode::Esc => self.clear_search(),
            KeyCode::Char('/') | KeyCode::Tab => self.focus = Focus::Search,
            _ => self.handle_preview_key(key),
        }
    }

    fn handle_logs_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Tab {
            self.focus = Focus::Tree;
            return;
        }
        self.logs.handle_key(key);
    }

    fn handle_preview_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::PageDown => {
                self.preview_scroll = self.preview_scroll.saturating_add(PREVIEW_PAGE);
            }
            KeyCode::PageUp => {
                self.preview_scroll = self.preview_scroll.saturating_sub(PREVIEW_PAGE);
            }
            KeyCode::Char('s') => self.save_preview(),
            _ => {}
        }
    }

    fn toggle_logs(&mut self) {
        if self.show_logs {
            self.show_logs = false;
            if self.focus == Focus::Logs {
                self.focus = Focus::Tree;
            }
        } else {
            self.show_logs = true;
            self.focus = Focus::Logs;
        }
    }

    fn clear_search(&mut self) {
        self.reset_input();
        self.browser.clear_query();
        self.focus = Focus::Tree;
    }

    fn move_selection(&mut self, delta: isize) {
        let rows = self.visible_rows();
        if rows.is_empty() {
            self.selected = None;
            return;
        }
        let current = self.selected_index(&rows).unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(rows.len() - 1);
        self.selected = Some(rows[next].path.clone());
        self.tree_state.select(Some(next));
    }

    fn move_result(&mut self, delta: isize) {
        let count = self.result_count();
        if count == 0 {
            return;
        }
        let current = self.results_state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(count - 1);
        self.results_state.select(Some(next));
    }

    fn activate_selected(&mut self) {
        let Some(path) = self.selected.clone() else {
            return;
        };
        let browser = self.browser.clone();
        self.spawn("Open", async move { browser.activate(&path).await });
    }

    /// Collapse an open container, otherwise move to the parent.
    fn collapse_or_ascend(&mut self) {
        let Some(path) = self.selected.clone() else {
            return;
        };
        let expanded = self
            .browser
            .state()
            .tree()
            .get_node(&path)
            .is_some_and(|node| node.state() == ExpansionState::Expanded);
        if expanded {
            let browser = self.browser.clone();
            self.spawn("Collapse", async move { browser.toggle(&path).await });
        } else if let Some(parent) = path.parent() {
            self.selected = Some(parent);
        }
    }

    fn selected_result_kind(&self) -> Option<(usize, EntryKind)> {
        let index = self.results_state.selected()?;
        let state = self.browser.state();
        let hit = state.search().results()?.hits.get(index)?;
        Some((index, hit.kind))
    }

    fn open_selected_result(&mut self) {
        let Some((index, kind)) = self.selected_result_kind() else {
            return;
        };
        if kind == EntryKind::Container {
            self.reset_input();
            self.focus = Focus::Tree;
        }
        let browser = self.browser.clone();
        self.spawn("Open", async move { browser.open_result(index).await });
    }

    fn locate_selected_result(&mut self) {
        let Some((index, _)) = self.selected_result_kind() else {
            return;
        };
        self.reset_input();
        self.focus = Focus::Tree;
        let browser = self.browser.clone();
        self.spawn("Locate", async move { browser.locate_result(index).await });
    }

    fn save_preview(&mut self) {
        let Some(dir) = self.downloads.clone() else {
            self.browser.alert("No data directory to save into");
            return;
        };
        let saved = match self.browser.state().preview().state() {
            PreviewState::Ready(content) => Some(content.save_to(&dir)),
            _ => None,
        };
        match saved {
            None => self.browser.notify("Nothing to save"),
            Some(Ok(path)) => {
                info!("saved {}", path.display());
                self.browser.notify(format!("Saved {}", path.display()));
            }
            Some(Err(err)) => {
                warn!("saving into {} failed: {err}", dir.display());
                self.browser.alert(format!("Save: {err}"));
            }
        }
    }

    /// Run a browser operation in the background, reporting its failure on
    /// the status line.
    fn spawn<T, F>(&self, action: &'static str, task: F)
    where
        T: 'static,
        F: Future<Output = Result<T, RemoteError>> + 'static,
    {
        let browser = self.browser.clone();
        tokio::task::spawn_local(async move {
            if let Err(err) = task.await {
                browser.report(action, &err);
            }
        });
    }
}
