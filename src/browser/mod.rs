//! The orchestrator behind the share browser.
//!
//! [`Browser`] is a cheap handle over shared state and the remote client. All
//! work runs on one cooperative thread (a tokio `LocalSet`); state is borrowed
//! only between awaits, and every async completion re-checks the connection
//! epoch or its own generation before writing.

mod expansion;
mod indexing;
mod options;
mod preview;
mod search;

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

use log::{info, warn};
use sharetree_remote_api::{ConnectionContext, RemoteError, RemoteHierarchy};
use tokio::sync::Notify;
use tokio::time::Instant;

pub use expansion::{NavigationOutcome, ToggleOutcome};
pub use options::BrowserOptions;

use crate::indexing::IndexCoordinator;
use crate::preview::{PreviewDispatcher, PreviewSlot};
use crate::search::{SearchState, SearchView};
use crate::session::Session;
use crate::tree::{ExpansionState, TreePath, TreeState};

/// A node marked active after navigation, until `until`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub path: TreePath,
    pub until: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub is_error: bool,
}

/// An expansion in flight: the request that owns the node and the signal its
/// joiners wait on.
#[derive(Debug)]
struct Waiter {
    request: u64,
    notify: Rc<Notify>,
}

#[derive(Debug, Default)]
pub struct BrowserState {
    session: Session,
    tree: TreeState,
    waiters: HashMap<TreePath, Waiter>,
    next_request: u64,
    highlight: Option<Highlight>,
    focus: Option<TreePath>,
    search: SearchState,
    index: IndexCoordinator,
    preview: PreviewSlot,
    notice: Option<Notice>,
}

impl BrowserState {
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn tree(&self) -> &TreeState {
        &self.tree
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn index(&self) -> &IndexCoordinator {
        &self.index
    }

    pub fn preview(&self) -> &PreviewSlot {
        &self.preview
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Active node at `now`, if its highlight has not expired.
    pub fn highlighted(&self, now: Instant) -> Option<&TreePath> {
        self.highlight
            .as_ref()
            .filter(|highlight| now < highlight.until)
            .map(|highlight| &highlight.path)
    }

    /// Whether an expansion of `path` is in flight.
    pub fn is_expanding(&self, path: &TreePath) -> bool {
        self.tree
            .get_node(path)
            .is_some_and(|node| node.state() == ExpansionState::Expanding)
    }

    /// Mark `path` as expanding and return the id of the request that owns
    /// it, or `None` when the node cannot start expanding.
    fn begin_expansion(&mut self, path: &TreePath) -> Option<u64> {
        if !self
            .tree
            .set_expansion_state(path, ExpansionState::Expanding)
        {
            return None;
        }
        self.next_request = self.next_request.wrapping_add(1);
        let request = self.next_request;
        self.waiters.insert(
            path.clone(),
            Waiter {
                request,
                notify: Rc::new(Notify::new()),
            },
        );
        Some(request)
    }

    /// Whether `request` is still the expansion of record for `path`.
    fn owns_expansion(&self, path: &TreePath, request: u64) -> bool {
        self.waiters
            .get(path)
            .is_some_and(|waiter| waiter.request == request)
    }

    fn joinable(&self, path: &TreePath) -> Option<Rc<Notify>> {
        self.waiters
            .get(path)
            .map(|waiter| Rc::clone(&waiter.notify))
    }

    fn release_waiter(&mut self, path: &TreePath) {
        if let Some(waiter) = self.waiters.remove(path) {
            waiter.notify.notify_waiters();
        }
    }

    /// Collapse `path` and end every expansion in flight at or below it.
    fn collapse(&mut self, path: &TreePath) {
        self.tree
            .set_expansion_state(path, ExpansionState::Collapsed);
        let ended: Vec<TreePath> = self
            .waiters
            .keys()
            .filter(|pending| pending.starts_with(path))
            .cloned()
            .collect();
        for pending in ended {
            self.release_waiter(&pending);
        }
    }

    /// Re-run the local filter after loaded nodes changed.
    fn refresh_local_filter(&mut self) {
        if matches!(self.search.view(), SearchView::LocalFilter(_)) {
            let matches = self.tree.filter_loaded(self.search.trimmed());
            self.search.show_local(matches);
        }
    }

    fn reset_for_connect(&mut self) -> u64 {
        let epoch = self.session.begin_connect();
        self.tree = TreeState::default();
        for (_, waiter) in self.waiters.drain() {
            waiter.notify.notify_waiters();
        }
        self.highlight = None;
        self.focus = None;
        self.search.reset();
        self.index.reset();
        self.preview.clear();
        self.notice = None;
        epoch
    }
}

/// Handle shared by the UI and the tasks it spawns.
#[derive(Clone)]
pub struct Browser {
    state: Rc<RefCell<BrowserState>>,
    remote: Rc<dyn RemoteHierarchy>,
    options: Rc<BrowserOptions>,
    dispatcher: PreviewDispatcher,
}

impl Browser {
    pub fn new(remote: Rc<dyn RemoteHierarchy>, options: BrowserOptions) -> Self {
        Self {
            state: Rc::new(RefCell::new(BrowserState::default())),
            remote,
            options: Rc::new(options),
            dispatcher: PreviewDispatcher,
        }
    }

    pub fn state(&self) -> Ref<'_, BrowserState> {
        self.state.borrow()
    }

    fn state_mut(&self) -> RefMut<'_, BrowserState> {
        self.state.borrow_mut()
    }

    pub fn options(&self) -> &BrowserOptions {
        &self.options
    }

    /// Replace the session with a connection through `context`.
    ///
    /// Everything tied to the previous connection is reset first. On success
    /// indexing starts (when the connection can be indexed) and the first
    /// collection is expanded.
    pub async fn connect(&self, context: ConnectionContext) -> Result<(), RemoteError> {
        let epoch = self.state_mut().reset_for_connect();
        info!("connecting to {}", context.label());

        let collections = match self.remote.list_collections(&context).await {
            Ok(collections) => collections,
            Err(err) => {
                warn!("connecting to {} failed: {err}", context.label());
                self.state_mut().session.fail(epoch, err.to_string());
                return Err(err);
            }
        };

        let first = {
            let mut state = self.state_mut();
            if !state.session.establish(epoch, context, collections) {
                return Ok(());
            }
            let collections = state.session.collections().to_vec();
            state.tree = TreeState::from_collections(&collections);
            info!("connected: {} collection(s)", collections.len());
            state.tree.first_root()
        };

        if self.options.auto_index {
            self.start_indexing();
        }

        if self.options.expand_first
            && let Some(root) = first
        {
            self.toggle(&root).await?;
        }
        Ok(())
    }

    /// Connect again with the current context.
    pub async fn reconnect(&self) -> Result<(), RemoteError> {
        let context = self.state().session.context().cloned();
        match context {
            Some(context) => self.connect(context).await,
            None => Ok(()),
        }
    }

    /// Record a message for the status line.
    pub fn notify(&self, message: impl Into<String>) {
        self.state_mut().notice = Some(Notice {
            message: message.into(),
            is_error: false,
        });
    }

    /// Record an error message for the status line.
    pub fn alert(&self, message: impl Into<String>) {
        self.state_mut().notice = Some(Notice {
            message: message.into(),
            is_error: true,
        });
    }

    /// Record a failed remote call for the status line.
    pub fn report(&self, action: &str, error: &RemoteError) {
        warn!("{action} failed: {error}");
        self.alert(format!("{action}: {error}"));
    }

    pub fn dismiss_notice(&self) {
        self.state_mut().notice = None;
    }

    /// Path the tree cursor should move to, consumed once.
    pub fn take_focus(&self) -> Option<TreePath> {
        self.state_mut().focus.take()
    }
}

#[cfg(test)]
mod tests;
