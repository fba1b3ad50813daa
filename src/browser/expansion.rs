use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use sharetree_remote_api::{EntryKind, RemoteError};
use tokio::sync::Notify;
use tokio::time::Instant;

use super::{Browser, BrowserState, Highlight};
use crate::tree::{ExpansionState, Node, TreePath, split_segments};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Expanded,
    Collapsed,
    /// Leaf, unknown node, or an expansion already in flight.
    Ignored,
    /// The node was collapsed or the connection changed while the listing
    /// was in flight.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The target is expanded (when a container) and marked active.
    Revealed(TreePath),
    /// The target leaf was opened in the preview.
    Opened(TreePath),
    /// A segment had no matching child; `missing` is the first absent path.
    NotFound { missing: String },
    Stale,
}

/// Reverts a node to `Collapsed` if its listing future is dropped before
/// completing.
struct PendingExpansion<'a> {
    state: &'a RefCell<BrowserState>,
    path: &'a TreePath,
    request: u64,
    settled: bool,
}

impl PendingExpansion<'_> {
    fn settle(mut self) {
        self.settled = true;
    }
}

impl Drop for PendingExpansion<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let Ok(mut state) = self.state.try_borrow_mut() else {
            return;
        };
        if state.owns_expansion(self.path, self.request) {
            debug!("expansion of {} abandoned", self.path);
            state.collapse(self.path);
        }
    }
}

enum Readiness {
    Done(bool),
    Wait(Rc<Notify>),
    Start,
}

impl Browser {
    /// Flip a container between collapsed and expanded. Collapsing discards
    /// the children; expanding always lists them again.
    pub async fn toggle(&self, path: &TreePath) -> Result<ToggleOutcome, RemoteError> {
        let current = self
            .state()
            .tree
            .get_node(path)
            .filter(|node| node.is_container())
            .map(Node::state);
        match current {
            None | Some(ExpansionState::Expanding) => Ok(ToggleOutcome::Ignored),
            Some(ExpansionState::Expanded) => {
                let mut state = self.state_mut();
                state.collapse(path);
                state.refresh_local_filter();
                Ok(ToggleOutcome::Collapsed)
            }
            Some(ExpansionState::Collapsed) => self.expand(path).await,
        }
    }

    /// What a tree click does: toggle a container, open a leaf.
    pub async fn activate(&self, path: &TreePath) -> Result<(), RemoteError> {
        let kind = self.state().tree.get_node(path).map(Node::kind);
        match kind {
            Some(EntryKind::Container) => self.toggle(path).await.map(drop),
            Some(EntryKind::Leaf) => {
                self.open_file(path).await;
                Ok(())
            }
            None => Ok(()),
        }
    }

    async fn expand(&self, path: &TreePath) -> Result<ToggleOutcome, RemoteError> {
        let (request, scope) = {
            let mut state = self.state_mut();
            let Some(scope) = state.session.scope_for(path.collection()) else {
                return Ok(ToggleOutcome::Ignored);
            };
            let Some(request) = state.begin_expansion(path) else {
                return Ok(ToggleOutcome::Ignored);
            };
            (request, scope)
        };

        let pending = PendingExpansion {
            state: &self.state,
            path,
            request,
            settled: false,
        };
        debug!("listing {path}");
        let listing = self.remote.list_children(&scope, &path.relative()).await;
        pending.settle();

        // A collapse above the node or a reconnect ends the request; a later
        // expansion of the same path then owns the node.
        let mut state = self.state_mut();
        if !state.owns_expansion(path, request) {
            debug!("listing of {path} superseded");
            return Ok(ToggleOutcome::Stale);
        }
        match listing {
            Ok(entries) => {
                debug!("{path}: {} entries", entries.len());
                state.tree.set_children(path, entries.into_iter().map(Node::from));
                state.release_waiter(path);
                state.refresh_local_filter();
                Ok(ToggleOutcome::Expanded)
            }
            Err(err) => {
                state.collapse(path);
                Err(err)
            }
        }
    }

    /// Make sure `path` is expanded, joining an in-flight expansion instead of
    /// issuing a second listing. Returns `false` if the node is gone.
    async fn ensure_expanded(&self, path: &TreePath) -> Result<bool, RemoteError> {
        loop {
            let readiness = {
                let state = self.state();
                match state.tree.get_node(path).map(Node::state) {
                    None => Readiness::Done(false),
                    Some(ExpansionState::Expanded) => Readiness::Done(true),
                    Some(ExpansionState::Collapsed) => Readiness::Start,
                    Some(ExpansionState::Expanding) => match state.joinable(path) {
                        Some(notify) => Readiness::Wait(notify),
                        None => Readiness::Done(false),
                    },
                }
            };
            match readiness {
                Readiness::Done(expanded) => return Ok(expanded),
                Readiness::Wait(notify) => notify.notified().await,
                Readiness::Start => {
                    return Ok(self.expand(path).await? == ToggleOutcome::Expanded);
                }
            }
        }
    }

    /// Walk `target` (a `/`-separated path below the first collection),
    /// expanding each container on the way.
    ///
    /// With `open_leaf`, a leaf target is opened the same way a tree click
    /// opens it. Otherwise the target is expanded if it is a container and
    /// marked active for the configured highlight duration.
    pub async fn expand_to_path(
        &self,
        target: &str,
        open_leaf: bool,
    ) -> Result<NavigationOutcome, RemoteError> {
        let (epoch, root) = {
            let state = self.state();
            (state.session.epoch(), state.tree.first_root())
        };
        let Some(root) = root else {
            return Ok(NavigationOutcome::NotFound {
                missing: target.to_string(),
            });
        };
        if !self.ensure_expanded(&root).await? {
            return Ok(self.interrupted(epoch, &root));
        }

        let segments = split_segments(target);
        let mut current = root;
        for (index, segment) in segments.iter().enumerate() {
            let kind = {
                let state = self.state();
                if !state.session.is_current(epoch) {
                    return Ok(NavigationOutcome::Stale);
                }
                state
                    .tree
                    .get_node(&current)
                    .and_then(|node| node.child(segment))
                    .map(Node::kind)
            };
            let next = current.child(segment.as_str());
            let Some(kind) = kind else {
                debug!("reveal {target}: {next} not found");
                return Ok(NavigationOutcome::NotFound {
                    missing: next.to_string(),
                });
            };

            let last = index + 1 == segments.len();
            if last && open_leaf && kind == EntryKind::Leaf {
                self.state_mut().focus = Some(next.clone());
                self.open_file(&next).await;
                return Ok(NavigationOutcome::Opened(next));
            }
            if kind.is_container() && !self.ensure_expanded(&next).await? {
                return Ok(self.interrupted(epoch, &next));
            }
            current = next;
        }

        let mut state = self.state_mut();
        if !state.session.is_current(epoch) {
            return Ok(NavigationOutcome::Stale);
        }
        state.highlight = Some(Highlight {
            path: current.clone(),
            until: Instant::now() + self.options.highlight,
        });
        state.focus = Some(current.clone());
        Ok(NavigationOutcome::Revealed(current))
    }

    fn interrupted(&self, epoch: u64, path: &TreePath) -> NavigationOutcome {
        if self.state().session.is_current(epoch) {
            NavigationOutcome::NotFound {
                missing: path.to_string(),
            }
        } else {
            NavigationOutcome::Stale
        }
    }
}
