//! In-memory model of the share hierarchy.
//!
//! [`TreeState`] is the single source of truth for what the tree pane shows.
//! Nodes are addressed by [`TreePath`]; containers hold children only while
//! expanded, and a collapse discards them.

mod filter;
mod node;
mod path;

pub use filter::LocalMatches;
pub use node::{ExpansionState, Node};
pub use path::TreePath;
pub(crate) use path::split_segments;

use sharetree_remote_api::{Collection, EntryKind};

/// Flattened, render-ready view of one visible node.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRow {
    pub path: TreePath,
    pub name: String,
    pub kind: EntryKind,
    pub size: Option<u64>,
    pub state: ExpansionState,
    pub depth: usize,
    /// Set when a local filter is active and this row matched it directly.
    pub matched: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeState {
    roots: Vec<Node>,
}

impl TreeState {
    pub fn from_collections(collections: &[Collection]) -> Self {
        Self {
            roots: collections
                .iter()
                .map(|collection| Node::container(collection.name.clone()))
                .collect(),
        }
    }

    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn first_root(&self) -> Option<TreePath> {
        self.roots.first().map(|root| TreePath::root(root.name()))
    }

    pub fn get_node(&self, path: &TreePath) -> Option<&Node> {
        let mut node = self
            .roots
            .iter()
            .find(|root| root.name() == path.collection())?;
        for segment in path.segments() {
            node = node.child(segment)?;
        }
        Some(node)
    }

    fn get_node_mut(&mut self, path: &TreePath) -> Option<&mut Node> {
        let mut node = self
            .roots
            .iter_mut()
            .find(|root| root.name() == path.collection())?;
        for segment in path.segments() {
            node = node.child_mut(segment)?;
        }
        Some(node)
    }

    /// Install loaded children. Only an `Expanding` container accepts them;
    /// any other state means the result is stale and it is dropped.
    pub fn set_children(&mut self, path: &TreePath, children: impl IntoIterator<Item = Node>) -> bool {
        match self.get_node_mut(path) {
            Some(node) if node.state() == ExpansionState::Expanding => {
                node.expand_with(children.into_iter().collect());
                true
            }
            _ => false,
        }
    }

    /// Move a container to `Collapsed` (dropping its children) or from
    /// `Collapsed` to `Expanding`. `Expanded` is only reached through
    /// [`set_children`](Self::set_children).
    pub fn set_expansion_state(&mut self, path: &TreePath, state: ExpansionState) -> bool {
        let Some(node) = self.get_node_mut(path) else {
            return false;
        };
        if !node.is_container() {
            return false;
        }
        match (state, node.state()) {
            (ExpansionState::Collapsed, _) => {
                node.collapse();
                true
            }
            (ExpansionState::Expanding, ExpansionState::Collapsed) => {
                node.mark_expanding();
                true
            }
            _ => false,
        }
    }

    /// Depth-first projection of what is on screen. With `filter`, only
    /// matches and their ancestors are emitted.
    pub fn rows(&self, filter: Option<&LocalMatches>) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        for root in &self.roots {
            let path = TreePath::root(root.name());
            push_rows(root, path, 0, filter, &mut rows);
        }
        rows
    }
}

fn push_rows(
    node: &Node,
    path: TreePath,
    depth: usize,
    filter: Option<&LocalMatches>,
    rows: &mut Vec<TreeRow>,
) {
    if let Some(filter) = filter
        && !filter.is_visible(&path)
    {
        return;
    }
    let matched = filter.is_some_and(|filter| filter.is_match(&path));
    if let Some(children) = node.children() {
        rows.push(row(node, path.clone(), depth, matched));
        for child in children {
            push_rows(child, path.child(child.name()), depth + 1, filter, rows);
        }
    } else {
        rows.push(row(node, path, depth, matched));
    }
}

fn row(node: &Node, path: TreePath, depth: usize, matched: bool) -> TreeRow {
    TreeRow {
        path,
        name: node.name().to_string(),
        kind: node.kind(),
        size: node.size(),
        state: node.state(),
        depth,
        matched,
    }
}
