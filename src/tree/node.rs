use std::cmp::Ordering;

use sharetree_remote_api::{EntryDescriptor, EntryKind};

/// Where a container stands in its lazy load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionState {
    Collapsed,
    Expanding,
    Expanded,
}

/// Children only exist while expanded.
#[derive(Debug, Clone, PartialEq)]
enum Expansion {
    Collapsed,
    Expanding,
    Expanded(Vec<Node>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    name: String,
    kind: EntryKind,
    size: Option<u64>,
    expansion: Expansion,
}

impl Node {
    pub fn container(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Container,
            size: None,
            expansion: Expansion::Collapsed,
        }
    }

    pub fn leaf(name: impl Into<String>, size: Option<u64>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Leaf,
            size,
            expansion: Expansion::Collapsed,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    pub fn state(&self) -> ExpansionState {
        match self.expansion {
            Expansion::Collapsed => ExpansionState::Collapsed,
            Expansion::Expanding => ExpansionState::Expanding,
            Expansion::Expanded(_) => ExpansionState::Expanded,
        }
    }

    /// Loaded children, present only while expanded.
    pub fn children(&self) -> Option<&[Node]> {
        match &self.expansion {
            Expansion::Expanded(children) => Some(children),
            _ => None,
        }
    }

    /// Loaded child whose name equals `name` exactly.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children()?.iter().find(|child| child.name == name)
    }

    pub(super) fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        match &mut self.expansion {
            Expansion::Expanded(children) => children.iter_mut().find(|child| child.name == name),
            _ => None,
        }
    }

    pub(super) fn collapse(&mut self) {
        self.expansion = Expansion::Collapsed;
    }

    pub(super) fn mark_expanding(&mut self) {
        self.expansion = Expansion::Expanding;
    }

    pub(super) fn expand_with(&mut self, mut children: Vec<Node>) {
        children.sort_by(display_order);
        self.expansion = Expansion::Expanded(children);
    }
}

impl From<EntryDescriptor> for Node {
    fn from(entry: EntryDescriptor) -> Self {
        match entry.kind {
            EntryKind::Container => Node::container(entry.name),
            EntryKind::Leaf => Node::leaf(entry.name, entry.size),
        }
    }
}

/// Containers first, then by name ignoring case.
pub(crate) fn display_order(a: &Node, b: &Node) -> Ordering {
    b.is_container()
        .cmp(&a.is_container())
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}
