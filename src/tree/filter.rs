use std::collections::HashSet;

use super::{Node, TreePath, TreeState};

/// Outcome of filtering the already loaded nodes by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalMatches {
    query: String,
    matched: HashSet<TreePath>,
    visible: HashSet<TreePath>,
}

impl LocalMatches {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_match(&self, path: &TreePath) -> bool {
        self.matched.contains(path)
    }

    /// A match itself or an ancestor of one.
    pub fn is_visible(&self, path: &TreePath) -> bool {
        self.visible.contains(path)
    }

    pub fn match_count(&self) -> usize {
        self.matched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }
}

impl TreeState {
    /// Case-insensitive substring match over node names that are already
    /// loaded. Never triggers a fetch.
    pub fn filter_loaded(&self, query: &str) -> LocalMatches {
        let needle = query.trim().to_lowercase();
        let mut matches = LocalMatches {
            query: query.trim().to_string(),
            ..LocalMatches::default()
        };
        if needle.is_empty() {
            return matches;
        }
        for root in self.roots() {
            collect(root, TreePath::root(root.name()), &needle, &mut matches);
        }
        matches
    }
}

fn collect(node: &Node, path: TreePath, needle: &str, matches: &mut LocalMatches) {
    if let Some(children) = node.children() {
        for child in children {
            collect(child, path.child(child.name()), needle, matches);
        }
    }
    if node.name().to_lowercase().contains(needle) {
        for ancestor in path.ancestors() {
            matches.visible.insert(ancestor);
        }
        matches.visible.insert(path.clone());
        matches.matched.insert(path);
    }
}
