use std::fmt;

/// Identity of a node: the collection it lives in plus the segments below it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreePath {
    collection: String,
    segments: Vec<String>,
}

impl TreePath {
    pub fn root(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            segments: Vec::new(),
        }
    }

    /// Build a path from a `/` separated string relative to `collection`.
    /// Empty segments are dropped.
    pub fn from_relative(collection: impl Into<String>, relative: &str) -> Self {
        Self {
            collection: collection.into(),
            segments: split_segments(relative),
        }
    }

    #[must_use]
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self {
            collection: self.collection.clone(),
            segments,
        }
    }

    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            collection: self.collection.clone(),
            segments: rest.to_vec(),
        })
    }

    /// Every proper ancestor, from the collection root down.
    #[must_use]
    pub fn ancestors(&self) -> Vec<Self> {
        (0..self.segments.len())
            .map(|depth| Self {
                collection: self.collection.clone(),
                segments: self.segments[..depth].to_vec(),
            })
            .collect()
    }

    /// Whether `self` is `ancestor` or lies below it.
    pub fn starts_with(&self, ancestor: &TreePath) -> bool {
        self.collection == ancestor.collection && self.segments.starts_with(&ancestor.segments)
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Display name of the addressed node.
    pub fn name(&self) -> &str {
        self.segments.last().unwrap_or(&self.collection)
    }

    /// The path below the collection, as sent to the backend.
    pub fn relative(&self) -> String {
        self.segments.join("/")
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.collection)?;
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

pub(crate) fn split_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
