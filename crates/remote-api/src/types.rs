use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether an entry can hold children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Container,
    Leaf,
}

impl EntryKind {
    #[must_use]
    pub fn from_is_container(is_container: bool) -> Self {
        if is_container {
            Self::Container
        } else {
            Self::Leaf
        }
    }

    #[must_use]
    pub fn is_container(self) -> bool {
        matches!(self, Self::Container)
    }
}

/// One child as reported by a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDescriptor {
    pub name: String,
    pub kind: EntryKind,
    /// Byte size; only meaningful for leaves.
    pub size: Option<u64>,
}

impl EntryDescriptor {
    pub fn container(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Container,
            size: None,
        }
    }

    pub fn leaf(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Leaf,
            size: Some(size),
        }
    }
}

/// Named top-level entry point of a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub name: String,
    /// Resolved location the backend wants subsequent requests scoped to.
    pub location: Option<String>,
    /// Free-form description published by the host.
    pub comment: Option<String>,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: None,
            comment: None,
        }
    }

    pub fn located(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: Some(location.into()),
            comment: None,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// How a connection addresses the remote store.
///
/// The two forms are mutually exclusive: once a location is known, requests
/// stop carrying host credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionContext {
    Host {
        host: String,
        credentials: Credentials,
    },
    Location(String),
}

impl ConnectionContext {
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Location(location) => Some(location),
            Self::Host { .. } => None,
        }
    }

    /// Short human readable label for headers and logs.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Host { host, credentials } if credentials.user.is_empty() => host.clone(),
            Self::Host { host, credentials } => format!("{}@{host}", credentials.user),
            Self::Location(location) => location.clone(),
        }
    }
}

/// Addressing context under which a path is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Share {
        host: String,
        credentials: Credentials,
        share: String,
    },
    Location(String),
}

impl Scope {
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Location(location) => Some(location),
            Self::Share { .. } => None,
        }
    }
}

/// Bytes and declared content type of a fetched leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFile {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_are_redacted_in_debug_output() {
        let context = ConnectionContext::Host {
            host: "fs01".into(),
            credentials: Credentials::new("alice", "hunter2"),
        };
        let rendered = format!("{context:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn labels_prefer_user_at_host() {
        let context = ConnectionContext::Host {
            host: "fs01".into(),
            credentials: Credentials::new("alice", ""),
        };
        assert_eq!(context.label(), "alice@fs01");
        assert_eq!(
            ConnectionContext::Location(r"\\fs01\Shared".into()).label(),
            r"\\fs01\Shared"
        );
    }
}
