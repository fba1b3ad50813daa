//! Connection bookkeeping: which context requests are addressed with, and the
//! epoch that invalidates work started under an earlier connection.

use sharetree_remote_api::{Collection, ConnectionContext, Scope};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct Session {
    context: Option<ConnectionContext>,
    collections: Vec<Collection>,
    epoch: u64,
    status: ConnectionStatus,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            context: None,
            collections: Vec::new(),
            epoch: 0,
            status: ConnectionStatus::Disconnected,
        }
    }
}

impl Session {
    /// Start a new connection attempt. Clears the current context and returns
    /// the epoch the attempt runs under.
    pub fn begin_connect(&mut self) -> u64 {
        self.epoch = self.epoch.wrapping_add(1);
        self.context = None;
        self.collections.clear();
        self.status = ConnectionStatus::Connecting;
        self.epoch
    }

    /// Install the outcome of a successful attempt. A location published on
    /// the first collection, the one navigation walks, supersedes host
    /// addressing for the rest of the session.
    pub fn establish(
        &mut self,
        epoch: u64,
        requested: ConnectionContext,
        collections: Vec<Collection>,
    ) -> bool {
        if !self.is_current(epoch) {
            return false;
        }
        let context = match requested {
            ConnectionContext::Host { .. } => collections
                .first()
                .and_then(|collection| collection.location.clone())
                .map(ConnectionContext::Location)
                .unwrap_or(requested),
            located => located,
        };
        self.context = Some(context);
        self.collections = collections;
        self.status = ConnectionStatus::Connected;
        true
    }

    pub fn fail(&mut self, epoch: u64, message: impl Into<String>) -> bool {
        if !self.is_current(epoch) {
            return false;
        }
        self.status = ConnectionStatus::Failed(message.into());
        true
    }

    pub fn is_current(&self, epoch: u64) -> bool {
        self.epoch == epoch
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn status(&self) -> &ConnectionStatus {
        &self.status
    }

    pub fn context(&self) -> Option<&ConnectionContext> {
        self.context.as_ref()
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections
            .iter()
            .find(|collection| collection.name == name)
    }

    /// Scope for requests below `collection`.
    pub fn scope_for(&self, collection: &str) -> Option<Scope> {
        let context = self.context.as_ref()?;
        if let Some(location) = self
            .collection(collection)
            .and_then(|entry| entry.location.clone())
        {
            return Some(Scope::Location(location));
        }
        match context {
            ConnectionContext::Location(location) => Some(Scope::Location(location.clone())),
            ConnectionContext::Host { host, credentials } => Some(Scope::Share {
                host: host.clone(),
                credentials: credentials.clone(),
                share: collection.to_string(),
            }),
        }
    }

    /// Scope for search and indexing. Only a resolved location can be
    /// indexed; host addressing has no index capability.
    pub fn index_scope(&self) -> Option<Scope> {
        self.context
            .as_ref()?
            .location()
            .map(|location| Scope::Location(location.to_string()))
    }
}
