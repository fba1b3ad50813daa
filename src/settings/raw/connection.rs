use std::time::Duration;

use anyhow::{Result, bail};
use serde::Deserialize;
use sharetree_remote_api::{ConnectionContext, Credentials};

use crate::cli::CliArgs;

pub(super) const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";

/// Where to connect, as read from disk.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct ConnectionSection {
    pub(super) server: Option<String>,
    pub(super) host: Option<String>,
    pub(super) user: Option<String>,
    pub(super) password: Option<String>,
    pub(super) location: Option<String>,
    pub(super) timeout_secs: Option<u64>,
}

pub(super) struct ConnectionResolution {
    pub(super) server: String,
    pub(super) context: ConnectionContext,
    pub(super) timeout: Option<Duration>,
}

impl ConnectionSection {
    pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
        if let Some(server) = cli.server.clone() {
            self.server = Some(server);
        }
        if let Some(host) = cli.host.clone() {
            self.host = Some(host);
            self.location = None;
        }
        if let Some(location) = cli.location.clone() {
            self.location = Some(location);
            self.host = None;
        }
        if let Some(user) = cli.user.clone() {
            self.user = Some(user);
        }
        if let Some(password) = cli.password.clone() {
            self.password = Some(password);
        }
        if let Some(timeout) = cli.timeout_secs {
            self.timeout_secs = Some(timeout);
        }
    }

    pub(super) fn resolve(self) -> Result<ConnectionResolution> {
        let server = self
            .server
            .map(|server| server.trim().trim_end_matches('/').to_string())
            .filter(|server| !server.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER.to_string());

        let host = non_empty(self.host);
        let location = non_empty(self.location);
        let context = match (host, location) {
            (Some(_), Some(_)) => {
                bail!("connection.host and connection.location are mutually exclusive")
            }
            (None, Some(location)) => ConnectionContext::Location(location),
            (Some(host), None) => ConnectionContext::Host {
                host,
                credentials: Credentials::new(
                    self.user.unwrap_or_default(),
                    self.password.unwrap_or_default(),
                ),
            },
            (None, None) => bail!(
                "nothing to open: pass --host or --location, or set connection.host or connection.location"
            ),
        };

        Ok(ConnectionResolution {
            server,
            context,
            timeout: self.timeout_secs.map(Duration::from_secs),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
