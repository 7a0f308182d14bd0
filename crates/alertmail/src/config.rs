//! Alert configuration.
//!
//! Read from TOML:
//!
//! ```toml
//! server = "192.168.1.10"
//! port = 25
//! sender = "keepalived@example.com"
//! id = "LVS_PROD"
//! timeout_secs = 30
//! recipients = ["ops@example.com", "oncall@example.com"]
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::Address;

/// Conventional SMTP relay port.
pub const DEFAULT_PORT: u16 = 25;

/// Default timeout for the connect and for every read and write wait.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings shared by every alert sent from this process.
#[derive(Debug, Clone)]
pub struct AlertConfig {
    /// Relay address.
    pub server: SocketAddr,
    /// Envelope sender.
    pub sender: Address,
    /// Tag prefixed to every subject, e.g. the load balancer name.
    pub id: String,
    /// Name announced with `HELO`; the system host name when unset.
    pub helo_name: Option<String>,
    /// Timeout for the connect and for each read and write wait.
    pub timeout: Duration,
    /// Ordered recipients, shared read-only with every attempt.
    pub recipients: Arc<[Address]>,
}

/// On-disk layout of [`AlertConfig`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    server: IpAddr,
    #[serde(default = "default_port")]
    port: u16,
    sender: Address,
    id: String,
    helo_name: Option<String>,
    timeout_secs: Option<u64>,
    #[serde(default)]
    recipients: Vec<Address>,
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

impl From<RawConfig> for AlertConfig {
    fn from(raw: RawConfig) -> Self {
        Self {
            server: SocketAddr::new(raw.server, raw.port),
            sender: raw.sender,
            id: raw.id,
            helo_name: raw.helo_name,
            timeout: raw.timeout_secs.map_or(DEFAULT_TIMEOUT, Duration::from_secs),
            recipients: raw.recipients.into(),
        }
    }
}

impl AlertConfig {
    /// Creates a configuration builder.
    #[must_use]
    pub fn builder(server: SocketAddr, sender: Address, id: impl Into<String>) -> AlertConfigBuilder {
        AlertConfigBuilder::new(server, sender, id)
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the document is malformed, misses a
    /// required key or holds an invalid address.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str::<RawConfig>(content)
            .map(Self::from)
            .map_err(|e| Error::Config(e.to_string()))
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Returns the name to announce with `HELO`.
    #[must_use]
    pub fn local_name(&self) -> String {
        self.helo_name.clone().unwrap_or_else(|| {
            gethostname::gethostname()
                .to_string_lossy()
                .into_owned()
        })
    }
}

/// Builder for [`AlertConfig`].
#[derive(Debug, Clone)]
pub struct AlertConfigBuilder {
    server: SocketAddr,
    sender: Address,
    id: String,
    helo_name: Option<String>,
    timeout: Duration,
    recipients: Vec<Address>,
}

impl AlertConfigBuilder {
    /// Creates a builder with no recipients and the default timeout.
    #[must_use]
    pub fn new(server: SocketAddr, sender: Address, id: impl Into<String>) -> Self {
        Self {
            server,
            sender,
            id: id.into(),
            helo_name: None,
            timeout: DEFAULT_TIMEOUT,
            recipients: Vec::new(),
        }
    }

    /// Sets the `HELO` name.
    #[must_use]
    pub fn helo_name(mut self, name: impl Into<String>) -> Self {
        self.helo_name = Some(name.into());
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Appends a recipient.
    #[must_use]
    pub fn recipient(mut self, address: Address) -> Self {
        self.recipients.push(address);
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> AlertConfig {
        AlertConfig {
            server: self.server,
            sender: self.sender,
            id: self.id,
            helo_name: self.helo_name,
            timeout: self.timeout,
            recipients: self.recipients.into(),
        }
    }
}
