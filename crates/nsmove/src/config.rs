//! The one operation this crate exists for, as an explicit configuration.
//!
//! ```ignore
//! use nsmove::config::MoveConfig;
//! use nsmove::netlink::namespace::NamespaceTarget;
//!
//! let config = MoveConfig::new(NamespaceTarget::pid(4242)?).interface("veth-host");
//! config.apply().await?;
//! ```

use std::time::Duration;

use crate::netlink::connection::DEFAULT_TIMEOUT;
use crate::netlink::namespace::NamespaceTarget;
use crate::netlink::{Connection, InterfaceHandle, Result};

/// Interface moved when none is named.
pub const DEFAULT_INTERFACE: &str = "eth0";

/// What to move, where, and how long to wait for the kernel.
#[derive(Debug)]
pub struct MoveConfig {
    /// Name of the interface to move.
    pub interface: String,
    /// Destination namespace.
    pub target: NamespaceTarget,
    /// Reply timeout; `None` waits forever.
    pub timeout: Option<Duration>,
}

impl MoveConfig {
    /// Move [`DEFAULT_INTERFACE`] into `target` with the default timeout.
    pub fn new(target: impl Into<NamespaceTarget>) -> Self {
        Self {
            interface: DEFAULT_INTERFACE.to_string(),
            target: target.into(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }

    /// Set the interface name.
    pub fn interface(mut self, name: impl Into<String>) -> Self {
        self.interface = name.into();
        self
    }

    /// Set the reply timeout.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Look up the configured interface.
    pub fn resolve(&self) -> Result<InterfaceHandle> {
        InterfaceHandle::resolve(&self.interface)
    }

    /// Open a routing socket with the configured reply timeout.
    pub fn connect(&self) -> Result<Connection> {
        Ok(Connection::new()?.timeout(self.timeout))
    }

    /// Resolve the interface, then move it.
    ///
    /// No netlink socket is opened unless resolution succeeds. The socket
    /// is closed before this returns, whatever the outcome.
    pub async fn apply(&self) -> Result<InterfaceHandle> {
        let iface = self.resolve()?;
        self.connect()?.set_link_netns(&iface, &self.target).await?;
        Ok(iface)
    }
}
