//! Move a network interface into another process's network namespace.
//!
//! Container runtimes create a veth pair on the host and then hand one end
//! to the container. This crate performs that hand-off: it resolves the
//! interface name to an index and sends the kernel a single `RTM_SETLINK`
//! request carrying `IFLA_NET_NS_PID` (or `IFLA_NET_NS_FD`) over a
//! `NETLINK_ROUTE` socket.
//!
//! # Example
//!
//! ```ignore
//! use nsmove::config::MoveConfig;
//! use nsmove::netlink::TargetProcess;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> nsmove::Result<()> {
//!     let config = MoveConfig::new(TargetProcess::new(4242)?).interface("veth-c1");
//!     config.apply().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod netlink;
pub mod util;

// Re-export common types at crate root for convenience
pub use config::MoveConfig;
pub use netlink::{Connection, Error, InterfaceHandle, NamespaceTarget, Result, TargetProcess};
