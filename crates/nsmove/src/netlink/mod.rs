//! Netlink routing protocol pieces needed to move links between namespaces.
//!
//! # Quick Start
//!
//! ```ignore
//! use nsmove::netlink::{Connection, InterfaceHandle};
//! use nsmove::netlink::namespace::NamespaceTarget;
//!
//! let iface = InterfaceHandle::resolve("eth0")?;
//! let conn = Connection::new()?;
//! conn.set_link_netns(&iface, &NamespaceTarget::pid(4242)?).await?;
//! ```

pub mod attr;
mod builder;
pub mod connection;
mod error;
#[cfg(test)]
mod fixtures;
pub mod interface;
pub mod link;
pub mod message;
pub mod namespace;
mod socket;
pub mod types;

pub use attr::{AttrIter, NlAttr};
pub use builder::MessageBuilder;
pub use connection::{Connection, Response};
pub use error::{Error, Result};
pub use interface::InterfaceHandle;
pub use message::{MessageIter, NLMSG_HDRLEN, NlMsgHdr, NlMsgType};
pub use namespace::{NamespaceTarget, TargetProcess};
pub use socket::{NetlinkSocket, Transport};
