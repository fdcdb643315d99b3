//! Moving links between network namespaces.
//!
//! A move is a single `RTM_SETLINK` request: an `ifinfomsg` addressing the
//! interface by index, followed by one attribute naming the destination
//! namespace. The kernel performs the move atomically or not at all.
//!
//! # Example
//!
//! ```ignore
//! use nsmove::netlink::{Connection, InterfaceHandle};
//! use nsmove::netlink::namespace::NamespaceTarget;
//!
//! let veth = InterfaceHandle::resolve("veth-host")?;
//! let conn = Connection::new()?;
//! conn.set_link_netns(&veth, &NamespaceTarget::pid(container_pid)?).await?;
//! ```

use std::os::unix::io::AsRawFd;

use super::builder::MessageBuilder;
use super::connection::{Connection, ack_request};
use super::error::Result;
use super::interface::InterfaceHandle;
use super::message::NlMsgType;
use super::namespace::NamespaceTarget;
use super::socket::Transport;
use super::types::link::{AF_UNSPEC, IfInfoMsg, IflaAttr};

/// Build the request moving interface `ifindex` into `target`.
///
/// Sequence number and port ID are filled in when the request is sent.
pub fn netns_request(ifindex: u32, target: &NamespaceTarget) -> MessageBuilder {
    // ifi_index is a C int; the kernel reads the same 32 bits back.
    let ifinfo = IfInfoMsg::new()
        .with_family(AF_UNSPEC)
        .with_index(ifindex as i32);

    let mut builder = ack_request(NlMsgType::RTM_SETLINK);
    builder.append(&ifinfo);
    match target {
        NamespaceTarget::Pid(process) => {
            builder.append_attr_u32(IflaAttr::NetNsPid as u16, process.pid());
        }
        NamespaceTarget::Fd(ns) => {
            builder.append_attr_u32(IflaAttr::NetNsFd as u16, ns.as_raw_fd() as u32);
        }
    }
    builder
}

impl<T: Transport> Connection<T> {
    /// Move a network interface into another network namespace.
    ///
    /// A kernel refusal is reported as
    /// [`Error::NamespaceMoveRejected`](super::Error::NamespaceMoveRejected)
    /// carrying the errno: `ENODEV` when the interface is gone, `ESRCH`
    /// when the process does not exist, `EPERM` without `CAP_NET_ADMIN`.
    pub async fn set_link_netns(
        &self,
        iface: &InterfaceHandle,
        target: &NamespaceTarget,
    ) -> Result<()> {
        tracing::debug!(interface = %iface, %target, "moving interface");

        self.request_ack(netns_request(iface.index(), target))
            .await
            .map_err(|e| e.into_move_rejection(iface.index(), target.to_string()))?;

        tracing::debug!(interface = %iface, %target, "interface moved");
        Ok(())
    }

    /// Move a network interface into the namespace of process `pid`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// conn.set_link_netns_pid(&veth, container_pid).await?;
    /// ```
    pub async fn set_link_netns_pid(&self, iface: &InterfaceHandle, pid: u32) -> Result<()> {
        let target = NamespaceTarget::pid(pid)?;
        self.set_link_netns(iface, &target).await
    }
}
