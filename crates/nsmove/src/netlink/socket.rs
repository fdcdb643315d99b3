//! Low-level async netlink socket operations.

use std::future::Future;
use std::os::unix::io::{AsRawFd, RawFd};
use std::sync::atomic::{AtomicU32, Ordering};

use bytes::BytesMut;
use netlink_sys::{Socket, SocketAddr, protocols};
use tokio::io::Interest;
use tokio::io::unix::AsyncFd;

use super::error::{Error, Result};

/// Receive buffer size; large enough for an error reply echoing the request.
const RECV_BUF_SIZE: usize = 32768;

/// The datagram transport a [`Connection`](super::Connection) runs over.
///
/// [`NetlinkSocket`] is the real implementation. Tests substitute a
/// scripted kernel.
pub trait Transport {
    /// Local port ID replies are addressed to.
    fn port_id(&self) -> u32;

    /// Get the next sequence number.
    fn next_seq(&self) -> u32;

    /// Send one complete message to the kernel.
    fn send(&self, msg: &[u8]) -> impl Future<Output = Result<()>>;

    /// Receive one datagram, which may hold several messages.
    fn recv_msg(&self) -> impl Future<Output = Result<Vec<u8>>>;
}

/// Async `NETLINK_ROUTE` socket.
///
/// The descriptor is closed when the socket is dropped.
pub struct NetlinkSocket {
    /// The underlying async file descriptor.
    fd: AsyncFd<Socket>,
    /// Sequence number counter.
    seq: AtomicU32,
    /// Local port ID (assigned by kernel).
    pid: u32,
}

impl NetlinkSocket {
    /// Open and bind a routing socket. Must be called inside a tokio runtime.
    pub fn new() -> Result<Self> {
        let mut socket = Socket::new(protocols::NETLINK_ROUTE).map_err(Error::SocketOpen)?;
        socket.set_non_blocking(true).map_err(Error::SocketOpen)?;

        // Port 0 lets the kernel pick a unique port ID.
        let mut addr = SocketAddr::new(0, 0);
        socket.bind(&addr).map_err(Error::SocketOpen)?;
        socket.get_address(&mut addr).map_err(Error::SocketOpen)?;
        let pid = addr.port_number();

        // Extended ACK gives readable rejection reasons; older kernels lack it.
        socket.set_ext_ack(true).ok();

        let fd = AsyncFd::new(socket).map_err(Error::SocketOpen)?;
        tracing::debug!(port_id = pid, "netlink socket open");

        Ok(Self {
            fd,
            seq: AtomicU32::new(1),
            pid,
        })
    }

    /// Get the local port ID.
    pub fn pid(&self) -> u32 {
        self.pid
    }
}

impl Transport for NetlinkSocket {
    fn port_id(&self) -> u32 {
        self.pid
    }

    fn next_seq(&self) -> u32 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }

    async fn send(&self, msg: &[u8]) -> Result<()> {
        loop {
            let mut guard = self
                .fd
                .ready(Interest::WRITABLE)
                .await
                .map_err(Error::Send)?;

            match guard.try_io(|inner| inner.get_ref().send(msg, 0)) {
                Ok(result) => {
                    let sent = result.map_err(Error::Send)?;
                    if sent != msg.len() {
                        return Err(Error::Send(std::io::Error::new(
                            std::io::ErrorKind::WriteZero,
                            format!("short send: {} of {} bytes", sent, msg.len()),
                        )));
                    }
                    return Ok(());
                }
                Err(_would_block) => continue,
            }
        }
    }

    async fn recv_msg(&self) -> Result<Vec<u8>> {
        let mut buf = BytesMut::with_capacity(RECV_BUF_SIZE);

        loop {
            let mut guard = self
                .fd
                .ready(Interest::READABLE)
                .await
                .map_err(Error::Recv)?;

            match guard.try_io(|inner| inner.get_ref().recv(&mut buf, 0)) {
                Ok(result) => {
                    result.map_err(Error::Recv)?;
                    // recv advanced buf, so buf[..] holds the datagram
                    return Ok(buf.to_vec());
                }
                Err(_would_block) => continue,
            }
        }
    }
}

impl AsRawFd for NetlinkSocket {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.get_ref().as_raw_fd()
    }
}

impl Drop for NetlinkSocket {
    fn drop(&mut self) {
        tracing::debug!(port_id = self.pid, "netlink socket closed");
    }
}
