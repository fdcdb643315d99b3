//! Netlink connection with request/ACK handling.

use std::time::Duration;

use super::builder::MessageBuilder;
use super::error::{Error, Result};
use super::message::{MessageIter, NLM_F_ACK, NLM_F_REQUEST, NlMsgError, NlMsgHdr, NlMsgType};
use super::socket::{NetlinkSocket, Transport};

/// How long to wait for the kernel's reply unless told otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// A correlated kernel reply to a request sent with `NLM_F_ACK`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `NLMSG_ERROR` with error code 0.
    Ack,
    /// `NLMSG_ERROR` with a non-zero error code.
    Error {
        /// Negative errno as sent by the kernel.
        code: i32,
        /// Extended ACK message, if the kernel attached one.
        ext_ack: Option<String>,
    },
}

impl Response {
    /// Interpret a message already matched to our request.
    pub fn parse(header: &NlMsgHdr, payload: &[u8]) -> Result<Self> {
        if !header.is_error() {
            return Err(Error::UnexpectedReply(format!(
                "expected ACK, got {} (type {})",
                NlMsgType::name(header.nlmsg_type),
                header.nlmsg_type
            )));
        }

        let err = NlMsgError::from_bytes(payload)?;
        if err.is_ack() {
            return Ok(Self::Ack);
        }

        // The kernel only ever sends a negated errno here.
        if err.error > 0 || err.error == i32::MIN {
            return Err(Error::UnexpectedReply(format!(
                "invalid error code {} in NLMSG_ERROR",
                err.error
            )));
        }

        Ok(Self::Error {
            code: err.error,
            ext_ack: err
                .ext_ack_message(header.nlmsg_flags, payload)
                .map(str::to_owned),
        })
    }

    /// Convert into a `Result`, mapping kernel errors to [`Error::Kernel`].
    pub fn into_result(self) -> Result<()> {
        match self {
            Self::Ack => Ok(()),
            Self::Error { code, ext_ack } => {
                Err(Error::from_errno_with_ext_ack(code, ext_ack.as_deref()))
            }
        }
    }
}

/// Find the reply to `(seq, port_id)` in one received datagram.
///
/// Returns `None` when the datagram holds nothing for this request.
pub fn find_response(data: &[u8], seq: u32, port_id: u32) -> Option<Result<Response>> {
    for result in MessageIter::new(data) {
        let (header, payload) = match result {
            Ok(msg) => msg,
            Err(e) => return Some(Err(e)),
        };

        if !header.answers(seq, port_id) {
            tracing::trace!(
                seq = header.nlmsg_seq,
                port_id = header.nlmsg_pid,
                msg_type = header.nlmsg_type,
                "discarding unrelated message"
            );
            continue;
        }

        return Some(Response::parse(header, payload));
    }

    None
}

/// Netlink connection over a [`Transport`], a real socket by default.
pub struct Connection<T: Transport = NetlinkSocket> {
    transport: T,
    timeout: Option<Duration>,
}

impl Connection<NetlinkSocket> {
    /// Open a routing socket. Must be called inside a tokio runtime.
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(NetlinkSocket::new()?))
    }
}

impl<T: Transport> Connection<T> {
    /// Wrap an already open transport.
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }

    /// Set the reply timeout. `None` waits forever.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a request that expects an ACK only (no data response).
    pub async fn request_ack(&self, mut builder: MessageBuilder) -> Result<()> {
        let seq = self.transport.next_seq();
        let port_id = self.transport.port_id();
        builder.set_seq(seq);
        builder.set_pid(port_id);

        let msg = builder.finish();
        self.transport.send(&msg).await?;
        tracing::debug!(seq, port_id, len = msg.len(), "request sent, awaiting reply");

        let response = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.recv_response(seq, port_id))
                .await
                .map_err(|_| Error::Timeout(limit))??,
            None => self.recv_response(seq, port_id).await?,
        };
        tracing::debug!(seq, ?response, "reply received");

        response.into_result()
    }

    async fn recv_response(&self, seq: u32, port_id: u32) -> Result<Response> {
        loop {
            let data = self.transport.recv_msg().await?;
            if let Some(response) = find_response(&data, seq, port_id) {
                return response;
            }
        }
    }
}

/// Helper to build a request expecting ACK.
pub fn ack_request(msg_type: u16) -> MessageBuilder {
    MessageBuilder::new(msg_type, NLM_F_REQUEST | NLM_F_ACK)
}
