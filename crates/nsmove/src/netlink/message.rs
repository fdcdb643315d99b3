//! Netlink message header and parsing.

use super::attr::AttrIter;
use super::error::{Error, Result};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Netlink message header alignment.
pub const NLMSG_ALIGNTO: usize = 4;

/// Align a length to NLMSG_ALIGNTO boundary.
#[inline]
pub const fn nlmsg_align(len: usize) -> usize {
    (len + NLMSG_ALIGNTO - 1) & !(NLMSG_ALIGNTO - 1)
}

/// Size of the netlink message header.
pub const NLMSG_HDRLEN: usize = nlmsg_align(std::mem::size_of::<NlMsgHdr>());

/// Netlink message header (mirrors struct nlmsghdr).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct NlMsgHdr {
    /// Length of message including header.
    pub nlmsg_len: u32,
    /// Message type.
    pub nlmsg_type: u16,
    /// Additional flags.
    pub nlmsg_flags: u16,
    /// Sequence number.
    pub nlmsg_seq: u32,
    /// Sending process port ID.
    pub nlmsg_pid: u32,
}

impl NlMsgHdr {
    /// Create a new message header.
    pub fn new(msg_type: u16, flags: u16) -> Self {
        Self {
            nlmsg_len: NLMSG_HDRLEN as u32,
            nlmsg_type: msg_type,
            nlmsg_flags: flags,
            nlmsg_seq: 0,
            nlmsg_pid: 0,
        }
    }

    /// Check if this is an error message (ACKs are error messages with code 0).
    pub fn is_error(&self) -> bool {
        self.nlmsg_type == NlMsgType::ERROR
    }

    /// Check if this message belongs to the request with this sequence number
    /// sent from this port.
    pub fn answers(&self, seq: u32, port_id: u32) -> bool {
        self.nlmsg_seq == seq && self.nlmsg_pid == port_id
    }

    /// Convert header to bytes.
    pub fn as_bytes(&self) -> &[u8] {
        <Self as IntoBytes>::as_bytes(self)
    }

    /// Parse header from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<&Self> {
        Self::ref_from_prefix(data)
            .map(|(r, _)| r)
            .map_err(|_| Error::Truncated {
                expected: std::mem::size_of::<Self>(),
                actual: data.len(),
            })
    }
}

/// Standard netlink message types.
pub struct NlMsgType;

impl NlMsgType {
    /// No operation, message must be discarded.
    pub const NOOP: u16 = 1;
    /// Error message or ACK.
    pub const ERROR: u16 = 2;

    // Link messages
    pub const RTM_NEWLINK: u16 = 16;
    pub const RTM_SETLINK: u16 = 19;

    /// Short name for diagnostics.
    pub fn name(msg_type: u16) -> &'static str {
        match msg_type {
            Self::NOOP => "NLMSG_NOOP",
            Self::ERROR => "NLMSG_ERROR",
            Self::RTM_NEWLINK => "RTM_NEWLINK",
            Self::RTM_SETLINK => "RTM_SETLINK",
            _ => "unknown",
        }
    }
}

/// Netlink message flags.
pub const NLM_F_REQUEST: u16 = 0x01;
pub const NLM_F_ACK: u16 = 0x04;

// Flags on NLMSG_ERROR replies
/// The echoed request was cut down to its header.
pub const NLM_F_CAPPED: u16 = 0x100;
/// Extended ACK attributes follow the echoed request.
pub const NLM_F_ACK_TLVS: u16 = 0x200;

/// Extended ACK attribute types (enum nlmsgerr_attrs).
pub mod nlmsgerr_attr {
    /// Error message string.
    pub const MSG: u16 = 1;
}

/// Iterator over netlink messages in a buffer.
pub struct MessageIter<'a> {
    data: &'a [u8],
}

impl<'a> MessageIter<'a> {
    /// Create a new message iterator.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl<'a> Iterator for MessageIter<'a> {
    type Item = Result<(&'a NlMsgHdr, &'a [u8])>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.len() < NLMSG_HDRLEN {
            return None;
        }

        let header = match NlMsgHdr::from_bytes(self.data) {
            Ok(h) => h,
            Err(e) => return Some(Err(e)),
        };

        let msg_len = header.nlmsg_len as usize;
        if msg_len < NLMSG_HDRLEN || msg_len > self.data.len() {
            // A bad length poisons the rest of the datagram.
            self.data = &[];
            return Some(Err(Error::UnexpectedReply(format!(
                "invalid message length: {}",
                msg_len
            ))));
        }

        let payload = &self.data[NLMSG_HDRLEN..msg_len];
        let aligned_len = nlmsg_align(msg_len);

        if aligned_len >= self.data.len() {
            self.data = &[];
        } else {
            self.data = &self.data[aligned_len..];
        }

        Some(Ok((header, payload)))
    }
}

/// Netlink error message payload (mirrors struct nlmsgerr).
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, Immutable, KnownLayout)]
pub struct NlMsgError {
    /// Error code (negative errno or 0 for ACK).
    pub error: i32,
    /// Original message header that caused the error.
    pub msg: NlMsgHdr,
}

impl NlMsgError {
    /// Parse error message from payload.
    pub fn from_bytes(data: &[u8]) -> Result<&Self> {
        Self::ref_from_prefix(data)
            .map(|(r, _)| r)
            .map_err(|_| Error::Truncated {
                expected: std::mem::size_of::<Self>(),
                actual: data.len(),
            })
    }

    /// Check if this is an ACK (no error).
    pub fn is_ack(&self) -> bool {
        self.error == 0
    }

    /// Extended ACK attributes following the echoed request.
    ///
    /// `flags` are the flags of the carrying `NLMSG_ERROR` header. Without
    /// `NLM_F_ACK_TLVS` there are no attributes. Without `NLM_F_CAPPED` the
    /// whole request was echoed and the attributes start after it.
    pub fn ext_ack_attrs<'a>(&self, flags: u16, payload: &'a [u8]) -> AttrIter<'a> {
        if flags & NLM_F_ACK_TLVS == 0 {
            return AttrIter::new(&[]);
        }

        let echoed = if flags & NLM_F_CAPPED != 0 {
            NLMSG_HDRLEN
        } else {
            nlmsg_align(self.msg.nlmsg_len as usize)
        };
        let offset = std::mem::size_of::<i32>() + echoed;

        match payload.get(offset..) {
            Some(rest) => AttrIter::new(rest),
            None => AttrIter::new(&[]),
        }
    }

    /// The human-readable extended ACK message, if the kernel sent one.
    pub fn ext_ack_message<'a>(&self, flags: u16, payload: &'a [u8]) -> Option<&'a str> {
        self.ext_ack_attrs(flags, payload)
            .find(|(kind, _)| *kind == nlmsgerr_attr::MSG)
            .and_then(|(_, data)| super::attr::get::string(data).ok())
    }
}
