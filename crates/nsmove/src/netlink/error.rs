//! Error types for resolving and moving interfaces.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Result type for nsmove operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while moving an interface between namespaces.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The interface name can never name an interface.
    #[error("invalid interface name: {0}")]
    InvalidInterfaceName(String),

    /// No interface with this name exists.
    #[error("interface not found: {name}")]
    InterfaceNotFound {
        /// The interface name that was not found.
        name: String,
    },

    /// The interface table could not be queried at all.
    #[error("cannot query interface {name}: {error}")]
    OsQuery {
        /// The interface name being looked up.
        name: String,
        /// The underlying OS error.
        error: io::Error,
    },

    /// The target pid is not a usable process id.
    #[error("invalid pid: {0}")]
    InvalidPid(String),

    /// A namespace file could not be opened.
    #[error("cannot open namespace '{}': {error}", .path.display())]
    NamespaceOpen {
        /// Path of the namespace file.
        path: PathBuf,
        /// The underlying OS error.
        error: io::Error,
    },

    /// The netlink socket could not be created or bound.
    #[error("cannot open netlink socket: {0}")]
    SocketOpen(io::Error),

    /// Writing the request to the socket failed.
    #[error("send failed: {0}")]
    Send(io::Error),

    /// Reading from the socket failed.
    #[error("receive failed: {0}")]
    Recv(io::Error),

    /// The kernel did not answer in time.
    #[error("no reply from kernel within {0:?}")]
    Timeout(Duration),

    /// Kernel returned an error code.
    #[error("kernel error: {message} (errno {errno})")]
    Kernel {
        /// The errno value from the kernel.
        errno: i32,
        /// Human-readable error message.
        message: String,
    },

    /// Kernel refused to move the interface.
    #[error("kernel refused to move ifindex {ifindex} to {target}: {message} (errno {errno})")]
    NamespaceMoveRejected {
        /// Index of the interface that was to be moved.
        ifindex: u32,
        /// Description of the target namespace.
        target: String,
        /// The errno value from the kernel.
        errno: i32,
        /// Human-readable error message.
        message: String,
    },

    /// The correlated reply was not an ACK or error message.
    #[error("unexpected netlink reply: {0}")]
    UnexpectedReply(String),

    /// Message was truncated.
    #[error("message truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Expected message length.
        expected: usize,
        /// Actual bytes received.
        actual: usize,
    },

    /// Invalid attribute format.
    #[error("invalid attribute: {0}")]
    InvalidAttribute(String),
}

impl Error {
    /// Create a kernel error from the (negative) error field of `nlmsgerr`.
    pub fn from_errno(errno: i32) -> Self {
        let message = io::Error::from_raw_os_error(-errno).to_string();
        Self::Kernel {
            errno: -errno,
            message,
        }
    }

    /// Create a kernel error carrying the extended-ACK message, if any.
    pub fn from_errno_with_ext_ack(errno: i32, ext_ack: Option<&str>) -> Self {
        match (Self::from_errno(errno), ext_ack) {
            (Self::Kernel { errno, message }, Some(ext)) if !ext.is_empty() => Self::Kernel {
                errno,
                message: format!("{}: {}", message, ext),
            },
            (err, _) => err,
        }
    }

    /// Turn a kernel refusal into a [`Error::NamespaceMoveRejected`].
    ///
    /// Other errors are returned unchanged.
    pub fn into_move_rejection(self, ifindex: u32, target: impl Into<String>) -> Self {
        match self {
            Self::Kernel { errno, message } => Self::NamespaceMoveRejected {
                ifindex,
                target: target.into(),
                errno,
                message,
            },
            other => other,
        }
    }

    /// Get the errno value if the kernel produced this error.
    pub fn errno(&self) -> Option<i32> {
        match self {
            Self::Kernel { errno, .. } | Self::NamespaceMoveRejected { errno, .. } => Some(*errno),
            _ => None,
        }
    }

    /// Check if this is a "not found" error (missing interface or ENODEV/ENOENT).
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::InterfaceNotFound { .. } => true,
            _ => matches!(self.errno(), Some(libc::ENOENT) | Some(libc::ENODEV)),
        }
    }

    /// Check if this is a permission error (EPERM, EACCES).
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Self::SocketOpen(e) | Self::Send(e) => e.kind() == io::ErrorKind::PermissionDenied,
            _ => matches!(self.errno(), Some(libc::EPERM) | Some(libc::EACCES)),
        }
    }

    /// Check if the target process does not exist (ESRCH).
    pub fn is_no_such_process(&self) -> bool {
        self.errno() == Some(libc::ESRCH)
    }

    /// Check if this error is a protocol violation by the peer.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedReply(_) | Self::Truncated { .. } | Self::InvalidAttribute(_)
        )
    }
}
