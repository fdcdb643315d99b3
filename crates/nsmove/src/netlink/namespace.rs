//! Target network namespaces.
//!
//! The kernel accepts two ways of naming the namespace an interface should
//! move to: the pid of a process living in it (`IFLA_NET_NS_PID`), or an
//! open file descriptor on a namespace file (`IFLA_NET_NS_FD`), such as
//! `/proc/<pid>/ns/net` or a bind mount under `/var/run/netns`.
//!
//! # Example
//!
//! ```ignore
//! use nsmove::netlink::namespace::NamespaceTarget;
//!
//! // The container's init process
//! let target = NamespaceTarget::pid(4242)?;
//!
//! // A namespace created with `ip netns add blue`
//! let target = NamespaceTarget::named("blue")?;
//! ```

use std::fmt;
use std::fs::File;
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::error::{Error, Result};

/// The runtime directory where named network namespaces are stored.
pub const NETNS_RUN_DIR: &str = "/var/run/netns";

/// The process whose network namespace is the destination.
///
/// Only the range is checked here; whether the process exists is up to the
/// kernel when the request is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetProcess {
    pid: u32,
}

impl TargetProcess {
    /// Create a target from a pid. Zero and values beyond `pid_t` are rejected.
    pub fn new(pid: u32) -> Result<Self> {
        if pid == 0 {
            return Err(Error::InvalidPid("pid must be positive".into()));
        }
        if pid > i32::MAX as u32 {
            return Err(Error::InvalidPid(format!("{} is out of range", pid)));
        }
        Ok(Self { pid })
    }

    /// The process id.
    pub fn pid(&self) -> u32 {
        self.pid
    }
}

impl FromStr for TargetProcess {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let pid = s
            .parse::<u32>()
            .map_err(|e| Error::InvalidPid(format!("{:?}: {}", s, e)))?;
        Self::new(pid)
    }
}

impl fmt::Display for TargetProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pid {}", self.pid)
    }
}

/// An open namespace file.
///
/// The descriptor must stay open until the kernel has processed the move
/// request; it is closed on drop.
#[derive(Debug)]
pub struct NamespaceFd {
    file: File,
    path: PathBuf,
}

impl NamespaceFd {
    /// Path the namespace was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AsRawFd for NamespaceFd {
    fn as_raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}

/// Open a named namespace under [`NETNS_RUN_DIR`].
pub fn open(name: &str) -> Result<NamespaceFd> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        return Err(Error::NamespaceOpen {
            path: PathBuf::from(NETNS_RUN_DIR).join(name),
            error: std::io::Error::from(std::io::ErrorKind::InvalidInput),
        });
    }
    open_path(PathBuf::from(NETNS_RUN_DIR).join(name))
}

/// Open a namespace file by path.
pub fn open_path<P: AsRef<Path>>(path: P) -> Result<NamespaceFd> {
    let path = path.as_ref().to_path_buf();
    let file = File::open(&path).map_err(|error| Error::NamespaceOpen {
        path: path.clone(),
        error,
    })?;
    Ok(NamespaceFd { file, path })
}

/// Where an interface should be moved.
#[derive(Debug)]
pub enum NamespaceTarget {
    /// The namespace of a process (`IFLA_NET_NS_PID`).
    Pid(TargetProcess),
    /// The namespace behind an open file (`IFLA_NET_NS_FD`).
    Fd(NamespaceFd),
}

impl NamespaceTarget {
    /// Target the namespace of process `pid`.
    pub fn pid(pid: u32) -> Result<Self> {
        TargetProcess::new(pid).map(Self::Pid)
    }

    /// Target a named namespace (`ip netns add <name>`).
    pub fn named(name: &str) -> Result<Self> {
        open(name).map(Self::Fd)
    }

    /// Target the namespace file at `path`.
    pub fn path<P: AsRef<Path>>(path: P) -> Result<Self> {
        open_path(path).map(Self::Fd)
    }

    /// Parse a namespace argument: anything with a `/` is a path, the rest
    /// are names under [`NETNS_RUN_DIR`].
    pub fn from_netns_arg(arg: &str) -> Result<Self> {
        if arg.contains('/') {
            Self::path(arg)
        } else {
            Self::named(arg)
        }
    }
}

impl From<TargetProcess> for NamespaceTarget {
    fn from(target: TargetProcess) -> Self {
        Self::Pid(target)
    }
}

impl fmt::Display for NamespaceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pid(target) => write!(f, "{}", target),
            Self::Fd(ns) => write!(f, "netns {}", ns.path().display()),
        }
    }
}
