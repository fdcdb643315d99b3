//! Resolved interface handles.
//!
//! An [`InterfaceHandle`] pairs an interface name with the kernel index it
//! had when it was looked up. Netlink link requests address interfaces by
//! index, so the name is only kept for diagnostics.
//!
//! Nothing pins the index: the interface can disappear or be renamed between
//! resolution and use, in which case the kernel rejects the request with
//! `ENODEV`.

use std::fmt;

use super::error::Result;
use crate::util::ifname;

/// A network interface resolved to its kernel index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InterfaceHandle {
    name: String,
    index: u32,
}

impl InterfaceHandle {
    /// Look up `name` in the host interface table.
    ///
    /// Fails with [`Error::InterfaceNotFound`](super::Error::InterfaceNotFound)
    /// if no such interface exists, or
    /// [`Error::OsQuery`](super::Error::OsQuery) if the lookup itself fails.
    pub fn resolve(name: &str) -> Result<Self> {
        let index = ifname::name_to_index(name)?;
        tracing::debug!(name, index, "resolved interface");
        Ok(Self {
            name: name.to_string(),
            index,
        })
    }

    /// Build a handle from an index resolved elsewhere.
    pub fn from_parts(name: impl Into<String>, index: u32) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }

    /// The interface name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The kernel interface index.
    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Display for InterfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (ifindex {})", self.name, self.index)
    }
}
