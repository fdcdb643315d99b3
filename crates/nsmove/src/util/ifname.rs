//! Interface name and index utilities.

use std::ffi::CString;
use std::io;

use crate::netlink::{Error, Result};

/// Maximum interface name length (including null terminator).
pub const IFNAMSIZ: usize = 16;

/// Validate an interface name.
pub fn validate(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidInterfaceName("empty name".to_string()));
    }

    if name.len() >= IFNAMSIZ {
        return Err(Error::InvalidInterfaceName(format!(
            "{}: name too long (max {} chars)",
            name,
            IFNAMSIZ - 1
        )));
    }

    if name.contains('/') || name.contains('\0') {
        return Err(Error::InvalidInterfaceName(format!(
            "{:?}: name contains invalid characters",
            name
        )));
    }

    if name.chars().any(|c| c.is_whitespace()) {
        return Err(Error::InvalidInterfaceName(format!(
            "{:?}: name contains whitespace",
            name
        )));
    }

    Ok(())
}

/// Convert an interface name to index using the host interface table.
pub fn name_to_index(name: &str) -> Result<u32> {
    validate(name)?;

    let c_name = CString::new(name)
        .map_err(|_| Error::InvalidInterfaceName(format!("{:?}: embedded NUL", name)))?;

    // SAFETY: c_name is a valid NUL-terminated string that outlives the call.
    let index = unsafe { libc::if_nametoindex(c_name.as_ptr()) };
    if index != 0 {
        return Ok(index);
    }

    let error = io::Error::last_os_error();
    match error.raw_os_error() {
        Some(0) | Some(libc::ENODEV) | Some(libc::ENXIO) | None => Err(Error::InterfaceNotFound {
            name: name.to_string(),
        }),
        Some(_) => Err(Error::OsQuery {
            name: name.to_string(),
            error,
        }),
    }
}
