//! Shared utilities for nsmove.

pub mod ifname;

pub use ifname::{IFNAMSIZ, name_to_index, validate};
