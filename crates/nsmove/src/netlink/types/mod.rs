//! Fixed-size rtnetlink message bodies and attribute constants.

pub mod link;
