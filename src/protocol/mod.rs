//! Access control protocol.
//!
//! Event creation, join, leave and listing as ordered sequences of store
//! operations, with the identity provider as the authentication seam.

pub mod access;
pub mod identity;
