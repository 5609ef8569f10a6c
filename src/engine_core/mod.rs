//! Core domain kernel.
//!
//! This module contains the fundamental data structures and the credential
//! engine, independent of any specific store or identity provider.

pub mod audit;
pub mod constants;
pub mod crypto;
pub mod errors;
pub mod models;
pub mod types;
