// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Domain error types - Secure error handling with no information disclosure

use crate::engine_core::types::EventId;
use thiserror::Error;

/// Main error type for access control operations
#[derive(Error, Debug)]
pub enum AccessError {
    /// No authenticated user for an operation requiring one
    #[error("A user should be logged in")]
    Unauthenticated,

    /// Event creation without a password
    #[error("An event should have a password")]
    MissingCredential,

    /// Join or lookup against an unknown event
    #[error("Event not found: {0}")]
    EventNotFound(EventId),

    /// Owner bypass requested by someone other than the owner
    #[error("Only the event owner can join without a password")]
    NotEventOwner,

    /// Submitted password does not match the event credential
    #[error("Invalid event password")]
    InvalidCredential,

    /// Event payload rejected before any write
    #[error("Invalid event data: {0}")]
    InvalidEventData(String),

    /// Credential derivation error
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    /// Opaque passthrough from the store collaborator
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Credential engine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// Unknown pseudorandom function or hasher name
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Stored credential material cannot be decoded
    #[error("Malformed credential: {0}")]
    MalformedCredential(String),

    /// Failed to generate random bytes
    #[error("Failed to generate random bytes")]
    RandomError,

    /// Key derivation failed
    #[error("Key derivation failed: {0}")]
    DerivationError(String),
}

/// Key-path store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Path segment is empty or contains a separator
    #[error("Invalid store path: {0}")]
    InvalidPath(String),

    /// Backend failure (network, permissions, quota...)
    #[error("Store backend failure: {0}")]
    Backend(String),

    /// Stored value does not have the expected shape
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AccessError {
    /// Get user-friendly error message (no store internals).
    pub fn user_message(&self) -> String {
        match self {
            AccessError::Unauthenticated => "Please sign in first".to_string(),
            AccessError::MissingCredential => "An event should have a password".to_string(),
            AccessError::EventNotFound(_) => "Event not found".to_string(),
            AccessError::NotEventOwner => "Only the event owner can do this".to_string(),
            AccessError::InvalidCredential => "Invalid event password".to_string(),
            AccessError::InvalidEventData(reason) => format!("Invalid event: {}", reason),
            AccessError::Credential(CredentialError::UnsupportedAlgorithm(_)) => {
                "Event password uses an unsupported algorithm".to_string()
            }
            AccessError::Credential(_) => "Internal error".to_string(),
            AccessError::Store(_) => "Service unavailable".to_string(),
            AccessError::ConfigurationError(_) => "Internal error".to_string(),
        }
    }

    /// Whether the caller may retry the same operation unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AccessError::Store(StoreError::Backend(_)))
    }
}
