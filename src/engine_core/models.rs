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

//! Domain Models.
//!
//! This module contains pure data structures representing credentials, events
//! and user profiles as they are laid out in the store. It is designed to be
//! free of I/O side effects.

use crate::engine_core::constants::kdf;
use crate::engine_core::errors::CredentialError;
use crate::engine_core::types::UserId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Pseudorandom function used inside PBKDF2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Prf {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl Prf {
    pub fn as_str(&self) -> &'static str {
        match self {
            Prf::Sha1 => "SHA1",
            Prf::Sha224 => "SHA224",
            Prf::Sha256 => "SHA256",
            Prf::Sha384 => "SHA384",
            Prf::Sha512 => "SHA512",
        }
    }
}

impl FromStr for Prf {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SHA1" => Ok(Prf::Sha1),
            "SHA224" => Ok(Prf::Sha224),
            "SHA256" => Ok(Prf::Sha256),
            "SHA384" => Ok(Prf::Sha384),
            "SHA512" => Ok(Prf::Sha512),
            other => Err(CredentialError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

impl TryFrom<String> for Prf {
    type Error = CredentialError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Prf> for String {
    fn from(prf: Prf) -> Self {
        prf.as_str().to_string()
    }
}

impl fmt::Display for Prf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters needed to re-derive a key, as persisted next to the hash.
///
/// Everything but the salt is optional; absent (or zero) values fall back to
/// the engine defaults when verifying. Names are kept as raw strings so that
/// an unknown algorithm surfaces as `UnsupportedAlgorithm` rather than as a
/// deserialization failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KdfParams {
    /// Hex encoded salt
    pub salt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u32>,
    /// Derived key size in 32-bit words
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hasher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prf: Option<String>,
}

impl KdfParams {
    /// Params carrying only a salt; every other field uses engine defaults.
    pub fn from_salt(salt_hex: impl Into<String>) -> Self {
        Self {
            salt: salt_hex.into(),
            iterations: None,
            key_size: None,
            hasher: None,
            prf: None,
        }
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = Some(iterations);
        self
    }

    pub fn with_key_size(mut self, words: u32) -> Self {
        self.key_size = Some(words);
        self
    }

    pub fn with_prf(mut self, prf: impl Into<String>) -> Self {
        self.prf = Some(prf.into());
        self
    }

    /// Parsed PRF, `None` when absent.
    pub fn parsed_prf(&self) -> Result<Option<Prf>, CredentialError> {
        self.prf.as_deref().map(Prf::from_str).transpose()
    }

    /// Fails unless the hasher is absent or PBKDF2.
    pub fn check_hasher(&self) -> Result<(), CredentialError> {
        match self.hasher.as_deref() {
            None => Ok(()),
            Some(h) if h == kdf::HASHER_PBKDF2 => Ok(()),
            Some(other) => Err(CredentialError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

/// Derived key plus the parameters used to produce it.
///
/// Serializes to the stored event credential layout: `{hash, options}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Hex encoded derived key
    #[serde(rename = "hash")]
    pub derived_key: String,
    #[serde(rename = "options")]
    pub params: KdfParams,
}

/// Event as stored under `events/{eventId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub owner_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    /// Server timestamp in milliseconds
    #[serde(default)]
    pub created_at: u64,
    /// Owner-authored fields
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

/// User profile as stored under `auth/users/{userId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub nick_name: String,
    pub display_name: String,
    #[serde(default)]
    pub created_at: u64,
}
