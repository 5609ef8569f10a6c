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

//! Credential engine: password key derivation and verification.
//!
//! This module provides the `CredentialEngine` which turns a password into a
//! salted PBKDF2 key (`derive`) and re-derives a key from stored salt and
//! parameters (`verify`). It holds no state besides its immutable
//! `KdfConfig` and performs no I/O; all randomness is confined to `derive`.

use hmac::Hmac;
use pbkdf2::pbkdf2;
use rand::rngs::OsRng;
use rand::TryRngCore;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

use crate::engine_core::constants::kdf;
use crate::engine_core::errors::{AccessError, CredentialError};
use crate::engine_core::models::{Credential, KdfParams, Prf};
use crate::engine_core::types::Password;

/// Upper bound on the derived key size accepted from stored parameters.
const MAX_KEY_SIZE_WORDS: u32 = 256;

/// Upper bound on the configured salt size.
const MAX_SALT_SIZE_BYTES: usize = 1024;

/// Key derivation settings. Each field can be overridden without touching
/// the others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfConfig {
    pub iterations: u32,
    /// Derived key size in 32-bit words
    pub key_size: u32,
    /// Salt size in bytes
    pub salt_size: usize,
    pub prf: Prf,
}

impl KdfConfig {
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_key_size(mut self, words: u32) -> Self {
        self.key_size = words;
        self
    }

    pub fn with_salt_size(mut self, bytes: usize) -> Self {
        self.salt_size = bytes;
        self
    }

    pub fn with_prf(mut self, prf: Prf) -> Self {
        self.prf = prf;
        self
    }

    pub fn validate(&self) -> Result<(), AccessError> {
        if self.iterations == 0 {
            return Err(AccessError::ConfigurationError(
                "KDF iterations must be > 0".to_string(),
            ));
        }
        if self.key_size == 0 || self.key_size > MAX_KEY_SIZE_WORDS {
            return Err(AccessError::ConfigurationError(format!(
                "KDF key size must be within 1..={} words",
                MAX_KEY_SIZE_WORDS
            )));
        }
        if self.salt_size == 0 || self.salt_size > MAX_SALT_SIZE_BYTES {
            return Err(AccessError::ConfigurationError(format!(
                "KDF salt size must be within 1..={} bytes",
                MAX_SALT_SIZE_BYTES
            )));
        }
        Ok(())
    }
}

impl Default for KdfConfig {
    fn default() -> Self {
        Self {
            iterations: kdf::DEFAULT_ITERATIONS,
            key_size: kdf::DEFAULT_KEY_SIZE_WORDS,
            salt_size: kdf::DEFAULT_SALT_SIZE_BYTES,
            prf: Prf::Sha256,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CredentialEngine {
    config: KdfConfig,
}

impl CredentialEngine {
    /// Fails unless `config` validates.
    pub fn new(config: KdfConfig) -> Result<Self, AccessError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &KdfConfig {
        &self.config
    }

    /// Derive a new credential from a password using a fresh random salt.
    pub fn derive(&self, password: &Password) -> Result<Credential, CredentialError> {
        let mut salt = vec![0u8; self.config.salt_size];
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|_| CredentialError::RandomError)?;
        self.derive_with_salt(password, &salt)
    }

    /// Deterministic core of `derive`: same password and salt, same credential.
    pub fn derive_with_salt(
        &self,
        password: &Password,
        salt: &[u8],
    ) -> Result<Credential, CredentialError> {
        let key = derive_key(
            self.config.prf,
            password.expose_secret().as_bytes(),
            salt,
            self.config.iterations,
            self.config.key_size,
        )?;

        Ok(Credential {
            derived_key: hex::encode(key),
            params: KdfParams {
                salt: hex::encode(salt),
                iterations: Some(self.config.iterations),
                key_size: Some(self.config.key_size),
                hasher: Some(kdf::HASHER_PBKDF2.to_string()),
                prf: Some(self.config.prf.as_str().to_string()),
            },
        })
    }

    /// Re-derive a key from a password and previously stored salt/params.
    ///
    /// Returns the hex encoded key; comparing it with the stored hash is the
    /// caller's job (see `matches`). Absent or zero parameters fall back to
    /// this engine's configuration.
    pub fn verify(
        &self,
        password: &Password,
        salt_hex: &str,
        params: &KdfParams,
    ) -> Result<String, CredentialError> {
        params.check_hasher()?;
        let prf = params.parsed_prf()?.unwrap_or(self.config.prf);
        let iterations = params
            .iterations
            .filter(|&i| i > 0)
            .unwrap_or(self.config.iterations);
        let key_size = params
            .key_size
            .filter(|&k| k > 0)
            .unwrap_or(self.config.key_size);
        if key_size > MAX_KEY_SIZE_WORDS {
            return Err(CredentialError::MalformedCredential(format!(
                "key size of {} words exceeds {}",
                key_size, MAX_KEY_SIZE_WORDS
            )));
        }

        let salt = hex::decode(salt_hex)
            .map_err(|e| CredentialError::MalformedCredential(format!("salt: {}", e)))?;

        let key = derive_key(
            prf,
            password.expose_secret().as_bytes(),
            &salt,
            iterations,
            key_size,
        )?;
        Ok(hex::encode(key))
    }

    /// Constant-time comparison of a candidate key with the stored one.
    /// An empty stored key never matches.
    pub fn matches(candidate_hex: &str, stored_hex: &str) -> bool {
        if stored_hex.is_empty() {
            return false;
        }
        candidate_hex
            .as_bytes()
            .ct_eq(stored_hex.as_bytes())
            .into()
    }
}

fn derive_key(
    prf: Prf,
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    key_size: u32,
) -> Result<Vec<u8>, CredentialError> {
    let mut out = vec![0u8; key_size as usize * kdf::BYTES_PER_WORD];
    let res = match prf {
        Prf::Sha1 => pbkdf2::<Hmac<Sha1>>(password, salt, iterations, &mut out),
        Prf::Sha224 => pbkdf2::<Hmac<Sha224>>(password, salt, iterations, &mut out),
        Prf::Sha256 => pbkdf2::<Hmac<Sha256>>(password, salt, iterations, &mut out),
        Prf::Sha384 => pbkdf2::<Hmac<Sha384>>(password, salt, iterations, &mut out),
        Prf::Sha512 => pbkdf2::<Hmac<Sha512>>(password, salt, iterations, &mut out),
    };
    res.map_err(|e| CredentialError::DerivationError(e.to_string()))?;
    Ok(out)
}
