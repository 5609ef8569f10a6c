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

//! event-guard Constants - Single source of truth for all configuration values.
//!
//! This module centralizes all magic numbers, store paths, and configuration
//! constants to ensure consistency and maintainability.

/// Key derivation defaults
pub mod kdf {
    /// PBKDF2 iteration count
    pub const DEFAULT_ITERATIONS: u32 = 2024;
    /// Derived key size in 32-bit words (256 bits)
    pub const DEFAULT_KEY_SIZE_WORDS: u32 = 256 / 32;
    /// Salt size in bytes (128 bits)
    pub const DEFAULT_SALT_SIZE_BYTES: usize = 128 / 8;
    /// Bytes per key size word
    pub const BYTES_PER_WORD: usize = 4;
    /// Only supported hasher name
    pub const HASHER_PBKDF2: &str = "PBKDF2";
}

/// Store layout
pub mod paths {
    pub const EVENTS: &str = "events";
    pub const EVENT_CREDENTIALS: &str = "eventCredentials";
    pub const EVENT_APPLICATIONS: &str = "eventApplications";
    pub const EVENT_PARTICIPANTS: &str = "eventParticipants";
    pub const USERS: &str = "auth/users";
    pub const SEPARATOR: char = '/';
}

/// Store record fields
pub mod fields {
    pub const OWNER_ID: &str = "ownerId";
    pub const OWNER_NAME: &str = "ownerName";
    pub const CREATED_AT: &str = "createdAt";
    /// Server value placeholder key
    pub const SERVER_VALUE: &str = ".sv";
    /// Server value placeholder resolved to the store's clock
    pub const SERVER_TIMESTAMP: &str = "timestamp";
}

/// Activity tracking
pub mod activity {
    /// Delay before the busy indicator starts (milliseconds)
    pub const DEFAULT_LATENCY_THRESHOLD_MS: u64 = 100;
}

/// Event listing
pub mod events {
    /// Number of most recent events returned by default
    pub const DEFAULT_LIST_LIMIT: usize = 50;
}

/// Configuration Environment Variables
pub mod config {
    pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
    pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
    pub const ENV_KDF_ITERATIONS: &str = "EVENT_GUARD_KDF_ITERATIONS";
    pub const ENV_KDF_KEY_SIZE: &str = "EVENT_GUARD_KDF_KEY_SIZE";
    pub const ENV_KDF_SALT_SIZE: &str = "EVENT_GUARD_KDF_SALT_SIZE";
    pub const ENV_KDF_PRF: &str = "EVENT_GUARD_KDF_PRF";
    pub const ENV_BUSY_THRESHOLD_MS: &str = "EVENT_GUARD_BUSY_THRESHOLD_MS";
    pub const ENV_EVENT_LIST_LIMIT: &str = "EVENT_GUARD_EVENT_LIST_LIMIT";
}
