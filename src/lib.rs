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

//! event-guard: password-guarded events over a key-path store.
//!
//! This library lets an owner create a shared event protected by a password
//! and lets other users join it. Passwords are never stored: only a salted
//! PBKDF2 key and the parameters needed to re-derive it are persisted. The
//! join protocol is an ordered sequence of per-path store writes that stays
//! safe to retry when the store fails half way.

pub mod activity;
pub mod config;
pub mod engine_core;
pub mod protocol;
pub mod store;
pub mod utils;

pub use engine_core::crypto::{CredentialEngine, KdfConfig};
pub use engine_core::errors::{AccessError, CredentialError, StoreError};
pub use engine_core::types::{EventId, Password, UserId};
pub use protocol::access::{AccessControl, JoinRequest};
pub use protocol::identity::{AuthUser, IdentityProvider, StaticIdentity};
pub use store::memory::InMemoryStore;
pub use store::traits::KeyPathStore;
