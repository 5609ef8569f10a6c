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

//! Store paths.
//!
//! Every location the protocol touches is built here so that identifiers
//! coming from callers are checked before they can address another record.

use crate::engine_core::constants::paths;
use crate::engine_core::errors::StoreError;
use crate::engine_core::types::{EventId, UserId};
use std::fmt;

/// Characters the backing store refuses in a key.
const FORBIDDEN: &[char] = &[paths::SEPARATOR, '.', '#', '$', '[', ']'];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorePath {
    segments: Vec<String>,
}

impl StorePath {
    /// Path to a fixed collection such as `events` or `auth/users`.
    pub fn collection(name: &str) -> Self {
        Self {
            segments: name
                .split(paths::SEPARATOR)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn child(&self, segment: impl AsRef<str>) -> Result<Self, StoreError> {
        let segment = segment.as_ref();
        if segment.is_empty() || segment.contains(FORBIDDEN) {
            return Err(StoreError::InvalidPath(format!(
                "{}/{:?}",
                self, segment
            )));
        }
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn events() -> Self {
        Self::collection(paths::EVENTS)
    }

    pub fn event(event_id: &EventId) -> Result<Self, StoreError> {
        Self::events().child(event_id)
    }

    pub fn event_credential(event_id: &EventId) -> Result<Self, StoreError> {
        Self::collection(paths::EVENT_CREDENTIALS).child(event_id)
    }

    pub fn event_application(event_id: &EventId, user_id: &UserId) -> Result<Self, StoreError> {
        Self::collection(paths::EVENT_APPLICATIONS)
            .child(event_id)?
            .child(user_id)
    }

    pub fn event_participant(event_id: &EventId, user_id: &UserId) -> Result<Self, StoreError> {
        Self::collection(paths::EVENT_PARTICIPANTS)
            .child(event_id)?
            .child(user_id)
    }

    pub fn user(user_id: &UserId) -> Result<Self, StoreError> {
        Self::collection(paths::USERS).child(user_id)
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}
