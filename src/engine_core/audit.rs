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

use crate::engine_core::types::{EventId, UserId};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuditKind {
    EventCreated,
    JoinedAsOwner,
    JoinGranted,
    JoinRejected,
    Left,
}

#[derive(Serialize)]
struct AuditEntry<'a> {
    event_id: &'a EventId,
    user_id: &'a UserId,
    timestamp: f64,
    kind: AuditKind,
}

/// Emits one structured record per access decision on the `audit` target.
#[derive(Debug, Clone, Default)]
pub struct AuditLogger;

impl AuditLogger {
    pub fn new() -> Self {
        Self
    }

    pub fn log(&self, event_id: &EventId, user_id: &UserId, kind: AuditKind) {
        let entry = AuditEntry {
            event_id,
            user_id,
            timestamp: crate::utils::time::now(),
            kind,
        };

        let payload = serde_json::to_string(&entry).unwrap_or_default();

        info!(
            target: "audit",
            kind = ?kind,
            payload = %payload,
            "ACCESS_AUDIT_LOG"
        );
    }
}
