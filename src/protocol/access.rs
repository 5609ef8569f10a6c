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

//! Access Control Protocol.
//!
//! Orchestrates the store writes behind event creation and membership. The
//! store only guarantees atomicity per path, so every operation is a fixed
//! sequence of single-path reads and writes:
//!
//! - create: new key, derive credential, write credential, write event. The
//!   event is never visible without its password guard.
//! - join: read credential, re-derive, record the attempt, compare, set the
//!   participation flag. A failure between the last two writes leaves an
//!   application without participation; re-running the join repairs it.
//! - leave: clear the participation flag.

use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::engine_core::audit::{AuditKind, AuditLogger};
use crate::engine_core::constants::{events, fields};
use crate::engine_core::crypto::CredentialEngine;
use crate::engine_core::errors::{AccessError, StoreError};
use crate::engine_core::models::{Credential, EventRecord, UserProfile};
use crate::engine_core::types::{EventId, Password, UserId};
use crate::protocol::identity::{AuthUser, IdentityProvider};
use crate::store::{read_typed, server_timestamp, KeyPathStore, StorePath};

/// How a user proves they may join an event.
#[derive(Debug)]
pub enum JoinRequest {
    /// Prove knowledge of the event password.
    WithPassword(Password),
    /// Join one's own event without a password.
    AsOwner,
}

impl JoinRequest {
    pub fn with_password(password: impl Into<Password>) -> Self {
        JoinRequest::WithPassword(password.into())
    }
}

pub struct AccessControl<S, I> {
    store: S,
    identity: I,
    engine: CredentialEngine,
    audit: AuditLogger,
    event_list_limit: usize,
    profile: Mutex<Option<UserProfile>>,
}

impl<S, I> AccessControl<S, I>
where
    S: KeyPathStore,
    I: IdentityProvider,
{
    pub fn new(store: S, identity: I, engine: CredentialEngine) -> Self {
        Self {
            store,
            identity,
            engine,
            audit: AuditLogger::new(),
            event_list_limit: events::DEFAULT_LIST_LIMIT,
            profile: Mutex::new(None),
        }
    }

    pub fn from_config(store: S, identity: I, config: &Config) -> Result<Self, AccessError> {
        let engine = CredentialEngine::new(config.kdf_config()?)?;
        Ok(Self::new(store, identity, engine).with_event_list_limit(config.event_list_limit))
    }

    pub fn with_event_list_limit(mut self, limit: usize) -> Self {
        self.event_list_limit = limit;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn engine(&self) -> &CredentialEngine {
        &self.engine
    }

    /// Create a password-protected event owned by the current user.
    ///
    /// `event_data` must be a JSON object; `ownerId`, `ownerName` and
    /// `createdAt` are set by the protocol and override caller values.
    pub async fn create_event(
        &self,
        event_data: Value,
        password: &Password,
    ) -> Result<EventId, AccessError> {
        let user = self.require_user()?;
        if password.is_empty() {
            return Err(AccessError::MissingCredential);
        }
        let Value::Object(mut data) = event_data else {
            return Err(AccessError::InvalidEventData(
                "expected a JSON object".to_string(),
            ));
        };

        let profile = self.current_user_profile().await?;

        let event_id = EventId::new(self.store.new_key(&StorePath::events()).await?);
        let credential = self.engine.derive(password)?;
        debug!(event_id = %event_id, "credential derived");

        let credential_path = StorePath::event_credential(&event_id)?;
        self.store
            .write(&credential_path, to_value(&credential)?)
            .await?;

        data.insert(fields::OWNER_ID.to_string(), Value::from(user.uid.as_str()));
        data.insert(
            fields::OWNER_NAME.to_string(),
            Value::from(profile.display_name),
        );
        data.insert(fields::CREATED_AT.to_string(), server_timestamp());
        self.store
            .write(&StorePath::event(&event_id)?, Value::Object(data))
            .await
            .inspect_err(|e| {
                warn!(event_id = %event_id, error = %e, "credential stored but event record write failed");
            })?;

        self.audit.log(&event_id, &user.uid, AuditKind::EventCreated);
        info!(event_id = %event_id, owner = %user.uid, "event created");
        Ok(event_id)
    }

    /// Make the current user a participant of `event_id`.
    pub async fn join_event(
        &self,
        event_id: &EventId,
        request: JoinRequest,
    ) -> Result<(), AccessError> {
        let user = self.require_user()?;

        match request {
            JoinRequest::AsOwner => self.join_as_owner(event_id, &user).await,
            JoinRequest::WithPassword(password) => {
                self.join_with_password(event_id, &user, &password).await
            }
        }
    }

    async fn join_as_owner(&self, event_id: &EventId, user: &AuthUser) -> Result<(), AccessError> {
        let record: EventRecord = read_typed(&self.store, &StorePath::event(event_id)?)
            .await?
            .ok_or_else(|| AccessError::EventNotFound(event_id.clone()))?;

        if record.owner_id != user.uid {
            warn!(event_id = %event_id, user = %user.uid, "owner bypass refused");
            self.audit.log(event_id, &user.uid, AuditKind::JoinRejected);
            return Err(AccessError::NotEventOwner);
        }

        self.set_participation(event_id, &user.uid, true).await?;
        self.audit.log(event_id, &user.uid, AuditKind::JoinedAsOwner);
        info!(event_id = %event_id, user = %user.uid, "owner joined event");
        Ok(())
    }

    async fn join_with_password(
        &self,
        event_id: &EventId,
        user: &AuthUser,
        password: &Password,
    ) -> Result<(), AccessError> {
        let credential: Credential =
            read_typed(&self.store, &StorePath::event_credential(event_id)?)
                .await?
                .ok_or_else(|| AccessError::EventNotFound(event_id.clone()))?;

        let candidate = self
            .engine
            .verify(password, &credential.params.salt, &credential.params)?;

        // Every attempt is recorded, matching or not.
        self.store
            .write(
                &StorePath::event_application(event_id, &user.uid)?,
                Value::from(candidate.as_str()),
            )
            .await?;

        if !CredentialEngine::matches(&candidate, &credential.derived_key) {
            warn!(event_id = %event_id, user = %user.uid, "join rejected: password mismatch");
            self.audit.log(event_id, &user.uid, AuditKind::JoinRejected);
            return Err(AccessError::InvalidCredential);
        }

        self.set_participation(event_id, &user.uid, true)
            .await
            .inspect_err(|e| {
                warn!(
                    event_id = %event_id,
                    user = %user.uid,
                    error = %e,
                    "application recorded but participation write failed; join can be retried"
                );
            })?;

        self.audit.log(event_id, &user.uid, AuditKind::JoinGranted);
        info!(event_id = %event_id, user = %user.uid, "user joined event");
        Ok(())
    }

    /// Remove the current user from `event_id`. Leaving twice is harmless.
    pub async fn leave_event(&self, event_id: &EventId) -> Result<(), AccessError> {
        let user = self.require_user()?;
        self.set_participation(event_id, &user.uid, false).await?;
        self.audit.log(event_id, &user.uid, AuditKind::Left);
        info!(event_id = %event_id, user = %user.uid, "user left event");
        Ok(())
    }

    pub async fn is_participant(
        &self,
        event_id: &EventId,
        user_id: &UserId,
    ) -> Result<bool, AccessError> {
        let flag = self
            .store
            .read(&StorePath::event_participant(event_id, user_id)?)
            .await?;
        Ok(matches!(flag, Some(Value::Bool(true))))
    }

    /// The most recent events, oldest first.
    ///
    /// `limit` defaults to the configured event list limit. Records that do
    /// not parse as events are skipped.
    pub async fn list_events(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<(EventId, EventRecord)>, AccessError> {
        let limit = limit.unwrap_or(self.event_list_limit);
        let Some(Value::Object(all)) = self.store.read(&StorePath::events()).await? else {
            return Ok(Vec::new());
        };

        let mut listed: Vec<(EventId, EventRecord)> = all
            .into_iter()
            .filter_map(|(key, value)| match serde_json::from_value(value) {
                Ok(record) => Some((EventId::new(key), record)),
                Err(e) => {
                    warn!(event_id = %key, error = %e, "skipping malformed event record");
                    None
                }
            })
            .collect();

        listed.sort_by(|(a_id, a), (b_id, b)| {
            a.created_at.cmp(&b.created_at).then_with(|| a_id.cmp(b_id))
        });
        let skip = listed.len().saturating_sub(limit);
        Ok(listed.split_off(skip))
    }

    /// Profile of the current user, registering it on first access.
    pub async fn current_user_profile(&self) -> Result<UserProfile, AccessError> {
        let user = self.require_user()?;

        // Held across the registration so concurrent first calls register once.
        let mut cached = self.profile.lock().await;
        if let Some(profile) = cached.as_ref().filter(|p| p.id == user.uid) {
            return Ok(profile.clone());
        }

        let path = StorePath::user(&user.uid)?;
        let profile = match read_typed::<_, UserProfile>(&self.store, &path).await? {
            Some(profile) => profile,
            None => self.register(&user, &path).await?,
        };

        *cached = Some(profile.clone());
        Ok(profile)
    }

    async fn register(&self, user: &AuthUser, path: &StorePath) -> Result<UserProfile, AccessError> {
        let mut data = Map::new();
        data.insert("id".to_string(), Value::from(user.uid.as_str()));
        data.insert("nickName".to_string(), Value::from(user.display_name.as_str()));
        data.insert("displayName".to_string(), Value::from(user.display_name.as_str()));
        data.insert(fields::CREATED_AT.to_string(), server_timestamp());
        self.store.write(path, Value::Object(data)).await?;
        info!(user = %user.uid, "user registered");

        let stored = read_typed::<_, UserProfile>(&self.store, path).await?;
        Ok(stored.unwrap_or_else(|| UserProfile {
            id: user.uid.clone(),
            nick_name: user.display_name.clone(),
            display_name: user.display_name.clone(),
            created_at: crate::utils::time::now_millis(),
        }))
    }

    async fn set_participation(
        &self,
        event_id: &EventId,
        user_id: &UserId,
        participant: bool,
    ) -> Result<(), AccessError> {
        let path = StorePath::event_participant(event_id, user_id)?;
        self.store.write(&path, Value::Bool(participant)).await?;
        debug!(path = %path, participant, "participation updated");
        Ok(())
    }

    fn require_user(&self) -> Result<AuthUser, AccessError> {
        self.identity
            .current_user()
            .ok_or(AccessError::Unauthenticated)
    }
}

fn to_value(credential: &Credential) -> Result<Value, StoreError> {
    Ok(serde_json::to_value(credential)?)
}
