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

//! Key-Path Store Trait.
//!
//! Defines the interface to the hierarchical data store the protocol writes
//! to. Each call is atomic for its own path only: there are no cross-path
//! transactions, and concurrent writers to one path resolve last-write-wins.

use crate::engine_core::errors::StoreError;
use crate::store::path::StorePath;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

#[async_trait]
pub trait KeyPathStore: Send + Sync {
    /// Allocate a fresh, chronologically ordered child key under `parent`
    /// without writing anything.
    async fn new_key(&self, parent: &StorePath) -> Result<String, StoreError>;

    /// Read the value at `path`; `None` when nothing is stored there.
    async fn read(&self, path: &StorePath) -> Result<Option<Value>, StoreError>;

    /// Replace the value at `path`. Writing `null` deletes it.
    async fn write(&self, path: &StorePath, value: Value) -> Result<(), StoreError>;

    /// Store `value` under a fresh child key of `parent` and return the key.
    async fn append(&self, parent: &StorePath, value: Value) -> Result<String, StoreError> {
        let key = self.new_key(parent).await?;
        self.write(&parent.child(&key)?, value).await?;
        Ok(key)
    }
}

#[async_trait]
impl<S: KeyPathStore + ?Sized> KeyPathStore for Arc<S> {
    async fn new_key(&self, parent: &StorePath) -> Result<String, StoreError> {
        (**self).new_key(parent).await
    }

    async fn read(&self, path: &StorePath) -> Result<Option<Value>, StoreError> {
        (**self).read(path).await
    }

    async fn write(&self, path: &StorePath, value: Value) -> Result<(), StoreError> {
        (**self).write(path, value).await
    }

    async fn append(&self, parent: &StorePath, value: Value) -> Result<String, StoreError> {
        (**self).append(parent, value).await
    }
}

/// Read and deserialize the value at `path`.
pub async fn read_typed<S, T>(store: &S, path: &StorePath) -> Result<Option<T>, StoreError>
where
    S: KeyPathStore + ?Sized,
    T: DeserializeOwned,
{
    match store.read(path).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}
