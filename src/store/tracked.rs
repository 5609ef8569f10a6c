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

//! Activity-tracking store middleware.
//!
//! Wraps any `KeyPathStore` so every call is counted by an `ActivityTracker`
//! for as long as it is in flight, whether it succeeds or fails.

use crate::activity::ActivityTracker;
use crate::engine_core::errors::StoreError;
use crate::store::path::StorePath;
use crate::store::traits::KeyPathStore;
use async_trait::async_trait;
use serde_json::Value;

pub struct TrackedStore<S> {
    inner: S,
    tracker: ActivityTracker,
}

impl<S> TrackedStore<S> {
    pub fn new(inner: S, tracker: ActivityTracker) -> Self {
        Self { inner, tracker }
    }

    pub fn tracker(&self) -> &ActivityTracker {
        &self.tracker
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: KeyPathStore> KeyPathStore for TrackedStore<S> {
    async fn new_key(&self, parent: &StorePath) -> Result<String, StoreError> {
        let _guard = self.tracker.begin();
        self.inner.new_key(parent).await
    }

    async fn read(&self, path: &StorePath) -> Result<Option<Value>, StoreError> {
        let _guard = self.tracker.begin();
        self.inner.read(path).await
    }

    async fn write(&self, path: &StorePath, value: Value) -> Result<(), StoreError> {
        let _guard = self.tracker.begin();
        self.inner.write(path, value).await
    }

    async fn append(&self, parent: &StorePath, value: Value) -> Result<String, StoreError> {
        let _guard = self.tracker.begin();
        self.inner.append(parent, value).await
    }
}
