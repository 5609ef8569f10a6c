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

//! In-memory key-path store.
//!
//! A single JSON tree behind a Tokio `RwLock`. Writes resolve server value
//! placeholders (`{".sv": "timestamp"}`) against the local clock, and empty
//! branches are pruned so that deleting the last child of a node deletes the
//! node, matching the hosted store's behaviour.

use crate::engine_core::constants::fields;
use crate::engine_core::errors::StoreError;
use crate::store::path::StorePath;
use crate::store::traits::KeyPathStore;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Mutex;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug)]
pub struct InMemoryStore {
    root: RwLock<Value>,
    /// Last issued (millis, sequence) pair
    last_key: Mutex<(u64, u32)>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_data(Value::Object(Map::new()))
    }

    /// Seed the store with an existing tree.
    pub fn with_data(data: Value) -> Self {
        Self {
            root: RwLock::new(data),
            last_key: Mutex::new((0, 0)),
        }
    }

    /// Copy of the whole tree.
    pub async fn snapshot(&self) -> Value {
        self.root.read().await.clone()
    }

    fn next_key(&self) -> String {
        let now = crate::utils::time::now_millis();
        let mut last = self.last_key.lock().unwrap_or_else(|e| e.into_inner());
        *last = if now > last.0 {
            (now, 0)
        } else {
            (last.0, last.1.wrapping_add(1))
        };
        // Fixed width hex keeps lexical order equal to issue order.
        format!("{:012x}{:08x}", last.0, last.1)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyPathStore for InMemoryStore {
    async fn new_key(&self, parent: &StorePath) -> Result<String, StoreError> {
        let key = self.next_key();
        debug!(path = %parent, key = %key, "allocated key");
        Ok(key)
    }

    async fn read(&self, path: &StorePath) -> Result<Option<Value>, StoreError> {
        let root = self.root.read().await;
        let mut node = &*root;
        for segment in path.segments() {
            match node.get(segment) {
                Some(child) => node = child,
                None => return Ok(None),
            }
        }
        if node.is_null() {
            return Ok(None);
        }
        Ok(Some(node.clone()))
    }

    async fn write(&self, path: &StorePath, value: Value) -> Result<(), StoreError> {
        if path.segments().is_empty() {
            return Err(StoreError::InvalidPath("cannot write the store root".to_string()));
        }
        let value = resolve_server_values(value, crate::utils::time::now_millis());
        let mut root = self.root.write().await;
        set_at(&mut root, path.segments(), value);
        debug!(path = %path, "write applied");
        Ok(())
    }
}

fn set_at(node: &mut Value, segments: &[String], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *node = value;
        return;
    };
    if !node.is_object() {
        // Deleting below a scalar or an absent node changes nothing.
        if value.is_null() {
            return;
        }
        *node = Value::Object(Map::new());
    }
    if let Value::Object(map) = node {
        if value.is_null() && !map.contains_key(head) {
            return;
        }
        let child = map.entry(head.clone()).or_insert(Value::Null);
        set_at(child, rest, value);
        if is_empty(child) {
            map.remove(head);
        }
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn resolve_server_values(value: Value, now_millis: u64) -> Value {
    match value {
        Value::Object(map) => {
            let is_timestamp = map.len() == 1
                && map.get(fields::SERVER_VALUE).and_then(Value::as_str)
                    == Some(fields::SERVER_TIMESTAMP);
            if is_timestamp {
                return Value::from(now_millis);
            }
            Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, resolve_server_values(v, now_millis)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|v| resolve_server_values(v, now_millis))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::server_timestamp;
    use serde_json::json;

    fn path(p: &str) -> StorePath {
        StorePath::collection(p)
    }

    #[tokio::test]
    async fn test_write_then_read_nested() {
        let store = InMemoryStore::new();
        store.write(&path("a/b/c"), json!(true)).await.unwrap();

        assert_eq!(store.read(&path("a/b/c")).await.unwrap(), Some(json!(true)));
        assert_eq!(
            store.read(&path("a")).await.unwrap(),
            Some(json!({"b": {"c": true}}))
        );
        assert_eq!(store.read(&path("a/x")).await.unwrap(), None);
        assert_eq!(store.read(&path("a/b/c/d")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let store = InMemoryStore::new();
        store.write(&path("flag"), json!(true)).await.unwrap();
        store.write(&path("flag"), json!(false)).await.unwrap();
        assert_eq!(store.read(&path("flag")).await.unwrap(), Some(json!(false)));
    }

    #[tokio::test]
    async fn test_null_deletes_and_prunes() {
        let store = InMemoryStore::new();
        store.write(&path("a/b/c"), json!(1)).await.unwrap();
        store.write(&path("a/d"), json!(2)).await.unwrap();

        store.write(&path("a/b/c"), Value::Null).await.unwrap();
        assert_eq!(store.read(&path("a/b")).await.unwrap(), None);
        assert_eq!(store.read(&path("a")).await.unwrap(), Some(json!({"d": 2})));

        store.write(&path("nothing/here"), Value::Null).await.unwrap();
        assert_eq!(store.snapshot().await, json!({"a": {"d": 2}}));
    }

    #[tokio::test]
    async fn test_null_below_scalar_keeps_scalar() {
        let store = InMemoryStore::new();
        store.write(&path("a"), json!(1)).await.unwrap();

        store.write(&path("a/b"), Value::Null).await.unwrap();
        assert_eq!(store.read(&path("a")).await.unwrap(), Some(json!(1)));

        store.write(&path("a/b"), json!(2)).await.unwrap();
        assert_eq!(store.read(&path("a")).await.unwrap(), Some(json!({"b": 2})));
    }

    #[tokio::test]
    async fn test_server_timestamp_resolved() {
        let store = InMemoryStore::new();
        let before = crate::utils::time::now_millis();
        store
            .write(&path("e/1"), json!({"title": "x", "createdAt": server_timestamp()}))
            .await
            .unwrap();

        let stored = store.read(&path("e/1/createdAt")).await.unwrap().unwrap();
        assert!(stored.as_u64().unwrap() >= before);
        assert_eq!(store.read(&path("e/1/title")).await.unwrap(), Some(json!("x")));
    }

    #[tokio::test]
    async fn test_keys_are_ordered_and_unique() {
        let store = InMemoryStore::new();
        let mut keys = Vec::new();
        for _ in 0..100 {
            keys.push(store.new_key(&path("events")).await.unwrap());
        }
        let mut sorted = keys.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(keys, sorted);
    }

    #[tokio::test]
    async fn test_append_writes_under_new_key() {
        let store = InMemoryStore::new();
        let key = store.append(&path("events"), json!({"n": 1})).await.unwrap();
        let read = store
            .read(&path("events").child(&key).unwrap())
            .await
            .unwrap();
        assert_eq!(read, Some(json!({"n": 1})));
    }
}
