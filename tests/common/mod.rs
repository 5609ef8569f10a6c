#![allow(dead_code)]

use async_trait::async_trait;
use event_guard::store::StorePath;
use event_guard::{
    AccessControl, AuthUser, CredentialEngine, InMemoryStore, KdfConfig, KeyPathStore,
    StaticIdentity, StoreError,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    NewKey(String),
    Read(String),
    Write(String),
}

/// In-memory store that records every call and can be told to fail writes.
#[derive(Default)]
pub struct RecordingStore {
    inner: InMemoryStore,
    ops: Mutex<Vec<Op>>,
    fail_writes_under: Mutex<Option<String>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> Vec<Op> {
        self.ops.lock().unwrap().clone()
    }

    pub fn clear_ops(&self) {
        self.ops.lock().unwrap().clear();
    }

    pub fn writes(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                Op::Write(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn reads(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                Op::Read(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    /// Fail every write whose path starts with `prefix`.
    pub fn fail_writes_under(&self, prefix: &str) {
        *self.fail_writes_under.lock().unwrap() = Some(prefix.to_string());
    }

    pub fn heal(&self) {
        *self.fail_writes_under.lock().unwrap() = None;
    }

    pub async fn snapshot(&self) -> Value {
        self.inner.snapshot().await
    }

    pub async fn value_at(&self, path: &str) -> Option<Value> {
        self.inner
            .read(&StorePath::collection(path))
            .await
            .unwrap()
    }

    fn record(&self, op: Op) {
        self.ops.lock().unwrap().push(op);
    }
}

#[async_trait]
impl KeyPathStore for RecordingStore {
    async fn new_key(&self, parent: &StorePath) -> Result<String, StoreError> {
        self.record(Op::NewKey(parent.to_string()));
        self.inner.new_key(parent).await
    }

    async fn read(&self, path: &StorePath) -> Result<Option<Value>, StoreError> {
        self.record(Op::Read(path.to_string()));
        self.inner.read(path).await
    }

    async fn write(&self, path: &StorePath, value: Value) -> Result<(), StoreError> {
        let path_str = path.to_string();
        self.record(Op::Write(path_str.clone()));
        let failing = self.fail_writes_under.lock().unwrap().clone();
        if let Some(prefix) = failing {
            if path_str.starts_with(&prefix) {
                return Err(StoreError::Backend(format!("injected failure at {}", path_str)));
            }
        }
        self.inner.write(path, value).await
    }
}

pub type TestAccess = AccessControl<Arc<RecordingStore>, Arc<StaticIdentity>>;

pub fn fast_engine() -> CredentialEngine {
    CredentialEngine::new(KdfConfig::default().with_iterations(10)).unwrap()
}

pub fn alice() -> AuthUser {
    AuthUser::new("google:alice", "Alice")
}

pub fn bob() -> AuthUser {
    AuthUser::new("google:bob", "Bob")
}

/// Protocol over a shared store and a switchable identity.
pub fn setup(user: Option<AuthUser>) -> (TestAccess, Arc<RecordingStore>, Arc<StaticIdentity>) {
    let store = Arc::new(RecordingStore::new());
    let identity = Arc::new(match user {
        Some(user) => StaticIdentity::signed_in(user),
        None => StaticIdentity::anonymous(),
    });
    let access = AccessControl::new(store.clone(), identity.clone(), fast_engine());
    (access, store, identity)
}

/// Second protocol instance over the same store, as another client would see it.
pub fn client(store: &Arc<RecordingStore>, user: AuthUser) -> TestAccess {
    AccessControl::new(
        store.clone(),
        Arc::new(StaticIdentity::signed_in(user)),
        fast_engine(),
    )
}
