//! Store layer.
//!
//! The `KeyPathStore` seam to the remote hierarchical store, typed paths, an
//! in-memory implementation, and the `TrackedStore` activity middleware.

pub mod memory;
pub mod path;
pub mod traits;
pub mod tracked;

pub use path::StorePath;
pub use traits::{read_typed, KeyPathStore};
pub use tracked::TrackedStore;

use crate::engine_core::constants::fields;
use serde_json::{Map, Value};

/// Placeholder the store replaces with its own clock on write.
pub fn server_timestamp() -> Value {
    let mut placeholder = Map::new();
    placeholder.insert(
        fields::SERVER_VALUE.to_string(),
        Value::from(fields::SERVER_TIMESTAMP),
    );
    Value::Object(placeholder)
}
