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

//! Access Types.
//!
//! Strongly typed identifiers and a password wrapper that cannot leak into logs.

use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned event identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

/// Identity-provider user identifier (e.g. "google:12345").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(EventId);
string_id!(UserId);

/// Human-entered password with memory protection
///
/// Uses `secrecy::Secret` so the value is zeroized on drop and never shows up
/// in `Debug` or `Display` output.
pub struct Password(Secret<String>);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(Secret::new(password.into()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    /// Expose the secret password (use with caution)
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl From<&str> for Password {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Password {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Password")
            .field("value", &"<REDACTED>")
            .finish()
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<REDACTED>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_redaction() {
        let password = Password::new("hunter2");
        let debug_str = format!("{:?}", password);
        let display_str = format!("{}", password);

        assert!(!debug_str.contains("hunter2"), "Debug should not expose password");
        assert!(!display_str.contains("hunter2"), "Display should not expose password");
        assert!(debug_str.contains("<REDACTED>"));
        assert_eq!(password.expose_secret(), "hunter2");
    }

    #[test]
    fn test_empty_password() {
        assert!(Password::new("").is_empty());
        assert!(!Password::from("x").is_empty());
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let id = UserId::new("google:12345");
        assert_eq!(
            serde_json::to_value(&id).unwrap(),
            serde_json::json!("google:12345")
        );
        let event: EventId = serde_json::from_value(serde_json::json!("-Nabc")).unwrap();
        assert_eq!(event.as_str(), "-Nabc");
    }
}
