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

//! Identity Provider Trait.
//!
//! The sign-in flow lives outside this crate; the protocol only asks who the
//! current user is, if anyone.

use crate::engine_core::types::UserId;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: UserId,
    pub display_name: String,
}

impl AuthUser {
    pub fn new(uid: impl Into<UserId>, display_name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: display_name.into(),
        }
    }
}

pub trait IdentityProvider: Send + Sync {
    /// The authenticated user, `None` when signed out.
    fn current_user(&self) -> Option<AuthUser>;
}

impl<T: IdentityProvider + ?Sized> IdentityProvider for Arc<T> {
    fn current_user(&self) -> Option<AuthUser> {
        (**self).current_user()
    }
}

/// Identity held in memory, set by the embedding host after sign-in.
#[derive(Debug, Default)]
pub struct StaticIdentity {
    user: RwLock<Option<AuthUser>>,
}

impl StaticIdentity {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user: AuthUser) -> Self {
        Self {
            user: RwLock::new(Some(user)),
        }
    }

    pub fn sign_in(&self, user: AuthUser) {
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = Some(user);
    }

    pub fn sign_out(&self) {
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<AuthUser> {
        self.user.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
