//! Authentication and authorization for every request entering the host.
//!
//! * [`basic`] parses `Authorization: Basic` headers.
//! * [`credentials`] verifies a username/password pair and yields a [`Principal`].
//! * [`policy`] decides, from the verb and path alone, whether a principal may
//!   proceed.
//! * [`middleware`] glues the three together in front of route dispatch.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub mod basic;
pub mod credentials;
pub mod middleware;
pub mod policy;

pub use credentials::{CredentialStore, InMemoryCredentialStore, UserCredentials};
pub use policy::{AccessDenied, AccessPolicy, AccessRule, PathPattern};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => f.write_str("USER"),
            Self::Admin => f.write_str("ADMIN"),
        }
    }
}

/// An authenticated caller. Roles are taken as provisioned: `ADMIN` does
/// not imply `USER`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub roles: BTreeSet<Role>,
}

impl Principal {
    pub fn new(username: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            username: username.into(),
            roles: roles.into_iter().collect(),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}
