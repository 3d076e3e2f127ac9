//! Credential verification.
//!
//! Passwords are stored as Argon2 PHC strings. Configuration may carry
//! plaintext passwords for local development; those are hashed once at load
//! time and a warning is logged.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use anyhow::Context;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Principal, Role};

/// A provisioned account as it appears in configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct UserCredentials {
    pub username: String,
    /// Argon2 PHC string (`$argon2id$...`) or plaintext.
    pub password: String,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl std::fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .field("roles", &self.roles)
            .finish()
    }
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// `Ok(None)` means the username is unknown or the password is wrong.
    async fn authenticate(&self, username: &str, password: &str)
        -> anyhow::Result<Option<Principal>>;
}

struct StoredUser {
    password_hash: Arc<str>,
    roles: BTreeSet<Role>,
}

#[derive(Default)]
pub struct InMemoryCredentialStore {
    users: HashMap<String, StoredUser>,
}

impl InMemoryCredentialStore {
    pub fn from_config(users: &[UserCredentials]) -> anyhow::Result<Self> {
        let mut store = Self::default();
        for user in users {
            if store.users.contains_key(&user.username) {
                anyhow::bail!("duplicate user '{}' in security config", user.username);
            }

            let password_hash = if PasswordHash::new(&user.password).is_ok() {
                user.password.clone()
            } else {
                tracing::warn!(
                    username = %user.username,
                    "plaintext password in config; hashing at startup"
                );
                hash_password(&user.password)
                    .with_context(|| format!("failed to hash password for '{}'", user.username))?
            };

            store.users.insert(
                user.username.clone(),
                StoredUser {
                    password_hash: password_hash.into(),
                    roles: user.roles.iter().copied().collect(),
                },
            );
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> anyhow::Result<Option<Principal>> {
        let Some(user) = self.users.get(username) else {
            return Ok(None);
        };

        // Argon2 is CPU-bound; keep it off the async workers.
        let hash = user.password_hash.clone();
        let password = password.to_owned();
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .context("password verification task failed")??;

        Ok(verified.then(|| Principal {
            username: username.to_owned(),
            roles: user.roles.clone(),
        }))
    }
}

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("argon2 hashing failed: {e}"))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("stored hash is invalid: {e}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
