use std::collections::HashMap;
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Context;
use argon2::password_hash::{SaltString, rand_core};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash};

/// Username and password taken from a Basic `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Checks callers against the configured credential set.
///
/// Plain entries are compared exactly; entries in argon2 PHC form are
/// verified as hashes on the blocking pool.
pub struct CredentialService {
    hasher: Argon2<'static>,
    credentials: HashMap<String, String>,
    #[cfg(test)]
    checks: AtomicUsize,
}

impl CredentialService {
    pub fn new(credentials: HashMap<String, String>) -> Self {
        Self {
            hasher: Argon2::default(),
            credentials,
            #[cfg(test)]
            checks: AtomicUsize::new(0),
        }
    }

    pub fn hash(&self, password: &str) -> Result<String, password_hash::Error> {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        let hash = self.hasher.hash_password(password.as_bytes(), &salt)?;

        Ok(hash.to_string())
    }

    pub async fn verify(&self, credentials: Option<&Credentials>) -> anyhow::Result<bool> {
        #[cfg(test)]
        self.checks.fetch_add(1, Ordering::Relaxed);

        let Some(credentials) = credentials else {
            return Ok(false);
        };

        let Some(expected) = self.credentials.get(&credentials.username) else {
            return Ok(false);
        };

        if !expected.starts_with("$argon2") {
            return Ok(constant_time_eq(expected.as_bytes(), credentials.password.as_bytes()));
        }

        let hasher = self.hasher.clone();
        let expected = expected.clone();
        let username = credentials.username.clone();
        let password = credentials.password.clone();

        tokio::task::spawn_blocking(move || match PasswordHash::new(&expected) {
            Ok(parsed) => hasher.verify_password(password.as_bytes(), &parsed).is_ok(),
            Err(e) => {
                tracing::warn!(username = %username, "unusable password hash: {}", e);
                false
            }
        })
        .await
        .context("password verification task failed")
    }

    #[cfg(test)]
    pub(crate) fn checks(&self) -> usize {
        self.checks.load(Ordering::Relaxed)
    }
}

/// Hashes `password` for a `[[auth.users]]` entry. A trailing line break,
/// as left by reading stdin, is not part of the password.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let password = password.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        anyhow::bail!("password must not be empty");
    }

    CredentialService::new(HashMap::new())
        .hash(password)
        .map_err(|e| anyhow::anyhow!("failed to hash password: {}", e))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter().zip(b).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}
