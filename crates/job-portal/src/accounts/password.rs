use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;

use super::domain::PasswordDigest;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("unable to hash password: {0}")]
    Hash(String),
    #[error("stored password digest is malformed: {0}")]
    MalformedDigest(String),
    #[error("password task did not complete: {0}")]
    Task(String),
}

/// Argon2id hasher with per-password random salts.
#[derive(Default, Clone)]
pub struct PasswordHasher {
    argon: Argon2<'static>,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hash(&self, raw: &str) -> Result<PasswordDigest, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon
            .hash_password(raw.as_bytes(), &salt)
            .map_err(|err| PasswordError::Hash(err.to_string()))?;
        Ok(PasswordDigest(hash.to_string()))
    }

    pub fn verify(&self, raw: &str, digest: &PasswordDigest) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(&digest.0)
            .map_err(|err| PasswordError::MalformedDigest(err.to_string()))?;
        Ok(self.argon.verify_password(raw.as_bytes(), &parsed).is_ok())
    }

    /// [`hash`](Self::hash) on tokio's blocking pool.
    pub async fn spawn_hash(&self, raw: String) -> Result<PasswordDigest, PasswordError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&raw))
            .await
            .map_err(|err| PasswordError::Task(err.to_string()))?
    }

    /// [`verify`](Self::verify) on tokio's blocking pool.
    pub async fn spawn_verify(
        &self,
        raw: String,
        digest: PasswordDigest,
    ) -> Result<bool, PasswordError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&raw, &digest))
            .await
            .map_err(|err| PasswordError::Task(err.to_string()))?
    }
}
