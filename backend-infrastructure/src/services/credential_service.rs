use anyhow::anyhow;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use tokio::task;
use tracing::error;

use backend_domain::ports::CredentialHasher;

/// Argon2id with the crate's default parameters; hashes are PHC strings.
/// Hashing and verification run on the blocking pool.
#[derive(Default)]
pub struct Argon2CredentialHasher {
    argon2: Argon2<'static>,
}

impl Argon2CredentialHasher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialHasher for Argon2CredentialHasher {
    async fn hash_password(&self, password: &str) -> anyhow::Result<String> {
        let argon2 = self.argon2.clone();
        let password = password.to_string();
        task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut rand::rngs::OsRng);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|err| anyhow!("argon2: {err}"))
        })
        .await
        .map_err(|err| anyhow!("password hashing task failed: {err}"))?
    }

    async fn verify_password(&self, password: &str, hash: &str) -> bool {
        let argon2 = self.argon2.clone();
        let password = password.to_string();
        let hash = hash.to_string();
        let verified = task::spawn_blocking(move || {
            let Ok(parsed) = PasswordHash::new(&hash) else {
                return false;
            };
            argon2.verify_password(password.as_bytes(), &parsed).is_ok()
        })
        .await;
        match verified {
            Ok(verified) => verified,
            Err(err) => {
                error!("password verification task failed: {}", err);
                false
            }
        }
    }
}
