// Session entity

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::value_objects::AccountId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// SHA-256 hex digest of the bearer token; the token itself is never stored.
    pub digest: String,
    pub account_id: AccountId,
    pub created_at: i64,
}

pub fn session_digest(token: &str) -> String {
    let digest = Sha256::digest(token.trim().as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}
