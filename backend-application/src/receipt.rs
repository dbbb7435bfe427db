use anyhow::anyhow;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use backend_domain::OpeningRecordRow;

use crate::AppError;

const RECEIPT_PREFIX: &str = "caseforge";
const RECEIPT_VERSION: &str = "v1";

type HmacSha256 = Hmac<Sha256>;

/// Canonical text covered by an opening receipt signature.
pub fn receipt_payload(record: &OpeningRecordRow) -> String {
    format!(
        "{}|{}|{}|{}|{}|{}|{}|{}|{}",
        RECEIPT_PREFIX,
        RECEIPT_VERSION,
        record.opening_id,
        record.account_id,
        record.case_id,
        record.roll,
        record.drop_id,
        record.item_id,
        record.partition_fingerprint
    )
}

pub fn sign_receipt(secret: &str, record: &OpeningRecordRow) -> Result<String, AppError> {
    sign_hmac_sha256(secret, &receipt_payload(record))
}

pub fn verify_receipt(secret: &str, record: &OpeningRecordRow) -> Result<bool, AppError> {
    if record.receipt_signature.is_empty() {
        return Ok(false);
    }
    let expected = sign_receipt(secret, record)?;
    Ok(expected == record.receipt_signature)
}

fn sign_hmac_sha256(secret: &str, payload: &str) -> Result<String, AppError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|err| AppError::Internal(anyhow!("invalid hmac secret: {}", err)))?;
    mac.update(payload.as_bytes());
    let bytes = mac.finalize().into_bytes();
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push_str(&format!("{byte:02x}"));
    }
    Ok(out)
}
