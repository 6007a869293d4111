//! Blocking bcrypt entry points
//!
//! These drive the job to completion on the calling thread. Use the
//! [`Bcrypt`](super::Bcrypt) builder to hash cooperatively on tokio.

use crate::job::BcryptJob;
use crate::salt::gen_salt;
use crate::{BcryptHash, Result};
use async_task::Resumable;
use tracing::debug;

/// Hash `password` under a fresh random salt at `log_rounds` (clamped to 4..=31)
///
/// # Errors
///
/// Returns `BcryptError::AllocationFailure` if the key buffer cannot be reserved.
pub fn hash(password: impl AsRef<[u8]>, log_rounds: u32) -> Result<BcryptHash> {
    hash_with_setting(password, &gen_salt(log_rounds))
}

/// Hash `password` under an existing setting, either a salt string or a full
/// hash whose salt is reused
///
/// # Errors
///
/// Returns an invalid-argument class error for a malformed setting.
pub fn hash_with_setting(password: impl AsRef<[u8]>, setting: &str) -> Result<BcryptHash> {
    let job: BcryptJob = BcryptJob::start(password.as_ref(), setting)?;
    Ok(job.run_to_completion())
}

/// Check `password` against a stored hash
///
/// The recomputed hash is compared in constant time.
///
/// # Errors
///
/// Returns an invalid-argument class error if `hash` is not a well-formed
/// bcrypt hash.
pub fn verify(password: impl AsRef<[u8]>, hash: &str) -> Result<bool> {
    let stored = BcryptHash::parse(hash)?;
    let computed = hash_with_setting(password, stored.setting())?;
    let matches = computed.ct_matches(stored.as_str());
    debug!(matches, log_rounds = stored.log_rounds(), "bcrypt verify");
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash("hunter2", 4).expect("hash");
        assert_eq!(hash.log_rounds(), 4);
        assert!(verify("hunter2", hash.as_str()).expect("well-formed hash"));
        assert!(!verify("hunter3", hash.as_str()).expect("well-formed hash"));
    }

    #[test]
    fn fresh_salts_differ() {
        let a = hash("same", 4).expect("hash");
        let b = hash("same", 4).expect("hash");
        assert_ne!(a.salt_text(), b.salt_text());
        assert_ne!(a, b);
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        let err = verify("x", "$2b$04$short").expect_err("malformed");
        assert!(err.is_invalid_argument());
    }
}
