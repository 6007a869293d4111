//! Interruptible bcrypt password hashing
//!
//! The key schedule runs as a resumable job: each dispatch performs a burst of
//! expansion rounds, measures itself against a 1 ms quantum and retunes the
//! burst size before yielding. Hashes are bit-identical to standard bcrypt no
//! matter how the work was sliced.

#![forbid(unsafe_code)]

pub mod api;
pub mod async_result;
pub mod base64;
pub mod cipher;
pub mod config;
pub mod engine;
pub mod erase;
pub mod error;
pub mod finalize;
pub mod hash_result;
pub mod job;
pub mod params;
pub mod salt;

// Re-export error types
pub use error::{BcryptError, Result};

// Re-export the main APIs
pub use api::{hash, hash_with_setting, verify, Bcrypt, HashCost};
pub use async_result::{AsyncBcryptResult, AsyncBcryptResultWithHandler};
pub use config::BcryptConfig;
pub use hash_result::BcryptHash;
pub use job::BcryptJob;
pub use params::{HashParameters, HashSetting, Minor};
pub use salt::{encode_salt, encode_salt_into, gen_salt, Salt};

/// Main entry point
pub struct Cryypt;

impl Cryypt {
    /// Bcrypt builder with the default configuration
    #[must_use]
    pub fn bcrypt() -> Bcrypt {
        Bcrypt::new()
    }
}
