//! Raw salts and the `$2b$NN$<salt>` setting string

use crate::base64;
use crate::params::{clamp_log_rounds, Minor};
use crate::{BcryptError, Result};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Raw salt length in bytes
pub const SALT_LEN: usize = 16;

/// Encoded salt length in symbols
pub const ENCODED_SALT_LEN: usize = base64::encoded_len(SALT_LEN);

/// Length of `$2b$NN$` plus the encoded salt
pub const SALT_STRING_LEN: usize = 7 + ENCODED_SALT_LEN;

/// Exactly 16 raw salt bytes, zeroed on drop
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Salt([u8; SALT_LEN]);

impl Salt {
    /// Wrap raw salt bytes
    #[must_use]
    pub fn new(bytes: [u8; SALT_LEN]) -> Self {
        Self(bytes)
    }

    /// Draw a salt from the thread-local CSPRNG
    #[must_use]
    pub fn random() -> Self {
        let mut salt = Self([0u8; SALT_LEN]);
        rand::rng().fill_bytes(&mut salt.0);
        salt
    }

    /// Decode a salt from the first 22 symbols of `text`
    ///
    /// # Errors
    ///
    /// Returns an invalid-argument class error if `text` is too short or
    /// holds a symbol outside the bcrypt alphabet.
    pub fn decode(text: &[u8]) -> Result<Self> {
        let mut salt = Self([0u8; SALT_LEN]);
        base64::decode_into(text, &mut salt.0)?;
        Ok(salt)
    }

    /// Like [`Salt::decode`], decoding straight into a heap allocation so no
    /// copy of the salt is left on the stack
    ///
    /// # Errors
    ///
    /// Same as [`Salt::decode`].
    pub fn decode_boxed(text: &[u8]) -> Result<Box<Self>> {
        let mut salt = Box::new(Self([0u8; SALT_LEN]));
        base64::decode_into(text, &mut salt.0)?;
        Ok(salt)
    }

    /// Draw a salt from the thread-local CSPRNG directly into a heap allocation
    #[must_use]
    pub fn random_boxed() -> Box<Self> {
        let mut salt = Box::new(Self([0u8; SALT_LEN]));
        rand::rng().fill_bytes(&mut salt.0);
        salt
    }

    /// Raw salt bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; SALT_LEN] {
        &self.0
    }

    /// The 22-symbol encoding
    #[must_use]
    pub fn encode(&self) -> String {
        base64::encode(&self.0)
    }
}

impl std::fmt::Debug for Salt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Salt(..)")
    }
}

impl From<[u8; SALT_LEN]> for Salt {
    fn from(bytes: [u8; SALT_LEN]) -> Self {
        Self::new(bytes)
    }
}

/// Format a salt setting string, `$2b$NN$` followed by the encoded salt.
///
/// `log_rounds` is clamped to 4..=31; it is never rejected.
#[must_use]
pub fn encode_salt(salt: &Salt, log_rounds: u32) -> String {
    let mut out = String::with_capacity(SALT_STRING_LEN);
    out.push_str(&format!(
        "$2{}${:02}$",
        Minor::B.as_char(),
        clamp_log_rounds(log_rounds)
    ));
    base64::encode_into(&mut out, salt.as_bytes());
    out
}

/// Write the salt setting string into `dest`, returning the number of bytes
/// written.
///
/// # Errors
///
/// Returns `BcryptError::BufferTooSmall` if `dest` holds fewer than
/// [`SALT_STRING_LEN`] bytes; nothing is written in that case.
pub fn encode_salt_into(dest: &mut [u8], salt: &Salt, log_rounds: u32) -> Result<usize> {
    if dest.len() < SALT_STRING_LEN {
        return Err(BcryptError::BufferTooSmall {
            needed: SALT_STRING_LEN,
            actual: dest.len(),
        });
    }
    let encoded = encode_salt(salt, log_rounds);
    dest[..SALT_STRING_LEN].copy_from_slice(encoded.as_bytes());
    Ok(SALT_STRING_LEN)
}

/// Generate a fresh random salt setting string for `log_rounds`
#[must_use]
pub fn gen_salt(log_rounds: u32) -> String {
    encode_salt(&Salt::random_boxed(), log_rounds)
}
