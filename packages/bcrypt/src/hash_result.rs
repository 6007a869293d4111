//! The 60-character hash string

use crate::base64;
use crate::params::{HashParameters, HashSetting, Minor};
use crate::salt::SALT_STRING_LEN;
use crate::{BcryptError, Result};
use subtle::ConstantTimeEq;

/// A complete bcrypt hash: `$2<minor>$<NN>$` + 22 salt symbols + 31 digest symbols
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BcryptHash {
    encoded: String,
    params: HashParameters,
}

impl BcryptHash {
    /// Length of every hash string
    pub const LEN: usize = 60;

    pub(crate) fn from_parts(encoded: String, params: HashParameters) -> Self {
        Self { encoded, params }
    }

    /// Parse and validate a stored hash string
    ///
    /// # Errors
    ///
    /// Returns an invalid-argument class error if the string is not exactly
    /// 60 characters, its identifier or salt is malformed, or its digest holds
    /// a symbol outside the bcrypt alphabet.
    pub fn parse(hash: &str) -> Result<Self> {
        if hash.len() != Self::LEN {
            return Err(BcryptError::invalid_argument(format!(
                "hash must be {} characters, got {}",
                Self::LEN,
                hash.len()
            )));
        }
        let setting = HashSetting::parse(hash)?;
        if let Some((offset, &symbol)) = hash.as_bytes()[SALT_STRING_LEN..]
            .iter()
            .enumerate()
            .find(|(_, &c)| !base64::is_symbol(c))
        {
            return Err(BcryptError::InvalidEncoding {
                symbol: char::from(symbol),
                offset: SALT_STRING_LEN + offset,
            });
        }
        Ok(Self {
            encoded: hash.to_string(),
            params: setting.params,
        })
    }

    /// The full hash string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    /// Minor version
    #[must_use]
    pub fn minor(&self) -> Minor {
        self.params.minor()
    }

    /// Cost exponent
    #[must_use]
    pub fn log_rounds(&self) -> u32 {
        self.params.log_rounds()
    }

    /// Identifier and salt, `$2<minor>$<NN>$<salt>`
    #[must_use]
    pub fn setting(&self) -> &str {
        &self.encoded[..SALT_STRING_LEN]
    }

    /// The 22 encoded salt symbols
    #[must_use]
    pub fn salt_text(&self) -> &str {
        &self.encoded[7..SALT_STRING_LEN]
    }

    /// The 31 encoded digest symbols
    #[must_use]
    pub fn digest_text(&self) -> &str {
        &self.encoded[SALT_STRING_LEN..]
    }

    /// Compare against another hash string in constant time
    #[must_use]
    pub fn ct_matches(&self, other: &str) -> bool {
        self.encoded.as_bytes().ct_eq(other.as_bytes()).into()
    }

    /// Take the hash string
    #[must_use]
    pub fn into_string(self) -> String {
        self.encoded
    }
}

impl std::str::FromStr for BcryptHash {
    type Err = BcryptError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for BcryptHash {
    fn as_ref(&self) -> &str {
        &self.encoded
    }
}

impl From<BcryptHash> for String {
    fn from(hash: BcryptHash) -> Self {
        hash.encoded
    }
}

impl std::fmt::Display for BcryptHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encoded)
    }
}
