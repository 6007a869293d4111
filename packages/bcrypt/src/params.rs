//! Hash identifier parsing: `$2<minor>$<rounds>$<salt>[<digest>]`
//!
//! All validation happens here, before any cipher state exists.

use crate::erase::{secret_buffer, SecretBytes};
use crate::salt::{Salt, ENCODED_SALT_LEN};
use crate::{BcryptError, Result};
use serde::Deserialize;

/// Smallest accepted cost exponent
pub const MIN_LOG_ROUNDS: u32 = 4;

/// Largest accepted cost exponent
pub const MAX_LOG_ROUNDS: u32 = 31;

/// Longest password prefix minor `b` feeds to the key schedule
pub const MAX_KEY_PASSWORD_LEN: usize = 72;

const VERSION: u8 = b'2';

/// Offset of the salt text within a setting string
const SALT_OFFSET: usize = 7;

/// Minor version of the hash format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Minor {
    /// Legacy: the whole password plus terminator is the key
    A,
    /// The password is capped at 72 bytes before the terminator is added
    B,
}

impl Minor {
    /// The minor character as it appears after `$2`
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::A => 'a',
            Self::B => 'b',
        }
    }

    /// Parse a minor character
    ///
    /// # Errors
    ///
    /// Returns `BcryptError::InvalidArgument` for anything but `a` or `b`.
    pub fn from_byte(minor: u8) -> Result<Self> {
        match minor {
            b'a' => Ok(Self::A),
            b'b' => Ok(Self::B),
            other => Err(BcryptError::invalid_argument(format!(
                "unsupported minor version {:?}",
                char::from(other)
            ))),
        }
    }

    /// Key length, terminator included, for a password of `password_len`
    /// bytes.
    ///
    /// The 72-byte cap of minor `b` is a security property of the format and
    /// must not be widened.
    #[must_use]
    pub fn key_len(self, password_len: usize) -> usize {
        match self {
            Self::A => password_len + 1,
            Self::B => password_len.min(MAX_KEY_PASSWORD_LEN) + 1,
        }
    }
}

impl Default for Minor {
    fn default() -> Self {
        Self::B
    }
}

impl std::fmt::Display for Minor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Clamp a cost exponent into the accepted range
#[must_use]
pub fn clamp_log_rounds(log_rounds: u32) -> u32 {
    log_rounds.clamp(MIN_LOG_ROUNDS, MAX_LOG_ROUNDS)
}

/// Validated hash parameters, fixed for the lifetime of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashParameters {
    minor: Minor,
    log_rounds: u32,
}

impl HashParameters {
    /// Build parameters, rejecting a cost outside 4..=31
    ///
    /// # Errors
    ///
    /// Returns `BcryptError::InvalidArgument` for an out-of-range cost.
    pub fn new(minor: Minor, log_rounds: u32) -> Result<Self> {
        if !(MIN_LOG_ROUNDS..=MAX_LOG_ROUNDS).contains(&log_rounds) {
            return Err(BcryptError::invalid_argument(format!(
                "log_rounds {log_rounds} outside {MIN_LOG_ROUNDS}..={MAX_LOG_ROUNDS}"
            )));
        }
        Ok(Self { minor, log_rounds })
    }

    /// Minor version
    #[must_use]
    pub fn minor(&self) -> Minor {
        self.minor
    }

    /// Cost exponent
    #[must_use]
    pub fn log_rounds(&self) -> u32 {
        self.log_rounds
    }

    /// Expansion rounds, `2^log_rounds`
    #[must_use]
    pub fn rounds(&self) -> u32 {
        1u32 << self.log_rounds
    }

    /// Build the key schedule input for `password`: the bytes up to the first
    /// NUL, capped per minor version, then a NUL terminator.
    ///
    /// # Errors
    ///
    /// Returns `BcryptError::AllocationFailure` if the key buffer cannot be reserved.
    pub fn key_bytes(&self, password: &[u8]) -> Result<SecretBytes> {
        let strlen = password
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(password.len());
        let key_len = self.minor.key_len(strlen);

        let mut key = secret_buffer(key_len)?;
        key.extend_from_slice(&password[..key_len - 1]);
        key.push(0);
        Ok(key)
    }
}

/// A parsed identifier: parameters plus the decoded salt
#[derive(Debug, Clone)]
pub struct HashSetting {
    /// Minor version and cost
    pub params: HashParameters,
    /// The first 16 decoded salt bytes
    pub salt: Box<Salt>,
}

impl HashSetting {
    /// Parse `$2<minor>$<NN>$<salt>`, ignoring anything after the 22 salt
    /// symbols (such as a digest).
    ///
    /// # Errors
    ///
    /// Every structural deviation is an invalid-argument class error:
    /// missing `$`, wrong version, unknown minor, a rounds field that is not
    /// two digits followed by `$`, a cost outside 4..=31, salt text shorter
    /// than 22 symbols, or a salt symbol outside the bcrypt alphabet.
    pub fn parse(setting: &str) -> Result<Self> {
        let bytes = setting.as_bytes();
        let at = |i: usize| bytes.get(i).copied();

        if at(0) != Some(b'$') {
            return Err(BcryptError::invalid_argument("identifier must start with '$'"));
        }
        if at(1) != Some(VERSION) {
            return Err(BcryptError::invalid_argument("unsupported bcrypt version"));
        }
        let minor = Minor::from_byte(at(2).unwrap_or(0))?;
        if at(3) != Some(b'$') {
            return Err(BcryptError::invalid_argument("missing '$' after version"));
        }

        let log_rounds = match (at(4), at(5), at(6)) {
            (Some(hi), Some(lo), Some(b'$')) if hi.is_ascii_digit() && lo.is_ascii_digit() => {
                u32::from(hi - b'0') * 10 + u32::from(lo - b'0')
            }
            _ => {
                return Err(BcryptError::invalid_argument(
                    "rounds field must be two digits followed by '$'",
                ))
            }
        };
        let params = HashParameters::new(minor, log_rounds)?;

        let salt_text = &bytes[SALT_OFFSET..];
        if salt_text.len() < ENCODED_SALT_LEN {
            return Err(BcryptError::invalid_argument(format!(
                "salt must be at least {ENCODED_SALT_LEN} symbols, got {}",
                salt_text.len()
            )));
        }
        let salt = Salt::decode_boxed(salt_text).map_err(|e| match e {
            BcryptError::InvalidEncoding { symbol, offset } => BcryptError::InvalidEncoding {
                symbol,
                offset: SALT_OFFSET + offset,
            },
            other => other,
        })?;

        Ok(Self { params, salt })
    }
}
