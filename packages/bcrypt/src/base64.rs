//! Bcrypt's base64 variant
//!
//! Not RFC 4648: the alphabet starts with `./`, then `A-Z`, `a-z`, `0-9`, and
//! no padding is ever written or accepted. Three bytes map to four symbols; a
//! trailing group of one or two bytes maps to two or three symbols.

use crate::erase::secure_zero;
use crate::{BcryptError, Result};
use ::base64::alphabet;
use ::base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use ::base64::{DecodeError, DecodeSliceError, Engine as _};
use zeroize::Zeroizing;

/// The 64-symbol alphabet, zero-indexed
pub const ALPHABET: &[u8; 64] = b"./ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Unpadded engine over the bcrypt alphabet; the unused low bits of a
/// trailing partial group are ignored on decode
const BCRYPT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::BCRYPT,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

/// Number of symbols produced for `len` input bytes
#[must_use]
pub const fn encoded_len(len: usize) -> usize {
    (len * 4 + 2) / 3
}

/// Whether `symbol` belongs to the alphabet
#[must_use]
pub fn is_symbol(symbol: u8) -> bool {
    ALPHABET.contains(&symbol)
}

/// Encode `data`
#[must_use]
pub fn encode(data: &[u8]) -> String {
    BCRYPT_ENGINE.encode(data)
}

/// Append the encoding of `data` to `out`
pub fn encode_into(out: &mut String, data: &[u8]) {
    BCRYPT_ENGINE.encode_string(data, out);
}

/// Decode exactly `out.len()` bytes from the start of `text`.
///
/// Symbols past the ones needed are ignored. On failure `out` is zeroed.
///
/// # Errors
///
/// - `BcryptError::InvalidArgument` if `text` is too short to yield `out.len()` bytes
/// - `BcryptError::InvalidEncoding` if a needed symbol is outside the alphabet
pub fn decode_into(text: &[u8], out: &mut [u8]) -> Result<()> {
    let needed = encoded_len(out.len());
    if text.len() < needed {
        return Err(BcryptError::invalid_argument(format!(
            "base64 text too short: {} bytes need {needed} symbols, got {}",
            out.len(),
            text.len()
        )));
    }
    let text = &text[..needed];
    if let Some(offset) = text.iter().position(|&c| !is_symbol(c)) {
        secure_zero(out);
        return Err(BcryptError::InvalidEncoding {
            symbol: char::from(text[offset]),
            offset,
        });
    }

    // The engine sizes its output by a whole-group estimate
    let mut scratch = Zeroizing::new(vec![0u8; ::base64::decoded_len_estimate(needed)]);
    match BCRYPT_ENGINE.decode_slice(text, &mut scratch[..]) {
        Ok(written) if written == out.len() => {
            out.copy_from_slice(&scratch[..written]);
            Ok(())
        }
        Ok(written) => {
            secure_zero(out);
            Err(BcryptError::invalid_argument(format!(
                "base64 text decoded to {written} bytes, expected {}",
                out.len()
            )))
        }
        Err(e) => {
            secure_zero(out);
            Err(decode_error(e))
        }
    }
}

fn decode_error(error: DecodeSliceError) -> BcryptError {
    match error {
        DecodeSliceError::DecodeError(
            DecodeError::InvalidByte(offset, symbol) | DecodeError::InvalidLastSymbol(offset, symbol),
        ) => BcryptError::InvalidEncoding {
            symbol: char::from(symbol),
            offset,
        },
        other => BcryptError::invalid_argument(format!("malformed base64 text: {other}")),
    }
}

/// Decode `expected_len` bytes from `text`
///
/// # Errors
///
/// Same as [`decode_into`].
pub fn decode(text: &str, expected_len: usize) -> Result<Vec<u8>> {
    let mut out = vec![0u8; expected_len];
    decode_into(text.as_bytes(), &mut out)?;
    Ok(out)
}
