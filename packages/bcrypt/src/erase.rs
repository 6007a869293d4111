//! Secret buffers and optimization-proof erasure
//!
//! Every buffer that holds password, salt, cipher state or ciphertext bytes is
//! either a [`SecretBytes`] or a type deriving `ZeroizeOnDrop`, so the bytes
//! are overwritten on every exit path: completion, early error return, and a
//! suspended job being dropped by its holder.

use crate::{BcryptError, Result};
use zeroize::{Zeroize, Zeroizing};

/// Heap buffer zeroed when dropped
pub type SecretBytes = Zeroizing<Vec<u8>>;

/// Overwrite `buf` with zeros.
///
/// Uses volatile writes followed by a compiler fence, so the stores survive
/// dead-store elimination even when `buf` is never read again.
pub fn secure_zero(buf: &mut [u8]) {
    buf.zeroize();
}

/// Allocate an empty secret buffer able to hold `len` bytes without
/// reallocating.
///
/// Callers must not push past `len`: a reallocation leaves an unzeroed copy.
///
/// # Errors
///
/// Returns `BcryptError::AllocationFailure` if the memory cannot be reserved.
pub fn secret_buffer(len: usize) -> Result<SecretBytes> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|e| BcryptError::AllocationFailure(format!("{len}-byte secret buffer: {e}")))?;
    Ok(Zeroizing::new(buf))
}
