//! Block cipher collaborator
//!
//! The engine only sees the [`KeyExpansion`] trait; the cipher state itself is
//! opaque to it. The production implementation is RustCrypto's Blowfish with
//! the bcrypt extensions, which zeroes its P-array and S-boxes on drop.

pub use blowfish::Blowfish;

/// The cipher operations bcrypt needs
pub trait KeyExpansion: Sized {
    /// Fresh state: the initial P-array and S-boxes
    fn init_state() -> Self;

    /// Salted key expansion, run once before the round loop
    fn expand_with_salt(&mut self, salt: &[u8], key: &[u8]);

    /// Unsalted key expansion, run twice per round
    fn expand(&mut self, input: &[u8]);

    /// Encrypt one 64-bit block given as two big-endian words
    fn encrypt_pair(&self, pair: [u32; 2]) -> [u32; 2];
}

impl KeyExpansion for Blowfish {
    fn init_state() -> Self {
        Self::bc_init_state()
    }

    fn expand_with_salt(&mut self, salt: &[u8], key: &[u8]) {
        self.salted_expand_key(salt, key);
    }

    fn expand(&mut self, input: &[u8]) {
        self.bc_expand_key(input);
    }

    fn encrypt_pair(&self, pair: [u32; 2]) -> [u32; 2] {
        self.bc_encrypt(pair)
    }
}

/// Read the next big-endian word from `data`, wrapping to the start when the
/// cursor runs off the end.
#[must_use]
pub(crate) fn stream_to_word<const N: usize>(data: &[u8; N], cursor: &mut usize) -> u32 {
    const { assert!(N > 0, "stream_to_word needs a non-empty buffer") };
    let mut word = 0u32;
    for _ in 0..4 {
        if *cursor >= data.len() {
            *cursor = 0;
        }
        word = (word << 8) | u32::from(data[*cursor]);
        *cursor += 1;
    }
    word
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_to_word_is_big_endian() {
        let mut cursor = 0;
        assert_eq!(stream_to_word(b"Orph", &mut cursor), 0x4f72_7068);
        assert_eq!(cursor, 4);
    }

    #[test]
    fn stream_to_word_wraps() {
        let mut cursor = 0;
        let data = [0x01, 0x02, 0x03];
        assert_eq!(stream_to_word(&data, &mut cursor), 0x0102_0301);
        assert_eq!(stream_to_word(&data, &mut cursor), 0x0203_0102);
    }

    #[test]
    fn stream_to_word_cycles_single_byte() {
        let mut cursor = 7;
        assert_eq!(stream_to_word(&[0xab], &mut cursor), 0xabab_abab);
        assert_eq!(cursor, 4);
    }

    #[test]
    fn expansion_changes_state() {
        let fresh = Blowfish::init_state();
        let mut expanded = Blowfish::init_state();
        expanded.expand_with_salt(&[0u8; 16], b"abc\0");
        expanded.expand(b"abc\0");
        let block = [0x4f72_7068, 0x6561_6e42];
        assert_ne!(fresh.encrypt_pair(block), expanded.encrypt_pair(block));
    }
}
