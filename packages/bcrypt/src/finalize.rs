//! Final encryption of the magic verifier string

use crate::base64;
use crate::cipher::{stream_to_word, Blowfish, KeyExpansion};
use crate::hash_result::BcryptHash;
use crate::params::HashParameters;
use crate::salt::Salt;
use tracing::debug;
use zeroize::Zeroizing;

/// Plaintext encrypted 64 times to produce the digest
pub const MAGIC: &[u8; 24] = b"OrpheanBeholderScryDoubt";

/// Ciphertext words
pub const CIPHERTEXT_WORDS: usize = 6;

/// Encryption passes over the ciphertext
pub const ENCRYPTION_PASSES: usize = 64;

/// Digest bytes that appear in the hash string; the last ciphertext byte is
/// dropped
pub const DIGEST_LEN: usize = 4 * CIPHERTEXT_WORDS - 1;

/// Expanded cipher state waiting for the final encryption
pub struct FinalizeInputs<C: KeyExpansion = Blowfish> {
    state: Box<C>,
    salt: Box<Salt>,
    params: HashParameters,
}

impl<C: KeyExpansion> FinalizeInputs<C> {
    pub(crate) fn new(state: Box<C>, salt: Box<Salt>, params: HashParameters) -> Self {
        Self {
            state,
            salt,
            params,
        }
    }

    /// Parameters the state was expanded under
    #[must_use]
    pub fn params(&self) -> HashParameters {
        self.params
    }

    /// Encrypt the magic string and format the 60-character hash.
    ///
    /// Consumes the state; it, the salt and every intermediate buffer are
    /// zeroed before this returns.
    #[must_use]
    pub fn finalize(self) -> BcryptHash {
        let mut words = Zeroizing::new([0u32; CIPHERTEXT_WORDS]);
        let mut cursor = 0;
        for word in words.iter_mut() {
            *word = stream_to_word(MAGIC, &mut cursor);
        }

        for _ in 0..ENCRYPTION_PASSES {
            for pair in words.chunks_exact_mut(2) {
                let [l, r] = self.state.encrypt_pair([pair[0], pair[1]]);
                pair[0] = l;
                pair[1] = r;
            }
        }

        let mut ciphertext = Zeroizing::new([0u8; 4 * CIPHERTEXT_WORDS]);
        for (bytes, &word) in ciphertext.chunks_exact_mut(4).zip(words.iter()) {
            bytes[0] = (word >> 24) as u8;
            bytes[1] = (word >> 16) as u8;
            bytes[2] = (word >> 8) as u8;
            bytes[3] = word as u8;
        }

        let mut encoded = String::with_capacity(BcryptHash::LEN);
        encoded.push_str(&format!(
            "$2{}${:02}$",
            self.params.minor(),
            self.params.log_rounds()
        ));
        base64::encode_into(&mut encoded, self.salt.as_bytes());
        base64::encode_into(&mut encoded, &ciphertext[..DIGEST_LEN]);

        debug!(log_rounds = self.params.log_rounds(), "bcrypt hash finalized");
        BcryptHash::from_parts(encoded, self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Minor;

    #[test]
    fn magic_words() {
        let mut cursor = 0;
        let words: Vec<u32> = (0..CIPHERTEXT_WORDS)
            .map(|_| stream_to_word(MAGIC, &mut cursor))
            .collect();
        assert_eq!(
            words,
            [0x4f72_7068, 0x6561_6e42, 0x6568_6f6c, 0x6465_7253, 0x6372_7944, 0x6f75_6274]
        );
    }

    #[test]
    fn output_layout() {
        let params = HashParameters::new(Minor::A, 5).expect("valid");
        let hash = FinalizeInputs::new(
            Box::new(Blowfish::init_state()),
            Box::new(Salt::new([0u8; 16])),
            params,
        )
        .finalize();
        let text = hash.as_str();
        assert_eq!(text.len(), BcryptHash::LEN);
        assert!(text.starts_with("$2a$05$......................"));
        assert!(text[29..].bytes().all(base64::is_symbol));
    }
}
