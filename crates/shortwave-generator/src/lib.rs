//! Short code generation for the Shortwave URL shortener.

pub mod seq;

use rand::rngs::OsRng;
use rand::Rng;
use shortwave_core::shortcode::{ALPHABET, CODE_LENGTH};
use shortwave_core::ShortCode;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage;
/// collision handling against stored codes belongs to the caller.
pub trait Generator: Send + Sync + 'static {
    /// Produces a fresh candidate short code.
    fn generate(&self) -> ShortCode;
}

/// Generates codes by sampling each character independently and uniformly
/// from the alphabet using the operating system CSPRNG.
///
/// Codes must be unguessable, not just collision resistant: a predictable
/// sequence would let an attacker enumerate every shortened URL.
///
/// Stateless; every call produces an independent value.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomGenerator;

impl RandomGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Generator for RandomGenerator {
    fn generate(&self) -> ShortCode {
        // `Generator` is intentionally infallible. OsRng failures mean the
        // OS randomness source is exhausted, which is unrecoverable.
        let mut rng = OsRng;
        let code: String = (0..CODE_LENGTH)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        ShortCode::new_unchecked(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_have_fixed_length() {
        let generator = RandomGenerator::new();
        for _ in 0..100 {
            assert_eq!(generator.generate().as_str().len(), CODE_LENGTH);
        }
    }

    #[test]
    fn codes_stay_within_alphabet() {
        let generator = RandomGenerator::new();
        for _ in 0..100 {
            let code = generator.generate();
            assert!(
                code.as_str().bytes().all(|b| ALPHABET.contains(&b)),
                "unexpected character in '{}'",
                code
            );
        }
    }

    #[test]
    fn codes_pass_validation() {
        let generator = RandomGenerator::new();
        let code = generator.generate();
        assert!(ShortCode::new(code.as_str()).is_ok());
    }

    #[test]
    fn consecutive_codes_differ() {
        // 63^10 possible codes; a repeat here means the sampling is broken.
        let generator = RandomGenerator::new();
        let first = generator.generate();
        let second = generator.generate();
        assert_ne!(first, second);
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RandomGenerator>();
    }
}
