use crate::Generator;
use shortwave_core::shortcode::CODE_LENGTH;
use shortwave_core::ShortCode;
use std::sync::atomic::{AtomicU64, Ordering};

/// A deterministic short code generator using a sequential counter.
///
/// Produces codes like "sw00000000", "sw00000001": the prefix followed by
/// a zero-padded counter, padded to the full code length. Collision free
/// within a single instance, which makes service behavior reproducible in
/// tests without depending on randomness.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
    prefix: String,
}

impl SeqGenerator {
    /// Creates a new sequential generator with the given prefix.
    ///
    /// The prefix must leave room for at least one counter digit.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        assert!(
            prefix.len() < CODE_LENGTH,
            "prefix must be shorter than the code length"
        );
        Self {
            counter: AtomicU64::new(0),
            prefix,
        }
    }

    /// Creates a sequential generator starting from a specific counter
    /// value, for distributing counter ranges across instances.
    pub fn with_offset(prefix: impl Into<String>, offset: u64) -> Self {
        let generator = Self::with_prefix(prefix);
        generator.counter.store(offset, Ordering::SeqCst);
        generator
    }
}

impl Clone for SeqGenerator {
    fn clone(&self) -> Self {
        Self {
            counter: AtomicU64::new(self.counter.load(Ordering::SeqCst)),
            prefix: self.prefix.clone(),
        }
    }
}

impl Generator for SeqGenerator {
    fn generate(&self) -> ShortCode {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        let width = CODE_LENGTH - self.prefix.len();
        ShortCode::new_unchecked(format!("{}{:0width$}", self.prefix, count))
    }
}
