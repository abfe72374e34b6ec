use async_trait::async_trait;
use shortwave_core::error::{ShortenerError, StorageError};
use shortwave_core::{Context, Repository, ShortCode, UrlShortener};
use shortwave_generator::Generator;
use std::sync::Arc;
use tracing::{debug, error};
use url::Url;

/// Maximum number of generation attempts before a shorten request fails
/// with [`ShortenerError::GenerationExhausted`].
pub const MAX_RETRIES: u32 = 3;

/// A concrete implementation of the [`UrlShortener`] trait.
///
/// Wraps a [`Repository`] and a [`Generator`] and owns the two policies
/// the storage layer does not:
/// - dedup: an already-shortened URL returns its existing code, both via
///   the upfront probe and when a concurrent shorten wins the race inside
///   the store transaction;
/// - collision retry: a taken candidate code is retried with a fresh one,
///   up to [`MAX_RETRIES`] attempts.
///
/// The service holds no mapping state itself, only transient candidates
/// during generation.
#[derive(Debug, Clone)]
pub struct ShortenerService<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    /// Creates a new `ShortenerService`.
    pub fn new(repository: R, generator: G) -> Self {
        Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
        }
    }

    /// Validates that the URL is syntactically well-formed.
    ///
    /// Anything the `url` crate can parse is accepted; semantic checks
    /// (reachability, allowed schemes) are not this service's concern.
    fn validate_url(raw: &str) -> Result<(), ShortenerError> {
        if raw.is_empty() {
            return Err(ShortenerError::InvalidUrl(
                "url cannot be empty".to_string(),
            ));
        }

        Url::parse(raw)
            .map(|_| ())
            .map_err(|e| ShortenerError::InvalidUrl(format!("'{raw}': {e}")))
    }
}

#[async_trait]
impl<R: Repository, G: Generator> UrlShortener for ShortenerService<R, G> {
    async fn shorten(&self, ctx: &Context, original_url: &str) -> Result<ShortCode, ShortenerError> {
        const OP: &str = "shortener.shorten";

        ctx.ensure_active()?;
        Self::validate_url(original_url)?;

        if let Some(existing) = self
            .repository
            .find_by_original_url(ctx, original_url)
            .await
            .map_err(|e| wrap_storage_error(OP, e))?
        {
            debug!(original_url, short_code = %existing, "url already shortened");
            return Ok(existing);
        }

        for attempt in 1..=MAX_RETRIES {
            let candidate = self.generator.generate();

            match self.repository.store(ctx, &candidate, original_url).await {
                Ok(id) => {
                    debug!(id, short_code = %candidate, "created mapping");
                    return Ok(candidate);
                }
                Err(StorageError::CodeConflict(_)) => {
                    debug!(attempt, "short code collision, retrying");
                }
                Err(StorageError::OriginalUrlMapped { existing }) => {
                    // A concurrent shorten of the same URL won the race
                    // since the pre-check; its code is our result.
                    debug!(original_url, short_code = %existing, "lost dedup race");
                    return Ok(existing);
                }
                Err(e) => return Err(wrap_storage_error(OP, e)),
            }
        }

        error!(
            attempts = MAX_RETRIES,
            "exhausted short code generation attempts"
        );
        Err(ShortenerError::GenerationExhausted {
            attempts: MAX_RETRIES,
        })
    }

    async fn resolve(&self, ctx: &Context, code: &str) -> Result<String, ShortenerError> {
        const OP: &str = "shortener.resolve";

        ctx.ensure_active()?;

        // A code that fails validation cannot have been issued.
        let Ok(code) = ShortCode::new(code) else {
            return Err(ShortenerError::NotFound(code.to_string()));
        };

        match self
            .repository
            .get(ctx, &code)
            .await
            .map_err(|e| wrap_storage_error(OP, e))?
        {
            Some(mapping) => Ok(mapping.original_url),
            None => Err(ShortenerError::NotFound(code.to_string())),
        }
    }
}

/// Tags unexpected storage failures with the operation that hit them.
/// Cancellation and deadline conditions propagate verbatim.
fn wrap_storage_error(op: &'static str, source: StorageError) -> ShortenerError {
    match source {
        StorageError::Cancelled => ShortenerError::Cancelled,
        StorageError::DeadlineExceeded => ShortenerError::DeadlineExceeded,
        source => ShortenerError::Storage { op, source },
    }
}
