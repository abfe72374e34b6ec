use crate::context::Context;
use crate::error::ShortenerError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, ShortenerError>;

#[async_trait]
pub trait UrlShortener: Send + Sync + 'static {
    /// Shortens a URL and returns its short code.
    ///
    /// Shortening is idempotent: submitting an already-shortened URL
    /// returns the existing code instead of creating a new mapping.
    async fn shorten(&self, ctx: &Context, original_url: &str) -> Result<ShortCode>;

    /// Resolves a short code back to the original URL.
    /// Unknown codes fail with [`ShortenerError::NotFound`].
    async fn resolve(&self, ctx: &Context, code: &str) -> Result<String>;
}
