use crate::context::Context;
use crate::error::Result;
use crate::mapping::UrlMapping;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// Storage contract for URL mappings.
///
/// Implementations own all mapping state and must uphold both uniqueness
/// invariants atomically: [`Repository::store`] either creates the mapping
/// or reports exactly why it could not, even under concurrent calls.
#[async_trait]
pub trait Repository: Send + Sync + 'static {
    /// Retrieves the mapping for a short code.
    /// Returns `None` if the code does not exist.
    async fn get(&self, ctx: &Context, code: &ShortCode) -> Result<Option<UrlMapping>>;

    /// Looks up the short code a URL is already mapped under, if any.
    ///
    /// This is the dedup probe: absence is not an error.
    async fn find_by_original_url(
        &self,
        ctx: &Context,
        original_url: &str,
    ) -> Result<Option<ShortCode>>;

    /// Atomically stores a new mapping and returns its assigned id.
    ///
    /// Fails with [`StorageError::CodeConflict`] when another mapping
    /// already holds `code`, and with [`StorageError::OriginalUrlMapped`]
    /// when `original_url` is already mapped under a different code.
    ///
    /// [`StorageError::CodeConflict`]: crate::error::StorageError::CodeConflict
    /// [`StorageError::OriginalUrlMapped`]: crate::error::StorageError::OriginalUrlMapped
    async fn store(&self, ctx: &Context, code: &ShortCode, original_url: &str) -> Result<i64>;

    /// Releases underlying connections and resources. Idempotent.
    async fn close(&self);
}
