use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A stored association between a short code and an original URL.
///
/// Mappings are immutable once created: `id` is assigned by the storage
/// backend exactly once and `created_at` never changes. There is no
/// update or delete operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlMapping {
    /// Storage-assigned identifier, monotonically increasing.
    pub id: i64,
    /// The unique short code.
    pub short_code: ShortCode,
    /// The original URL that was shortened, unique across all mappings.
    pub original_url: String,
    /// When the mapping was created.
    pub created_at: Timestamp,
}
