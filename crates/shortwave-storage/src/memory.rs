use async_trait::async_trait;
use jiff::Timestamp;
use parking_lot::RwLock;
use shortwave_core::error::{Result, StorageError};
use shortwave_core::repository::Repository;
use shortwave_core::shortcode::ShortCode;
use shortwave_core::{Context, UrlMapping};
use std::collections::HashMap;

#[derive(Debug, Default)]
struct State {
    by_code: HashMap<String, UrlMapping>,
    code_by_url: HashMap<String, ShortCode>,
    last_id: i64,
}

/// In-memory implementation of the repository contract.
///
/// A single reader/writer lock guards both maps and the id counter, so
/// `store` performs its uniqueness checks and the insert as one exclusive
/// critical section while reads stay concurrent. Instances are
/// self-contained and injected as dependencies, which keeps tests isolated
/// (fresh repository per test).
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    state: RwLock<State>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored mappings.
    pub fn len(&self) -> usize {
        self.state.read().by_code.len()
    }

    /// Returns `true` if no mappings are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn get(&self, ctx: &Context, code: &ShortCode) -> Result<Option<UrlMapping>> {
        ctx.ensure_active()?;

        let state = self.state.read();
        Ok(state.by_code.get(code.as_str()).cloned())
    }

    async fn find_by_original_url(
        &self,
        ctx: &Context,
        original_url: &str,
    ) -> Result<Option<ShortCode>> {
        ctx.ensure_active()?;

        let state = self.state.read();
        Ok(state.code_by_url.get(original_url).cloned())
    }

    async fn store(&self, ctx: &Context, code: &ShortCode, original_url: &str) -> Result<i64> {
        ctx.ensure_active()?;

        // Both uniqueness checks and the insert happen under one write
        // lock; two racing stores cannot interleave between check and
        // mutation.
        let mut state = self.state.write();

        if state.by_code.contains_key(code.as_str()) {
            return Err(StorageError::CodeConflict(code.clone()));
        }

        if let Some(existing) = state.code_by_url.get(original_url) {
            return Err(StorageError::OriginalUrlMapped {
                existing: existing.clone(),
            });
        }

        state.last_id += 1;
        let mapping = UrlMapping {
            id: state.last_id,
            short_code: code.clone(),
            original_url: original_url.to_owned(),
            created_at: Timestamp::now(),
        };

        state
            .code_by_url
            .insert(original_url.to_owned(), code.clone());
        state
            .by_code
            .insert(code.as_str().to_owned(), mapping);

        Ok(state.last_id)
    }

    async fn close(&self) {}
}
