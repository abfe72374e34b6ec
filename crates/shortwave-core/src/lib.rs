//! Core types and traits for the Shortwave URL shortener.
//!
//! This crate provides the shared data model, the repository contract
//! implemented by the storage backends, and the shortener service trait.

pub mod context;
pub mod error;
pub mod mapping;
pub mod repository;
pub mod shortcode;
pub mod shortener;

pub use context::Context;
pub use error::{ContextError, CoreError, ShortenerError, StorageError};
pub use mapping::UrlMapping;
pub use repository::Repository;
pub use shortcode::ShortCode;
pub use shortener::UrlShortener;
