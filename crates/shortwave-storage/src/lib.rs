//! Storage backends for the Shortwave URL shortener.
//!
//! Two interchangeable implementations of the repository contract: an
//! in-memory backend for tests and single-process deployments, and a
//! PostgreSQL backend for persistence.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryRepository;
pub use postgres::PostgresRepository;
pub use shortwave_core::{Repository, StorageError};
