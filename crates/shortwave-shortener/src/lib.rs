//! URL shortening service implementation.
//!
//! This crate provides the orchestration layer over a repository and a
//! code generator: the dedup-by-original-URL policy and the bounded
//! retry-on-collision loop. Core types are re-exported from
//! `shortwave_core`.

pub mod service;

pub use service::ShortenerService;
pub use shortwave_core::{ShortenerError, UrlShortener};
