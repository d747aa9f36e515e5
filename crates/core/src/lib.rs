//! Core types and shared functionality for cleanpage.
//!
//! This crate provides:
//! - The shared sanitized-content cache
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheEntry, CacheKey, ContentCache};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
