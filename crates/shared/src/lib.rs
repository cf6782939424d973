//! Shared configuration and error types for xrate.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Configuration management (server and rate feed settings)

pub mod config;
pub mod error;

pub use config::{AppConfig, FeedConfig, ServerConfig, SourceConfig};
pub use error::{AppError, AppResult};
