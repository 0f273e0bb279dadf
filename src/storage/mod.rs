//! # Storage Layer
//!
//! Persistence layer for Chronica with plain-text file formats.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Documents | JSON (PascalCase keys) | `<anywhere>.jsonlo` |
//! | Config | TOML | `~/.config/chronica/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - [`DocumentStore`] takes an exclusive `fs2` lock while writing
//! - All writes are atomic (temp file + rename)
//!
//! ## Key Types
//!
//! - [`codec`] - Pure serialize/deserialize for the document format
//! - [`DocumentStore`] - Read/write one document file
//! - [`Config`] - User configuration

pub mod codec;
mod config;
mod store;

pub use codec::CodecError;
pub use config::{Config, ConfigError};
pub use store::DocumentStore;
