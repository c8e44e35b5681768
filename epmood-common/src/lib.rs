//! # epmood Common Library
//!
//! Shared code for the epmood workspace:
//! - Error types
//! - Configuration loading and validation
//! - URL template expansion

pub mod config;
pub mod error;

pub use config::{ServiceConfig, SpotifyCredentials};
pub use error::{Error, Result};
