//! Containerizer Core - Core data structures and trait definitions
//!
//! This module defines the analysis data model, the error type, configuration,
//! logging and the collaborator traits shared by every containerizer crate

pub mod async_utils;
pub mod config;
pub mod error;
pub mod logging;
pub mod traits;
pub mod types;

pub use async_utils::*;
pub use config::*;
pub use error::*;
pub use logging::*;
pub use traits::*;
pub use types::*;

// Re-export commonly used external types
pub use async_trait::async_trait;
pub use tokio;
pub use tracing;
