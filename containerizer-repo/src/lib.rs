//! Containerizer Repository - Repository analysis module
//!
//! Responsible for fetching repositories and turning a working copy into an `AnalysisResult`

pub mod analyzer;
pub mod contents;
pub mod fetcher;
pub mod filter;
pub mod languages;
pub mod manifest;
pub mod secrets;
pub mod tech_stack;
pub mod tree;
pub mod walker;

pub use analyzer::*;
pub use contents::*;
pub use fetcher::*;
pub use filter::*;
pub use manifest::*;
pub use secrets::*;
pub use tech_stack::*;
pub use tree::*;
pub use walker::*;
