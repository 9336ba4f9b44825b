//! Containerizer Pipeline - request orchestration
//!
//! Sequences acquisition, analysis, README generation and artifact writing
//! for one repository, and shapes the result for the request boundary.

pub mod orchestrator;
pub mod report;

pub use orchestrator::*;
pub use report::*;
