//! Containerizer Docs - README prompt assembly and artifact generation
//!
//! Turns an `AnalysisResult` into the README prompt and writes the README,
//! Dockerfile and .dockerignore into the analyzed tree when it is safe to.

pub mod prompts;
pub mod templates;
pub mod writer;

pub use prompts::*;
pub use templates::*;
pub use writer::*;
