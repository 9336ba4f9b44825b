//! Containerizer LLM - text generation through the siumai provider framework

pub mod client;

pub use client::*;
