//! Roadmap generation: prompt construction and the client for the external
//! text-generation endpoint.

pub mod client;
pub mod prompt;

pub use client::{GeminiClient, GenerationConfig, GenerationError, Generator};
pub use prompt::build_prompt;
