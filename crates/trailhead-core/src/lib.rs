//! Core logic for trailhead: roadmap parsing, prompt construction, the
//! generation client, and the session boundary.
//!
//! This crate has no database dependency. Everything here is either pure
//! (the parser, outline state, prompt templates) or talks to exactly one
//! external collaborator (the generation endpoint, the identity provider).

pub mod generate;
pub mod roadmap;
pub mod session;
