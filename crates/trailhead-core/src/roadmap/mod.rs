//! Roadmap display model: the text parser and the outline state built on
//! top of its output.

pub mod outline;
pub mod parser;

pub use outline::{OutlineState, SectionKind};
pub use parser::{ContentItem, ParsedSection, Resource, parse};
