//! Shared types for the ascension log visualizer.
//!
//! Kept dependency-light so that both the parsing engine and the worker
//! binary can depend on it without pulling in the engine's stack.

pub mod formatting;
mod settings;

pub use settings::ParserSettings;
