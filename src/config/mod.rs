//! Configuration module
//!
//! Parses `.env`-style layer files, merges them by precedence and coerces
//! stored strings into typed values.

pub mod coerce;
pub mod loader;
pub mod parser;
pub mod types;

pub use loader::{load_layers, merge, resolve_hint};
pub use parser::parse_str;
pub use types::*;
