//! Generic utility primitives with zero domain knowledge.
//!
//! - `io` - File I/O with consistent error handling

pub mod io;
