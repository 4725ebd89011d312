//! Type system utilities and aliases.
//!
//! - [`aliases`]: Type aliases for shared single-threaded state and the
//!   shared event bus handle.

pub mod aliases;

pub use aliases::*;
