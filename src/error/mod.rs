//! Error handling
//!
//! Defines startup error types for the chat relay.

pub mod types;

pub use types::*;
