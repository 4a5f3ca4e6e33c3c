//! Server core
//!
//! Binds the listening socket and spawns a session task per accepted
//! connection.

pub mod core;

pub use core::Server;
