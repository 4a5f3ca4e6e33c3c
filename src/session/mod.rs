//! Client session management
//!
//! Runs one connection per task: name handshake, relay loop, the writer
//! task draining the client's outbound queue, and exactly-once teardown.

pub mod handler;
pub mod state;

pub use handler::handle_session;
pub use state::Session;
