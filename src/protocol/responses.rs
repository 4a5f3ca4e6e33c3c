//! Server-emitted protocol lines
//!
//! The three line shapes the server ever sends. Clients recognize relayed
//! chat by the fixed-length `MESSAGE ` prefix; everything after it passes
//! through verbatim, with no escaping.

/// Request for a display name, repeated until an unclaimed name arrives
pub const NAME_REQUEST: &str = "USERNAME";

/// Handshake completion acknowledgment
pub const ACCEPTED: &str = "ACCEPTED";

/// Prefix tagging a relayed chat line
pub const MESSAGE_PREFIX: &str = "MESSAGE ";

/// Format a relayed chat line: `MESSAGE <name>: <text>`
pub fn chat_message(name: &str, text: &str) -> String {
    format!("{}{}: {}", MESSAGE_PREFIX, name, text)
}
