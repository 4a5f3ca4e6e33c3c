//! Chat line protocol
//!
//! Newline-delimited UTF-8 text, one message per line. Defines the literal
//! lines the server emits and a parser for them as a client sees them.

pub mod parser;
pub mod responses;

pub use parser::{ServerLine, parse_server_line};
pub use responses::{ACCEPTED, MESSAGE_PREFIX, NAME_REQUEST, chat_message};
