//! Server line parsing
//!
//! Classifies a line received from the server the way the GUI client does:
//! exact matches for the handshake lines, a fixed-length prefix check for
//! relayed chat. Used by client implementations and the integration tests.

use crate::protocol::responses::{ACCEPTED, MESSAGE_PREFIX, NAME_REQUEST};

/// A line received from the server, as a client sees it
#[derive(Debug, PartialEq, Eq)]
pub enum ServerLine<'a> {
    /// `USERNAME` - the server wants a display name
    NameRequest,
    /// `ACCEPTED` - the handshake is complete
    Accepted,
    /// `MESSAGE <name>: <text>` - carries everything after the prefix
    Chat(&'a str),
    /// Anything else; the protocol never produces this
    Other(&'a str),
}

/// Parse one server-emitted line
pub fn parse_server_line(line: &str) -> ServerLine<'_> {
    if line == NAME_REQUEST {
        ServerLine::NameRequest
    } else if line == ACCEPTED {
        ServerLine::Accepted
    } else if let Some(rest) = line.strip_prefix(MESSAGE_PREFIX) {
        ServerLine::Chat(rest)
    } else {
        ServerLine::Other(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_handshake_lines() {
        assert_eq!(parse_server_line("USERNAME"), ServerLine::NameRequest);
        assert_eq!(parse_server_line("ACCEPTED"), ServerLine::Accepted);
    }

    #[test]
    fn chat_carries_everything_after_the_prefix() {
        assert_eq!(
            parse_server_line("MESSAGE alice: hello"),
            ServerLine::Chat("alice: hello")
        );
    }

    #[test]
    fn nested_tag_is_not_special() {
        // Only the fixed-length prefix is parsed; the body stays raw
        assert_eq!(
            parse_server_line("MESSAGE alice: MESSAGE bob: hi"),
            ServerLine::Chat("alice: MESSAGE bob: hi")
        );
    }

    #[test]
    fn unknown_lines_fall_through() {
        assert_eq!(parse_server_line("PING"), ServerLine::Other("PING"));
        // Prefix match is exact, including case
        assert_eq!(
            parse_server_line("message alice: hi"),
            ServerLine::Other("message alice: hi")
        );
    }
}
