//! SMTP command builder.
//!
//! Every parameter is bounded before it reaches a command, so a rendered
//! single-line command never exceeds [`MAX_COMMAND_LENGTH`] and the message
//! block stays within a fixed size as well.

mod text;

pub use text::{compose_subject, single_line, truncate};

use crate::types::Address;

/// Longest single-line command rendered, CRLF included (RFC 5321 4.5.3.1.4).
pub const MAX_COMMAND_LENGTH: usize = 512;

/// Longest local host name sent with `HELO`.
pub const MAX_HOSTNAME_LENGTH: usize = 255;

/// Longest subject, after composition.
pub const MAX_SUBJECT_LENGTH: usize = 256;

/// Longest body, before line normalisation.
pub const MAX_BODY_LENGTH: usize = 1024;

/// SMTP command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// HELO - Simple greeting
    Helo {
        /// Client hostname
        hostname: String,
    },
    /// MAIL FROM - Start mail transaction
    MailFrom {
        /// Sender address
        from: Address,
    },
    /// RCPT TO - Add recipient
    RcptTo {
        /// Recipient address
        to: Address,
    },
    /// DATA - Begin message data
    Data,
    /// Message content sent after a 354 reply, terminated by a lone dot.
    Message {
        /// Subject header value
        subject: String,
        /// Plain text body
        body: String,
    },
    /// QUIT - Close connection
    Quit,
}

impl Command {
    /// Builds a `HELO` command, bounding the host name.
    #[must_use]
    pub fn helo(hostname: &str) -> Self {
        Self::Helo {
            hostname: truncate(&single_line(hostname), MAX_HOSTNAME_LENGTH).to_string(),
        }
    }

    /// Builds the message block, bounding subject and body.
    #[must_use]
    pub fn message(subject: &str, body: &str) -> Self {
        Self::Message {
            subject: truncate(&single_line(subject), MAX_SUBJECT_LENGTH).to_string(),
            body: truncate(body, MAX_BODY_LENGTH).to_string(),
        }
    }

    /// Returns the command verb, for logging.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Helo { .. } => "HELO",
            Self::MailFrom { .. } => "MAIL FROM",
            Self::RcptTo { .. } => "RCPT TO",
            Self::Data => "DATA",
            Self::Message { .. } => "<message>",
            Self::Quit => "QUIT",
        }
    }

    /// Serializes the command to bytes.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();

        match self {
            Self::Helo { hostname } => {
                buf.extend_from_slice(b"HELO ");
                buf.extend_from_slice(hostname.as_bytes());
            }
            Self::MailFrom { from } => {
                buf.extend_from_slice(b"MAIL FROM:<");
                buf.extend_from_slice(from.as_str().as_bytes());
                buf.push(b'>');
            }
            Self::RcptTo { to } => {
                buf.extend_from_slice(b"RCPT TO:<");
                buf.extend_from_slice(to.as_str().as_bytes());
                buf.push(b'>');
            }
            Self::Data => {
                buf.extend_from_slice(b"DATA");
            }
            Self::Message { subject, body } => {
                buf.extend_from_slice(b"Subject: ");
                buf.extend_from_slice(subject.as_bytes());
                buf.extend_from_slice(b"\r\n\r\n");
                write_body(&mut buf, body.as_bytes());
                buf.push(b'.');
            }
            Self::Quit => {
                buf.extend_from_slice(b"QUIT");
            }
        }

        buf.extend_from_slice(b"\r\n");
        buf
    }
}

/// Writes `body` with CRLF line endings and leading dots doubled.
fn write_body(buf: &mut Vec<u8>, body: &[u8]) {
    let body = body.strip_suffix(b"\n").unwrap_or(body);
    if body.is_empty() {
        return;
    }

    for line in body.split(|&b| b == b'\n') {
        let line = line.strip_suffix(b"\r").unwrap_or(line);

        if line.first() == Some(&b'.') {
            buf.push(b'.');
        }

        buf.extend_from_slice(line);
        buf.extend_from_slice(b"\r\n");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;
    use crate::types::MAX_ADDRESS_LENGTH;

    #[test]
    fn test_helo_command() {
        let cmd = Command::helo("lb1.example.com");
        assert_eq!(cmd.serialize(), b"HELO lb1.example.com\r\n");
    }

    #[test]
    fn test_helo_hostname_is_bounded() {
        let cmd = Command::helo(&"h".repeat(1000));
        let line = cmd.serialize();
        assert_eq!(line.len(), "HELO ".len() + MAX_HOSTNAME_LENGTH + 2);
        assert!(line.len() <= MAX_COMMAND_LENGTH);
    }

    #[test]
    fn test_mail_from_command() {
        let cmd = Command::MailFrom {
            from: Address::new("keepalive@example.com").unwrap(),
        };
        assert_eq!(cmd.serialize(), b"MAIL FROM:<keepalive@example.com>\r\n");
    }

    #[test]
    fn test_rcpt_to_command() {
        let cmd = Command::RcptTo {
            to: Address::new("ops@example.com").unwrap(),
        };
        assert_eq!(cmd.serialize(), b"RCPT TO:<ops@example.com>\r\n");
    }

    #[test]
    fn test_longest_address_fits_command_line() {
        let local = "a".repeat(MAX_ADDRESS_LENGTH - "@x.org".len());
        let addr = Address::new(format!("{local}@x.org")).unwrap();
        let line = Command::RcptTo { to: addr }.serialize();
        assert!(line.len() <= MAX_COMMAND_LENGTH);
    }

    #[test]
    fn test_data_and_quit_commands() {
        assert_eq!(Command::Data.serialize(), b"DATA\r\n");
        assert_eq!(Command::Quit.serialize(), b"QUIT\r\n");
    }

    #[test]
    fn test_message_block() {
        let cmd = Command::message("[LB1] down", "Realserver 10.0.0.1:80 is down");
        assert_eq!(
            cmd.serialize(),
            b"Subject: [LB1] down\r\n\r\nRealserver 10.0.0.1:80 is down\r\n.\r\n"
        );
    }

    #[test]
    fn test_message_normalises_line_endings() {
        let cmd = Command::message("s", "one\ntwo\r\nthree\n");
        assert_eq!(
            cmd.serialize(),
            b"Subject: s\r\n\r\none\r\ntwo\r\nthree\r\n.\r\n"
        );
    }

    #[test]
    fn test_message_dot_stuffing() {
        let cmd = Command::message("s", ".\n..hidden\nok");
        assert_eq!(
            cmd.serialize(),
            b"Subject: s\r\n\r\n..\r\n...hidden\r\nok\r\n.\r\n"
        );
    }

    #[test]
    fn test_message_empty_body() {
        let cmd = Command::message("s", "");
        assert_eq!(cmd.serialize(), b"Subject: s\r\n\r\n.\r\n");
    }

    #[test]
    fn test_message_subject_cannot_inject_headers() {
        let cmd = Command::message("down\r\nBcc: evil@example.com", "b");
        let Command::Message { subject, .. } = &cmd else {
            panic!("expected message");
        };
        assert_eq!(subject, "down  Bcc: evil@example.com");
    }

    #[test]
    fn test_message_body_is_truncated() {
        let body = "x".repeat(MAX_BODY_LENGTH + 100);
        let Command::Message { body, .. } = Command::message("s", &body) else {
            panic!("expected message");
        };
        assert_eq!(body.len(), MAX_BODY_LENGTH);
    }

    #[test]
    fn test_verbs() {
        assert_eq!(Command::Data.verb(), "DATA");
        assert_eq!(Command::helo("h").verb(), "HELO");
        assert_eq!(Command::message("s", "b").verb(), "<message>");
    }
}
