//! Stages of one alert exchange.

use std::fmt;

use crate::types::ReplyCode;

/// Position in the SMTP command/response sequence.
///
/// Stages only move forward. A reply that does not carry the expected code
/// moves any stage to [`Stage::Error`]. `Quit` and `Error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Waiting for the server greeting.
    Connecting,
    /// `HELO` sent or about to be.
    Helo,
    /// `MAIL FROM` sent or about to be.
    Mail,
    /// One `RCPT TO` per recipient.
    Rcpt,
    /// `DATA` sent or about to be.
    Data,
    /// Subject, body and terminating dot.
    Body,
    /// Alert accepted; `QUIT` and close.
    Quit,
    /// Attempt failed; close without further writes.
    Error,
}

impl Stage {
    /// Every stage, in protocol order.
    pub const ALL: [Self; 8] = [
        Self::Connecting,
        Self::Helo,
        Self::Mail,
        Self::Rcpt,
        Self::Data,
        Self::Body,
        Self::Quit,
        Self::Error,
    ];

    /// Returns the reply code that lets this stage advance.
    ///
    /// Terminal stages expect nothing.
    #[must_use]
    pub const fn expected_reply(self) -> Option<ReplyCode> {
        match self {
            Self::Connecting => Some(ReplyCode::SERVICE_READY),
            Self::Helo | Self::Mail | Self::Rcpt | Self::Body => Some(ReplyCode::OK),
            Self::Data => Some(ReplyCode::START_DATA),
            Self::Quit | Self::Error => None,
        }
    }

    /// Returns the stage entered when the expected reply arrives.
    ///
    /// For `Rcpt` this is the stage after the last recipient; the session
    /// stays in `Rcpt` while recipients remain.
    #[must_use]
    pub const fn on_match(self) -> Self {
        match self {
            Self::Connecting => Self::Helo,
            Self::Helo => Self::Mail,
            Self::Mail => Self::Rcpt,
            Self::Rcpt => Self::Data,
            Self::Data => Self::Body,
            Self::Body | Self::Quit => Self::Quit,
            Self::Error => Self::Error,
        }
    }

    /// Returns true for `Quit` and `Error`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Quit | Self::Error)
    }

    /// Returns the stage name used in logs and errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connecting => "CONNECT",
            Self::Helo => "HELO",
            Self::Mail => "MAIL",
            Self::Rcpt => "RCPT",
            Self::Data => "DATA",
            Self::Body => "BODY",
            Self::Quit => "QUIT",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
