//! Error types for alert delivery.

use std::io;
use std::time::Duration;

use crate::session::Stage;

/// Result type alias for alert operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Alert delivery error types.
///
/// Every variant except [`Error::InvalidAddress`] and [`Error::Config`] ends
/// the attempt it was raised in. Nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The socket could not be created.
    #[error("Failed to create socket: {0}")]
    SocketCreate(#[source] io::Error),

    /// The connection was refused or failed.
    #[error("Failed to connect: {0}")]
    Connect(#[source] io::Error),

    /// The connection did not complete in time.
    #[error("Connect timed out after {0:?}")]
    ConnectTimedOut(Duration),

    /// The server did not answer in time.
    #[error("Read timed out after {0:?}")]
    ReadTimedOut(Duration),

    /// The socket did not accept the command in time.
    #[error("Write timed out after {0:?}")]
    WriteTimedOut(Duration),

    /// Reading the server reply failed.
    #[error("Read failed: {0}")]
    ReadFailed(#[source] io::Error),

    /// Sending a command failed.
    #[error("Write failed: {0}")]
    WriteFailed(#[source] io::Error),

    /// The server reply did not carry the code expected for the stage.
    #[error("Unexpected response in {stage} stage: {response:?}")]
    UnexpectedResponse {
        /// Stage that was waiting for the reply.
        stage: Stage,
        /// Reply text as received, lossily decoded.
        response: String,
    },

    /// The server reply did not fit in the response buffer.
    #[error("Response exceeds buffer capacity of {capacity} bytes")]
    ResponseOverflow {
        /// Buffer capacity in bytes.
        capacity: usize,
    },

    /// The session reached a state with nothing to send.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Configuration could not be read or parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
