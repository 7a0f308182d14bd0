//! Protocol state machine for one alert.
//!
//! The session performs no I/O. The connection driver asks it for the next
//! [`Action`], performs it on the socket, and feeds each complete reply back
//! through [`Session::receive`]. Commands and replies alternate strictly:
//!
//! ```text
//! greeting -> HELO -> MAIL FROM -> RCPT TO (x N) -> DATA -> message -> QUIT
//! ```

mod stage;

pub use stage::Stage;

use std::sync::Arc;

use tracing::{debug, info};

use crate::buffer::ResponseBuffer;
use crate::command::{Command, MAX_BODY_LENGTH, MAX_SUBJECT_LENGTH, single_line, truncate};
use crate::error::{Error, Result};
use crate::recipients::RecipientCursor;
use crate::types::Address;

/// What the driver must do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Write this command, then wait for its reply.
    Send(Command),
    /// Read one complete reply and pass it to [`Session::receive`].
    Receive,
    /// Close the connection; the session is finished.
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Send,
    Receive,
    Done,
}

/// State of one alert exchange.
#[derive(Debug)]
pub struct Session {
    stage: Stage,
    phase: Phase,
    local_name: String,
    sender: Address,
    recipients: RecipientCursor,
    subject: String,
    body: String,
}

impl Session {
    /// Creates a session waiting for the server greeting.
    ///
    /// Subject and body are bounded here. Returns `None` if there are no
    /// recipients, since there would be nothing to deliver.
    #[must_use]
    pub fn new(
        local_name: impl Into<String>,
        sender: Address,
        recipients: Arc<[Address]>,
        subject: &str,
        body: &str,
    ) -> Option<Self> {
        if recipients.is_empty() {
            return None;
        }

        Some(Self {
            stage: Stage::Connecting,
            phase: Phase::Receive,
            local_name: local_name.into(),
            sender,
            recipients: RecipientCursor::new(recipients),
            subject: truncate(&single_line(subject), MAX_SUBJECT_LENGTH).to_string(),
            body: truncate(body, MAX_BODY_LENGTH).to_string(),
        })
    }

    /// Returns the current stage.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Returns the bounded subject.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the recipient cursor.
    #[must_use]
    pub const fn recipients(&self) -> &RecipientCursor {
        &self.recipients
    }

    /// Returns true once the relay has accepted the message.
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        self.stage == Stage::Quit
    }

    /// Returns true once nothing but closing the connection remains.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.stage == Stage::Error || self.phase == Phase::Done
    }

    /// Returns the next step of the exchange.
    ///
    /// After a [`Action::Send`] the next action is always
    /// [`Action::Receive`]. Once the session is in [`Stage::Error`] this only
    /// ever returns [`Action::Close`].
    pub fn next_action(&mut self) -> Action {
        if self.is_finished() {
            return Action::Close;
        }

        match self.phase {
            Phase::Receive => Action::Receive,
            Phase::Send => match self.command() {
                Some(cmd) => {
                    self.phase = Phase::Receive;
                    Action::Send(cmd)
                }
                None => {
                    self.stage = Stage::Error;
                    Action::Close
                }
            },
            Phase::Done => Action::Close,
        }
    }

    /// Handles one complete reply.
    ///
    /// Only the [code prefix](ResponseBuffer::code_prefix) is classified. A match advances the
    /// stage; the `RCPT` stage is repeated once per recipient. The reply to
    /// `QUIT` is never classified.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedResponse`] if the reply code is not the
    /// one the stage waits for. The session is then in [`Stage::Error`].
    pub fn receive(&mut self, reply: &ResponseBuffer) -> Result<()> {
        if self.phase != Phase::Receive || self.stage == Stage::Error {
            return Ok(());
        }

        let Some(expected) = self.stage.expected_reply() else {
            debug!(reply = %reply.text(), "QUIT acknowledged");
            self.phase = Phase::Done;
            return Ok(());
        };

        if !expected.matches(reply.code_prefix()) {
            let stage = self.stage;
            self.stage = Stage::Error;
            return Err(Error::UnexpectedResponse {
                stage,
                response: reply.text(),
            });
        }

        self.phase = Phase::Send;
        if self.stage == Stage::Rcpt && self.recipients.advance() {
            debug!(index = self.recipients.index(), "recipient accepted");
            return Ok(());
        }

        let next = self.stage.on_match();
        debug!(from = %self.stage, to = %next, "stage complete");
        if self.stage == Stage::Body {
            info!(subject = %self.subject, "SMTP alert successfully sent");
        }
        self.stage = next;
        Ok(())
    }

    /// Abandons the exchange after an I/O failure or timeout.
    pub fn fail(&mut self) {
        self.stage = Stage::Error;
    }

    fn command(&self) -> Option<Command> {
        match self.stage {
            Stage::Connecting | Stage::Error => None,
            Stage::Helo => Some(Command::helo(&self.local_name)),
            Stage::Mail => Some(Command::MailFrom {
                from: self.sender.clone(),
            }),
            Stage::Rcpt => self
                .recipients
                .current()
                .map(|to| Command::RcptTo { to: to.clone() }),
            Stage::Data => Some(Command::Data),
            Stage::Body => Some(Command::message(&self.subject, &self.body)),
            Stage::Quit => Some(Command::Quit),
        }
    }
}
