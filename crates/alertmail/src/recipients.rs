//! Ordered walk over the configured recipients.

use std::sync::Arc;

use crate::types::Address;

/// Position in the shared recipient list.
///
/// The list itself is shared read-only between all in-flight attempts; each
/// attempt walks it with its own index, one step per acknowledged `RCPT TO`.
#[derive(Debug, Clone)]
pub struct RecipientCursor {
    recipients: Arc<[Address]>,
    index: usize,
}

impl RecipientCursor {
    /// Creates a cursor positioned on the first recipient.
    #[must_use]
    pub const fn new(recipients: Arc<[Address]>) -> Self {
        Self {
            recipients,
            index: 0,
        }
    }

    /// Returns the recipient under the cursor, or `None` once exhausted.
    #[must_use]
    pub fn current(&self) -> Option<&Address> {
        self.recipients.get(self.index)
    }

    /// Moves to the next recipient.
    ///
    /// Returns true if a recipient remains under the cursor. The index stops
    /// at the list length.
    pub fn advance(&mut self) -> bool {
        if self.index < self.recipients.len() {
            self.index += 1;
        }
        self.index < self.recipients.len()
    }

    /// Returns the number of recipients already passed.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the total number of recipients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recipients.len()
    }

    /// Returns true if there are no recipients at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }
}
