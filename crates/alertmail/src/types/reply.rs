//! SMTP reply codes.

/// SMTP reply code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReplyCode(u16);

impl ReplyCode {
    /// Creates a new reply code.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns the three ASCII digits this code is written as on the wire.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // each operand is below 10
    pub const fn digits(self) -> [u8; 3] {
        [
            b'0' + (self.0 / 100 % 10) as u8,
            b'0' + (self.0 / 10 % 10) as u8,
            b'0' + (self.0 % 10) as u8,
        ]
    }

    /// Returns true if `code` is exactly the three digits of this code.
    ///
    /// `code` is the prefix taken from a reply; a missing prefix never
    /// matches.
    #[must_use]
    pub fn matches(self, code: Option<&[u8]>) -> bool {
        code == Some(&self.digits()[..])
    }
}

impl std::fmt::Display for ReplyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Codes the alert exchange waits for
impl ReplyCode {
    /// 220 Service ready
    pub const SERVICE_READY: Self = Self(220);
    /// 250 Requested mail action okay, completed
    pub const OK: Self = Self(250);
    /// 354 Start mail input
    pub const START_DATA: Self = Self(354);
}
