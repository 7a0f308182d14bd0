//! Bounded text helpers for command parameters.

use std::net::SocketAddr;

use super::MAX_SUBJECT_LENGTH;
use crate::types::ResourceContext;

/// Returns the longest prefix of `s` that fits in `max` bytes without
/// splitting a character.
#[must_use]
pub fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Replaces CR and LF with spaces so the text stays on one line.
///
/// The byte length is unchanged.
#[must_use]
pub fn single_line(s: &str) -> String {
    s.replace(['\r', '\n'], " ")
}

/// Builds the alert subject.
///
/// With a resource context the subject reads
/// `[<id>] <address>:<port> - <subject>`, otherwise `[<id>] <subject>`. The
/// result is a single line of at most [`MAX_SUBJECT_LENGTH`] bytes.
#[must_use]
pub fn compose_subject(id: &str, context: Option<&ResourceContext>, subject: &str) -> String {
    let composed = match context {
        Some(ctx) => format!("[{id}] {} - {subject}", SocketAddr::new(ctx.addr, ctx.port)),
        None => format!("[{id}] {subject}"),
    };
    truncate(&single_line(&composed), MAX_SUBJECT_LENGTH).to_string()
}
