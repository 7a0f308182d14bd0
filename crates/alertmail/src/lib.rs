//! # alertmail
//!
//! Non-blocking SMTP delivery of alert emails for monitoring processes.
//!
//! A monitoring loop must keep running while a notification goes out, so
//! each alert runs as its own task: connect, greet, one command per reply,
//! close. A failed alert is logged and dropped; nothing is retried or
//! queued.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use alertmail::{AlertConfig, ResourceContext, send_alert};
//!
//! # async fn example() -> alertmail::Result<()> {
//! let config = Arc::new(AlertConfig::load("/etc/alertmail.toml")?);
//!
//! let realserver = ResourceContext::from("10.0.0.1:80".parse::<std::net::SocketAddr>().unwrap());
//! send_alert(&config, Some(realserver), "DOWN", "HTTP check failed");
//! # Ok(())
//! # }
//! ```
//!
//! ## Exchange
//!
//! ```text
//! connect ── 220 ──→ HELO ── 250 ──→ MAIL FROM ── 250 ──→ RCPT TO (per recipient)
//!                                                              │ 250
//!           close ←── QUIT ←── 250 ── <message> ←── 354 ── DATA
//! ```
//!
//! Any other reply, a timeout or an I/O error closes the connection at once.
//!
//! ## Modules
//!
//! - [`alert`]: entry points
//! - [`buffer`]: bounded reply accumulation
//! - [`command`]: SMTP command builders and subject composition
//! - [`config`]: alert configuration
//! - [`connection`]: non-blocking connect and exchange driver
//! - [`recipients`]: recipient cursor
//! - [`session`]: protocol state machine
//! - [`types`]: addresses, reply codes, resource context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod alert;
pub mod buffer;
pub mod command;
pub mod config;
pub mod connection;
mod error;
pub mod recipients;
pub mod session;
pub mod types;

pub use alert::{AlertAttempt, send_alert};
pub use config::{AlertConfig, AlertConfigBuilder};
pub use error::{Error, Result};
pub use session::{Action, Session, Stage};
pub use types::{Address, ReplyCode, ResourceContext};
