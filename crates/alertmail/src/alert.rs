//! Alert entry points.
//!
//! [`send_alert`] is what a monitoring loop calls: it returns at once and
//! the outcome only ever reaches the log. [`AlertAttempt::deliver`] is the
//! same work in awaitable form.

use std::sync::Arc;

use tracing::{Instrument, debug, info_span, warn};

use crate::command::compose_subject;
use crate::config::AlertConfig;
use crate::connection::{connect, exchange};
use crate::error::Result;
use crate::session::Session;
use crate::types::ResourceContext;

/// One alert delivery: a session plus the settings it runs with.
///
/// The socket exists only inside [`AlertAttempt::deliver`] and is closed
/// when delivery returns, whatever the outcome.
#[derive(Debug)]
pub struct AlertAttempt {
    config: Arc<AlertConfig>,
    session: Session,
}

impl AlertAttempt {
    /// Prepares an alert.
    ///
    /// Returns `None` if no recipients are configured; no socket is ever
    /// opened in that case.
    #[must_use]
    pub fn new(
        config: Arc<AlertConfig>,
        context: Option<ResourceContext>,
        subject: &str,
        body: &str,
    ) -> Option<Self> {
        let subject = compose_subject(&config.id, context.as_ref(), subject);
        let session = Session::new(
            config.local_name(),
            config.sender.clone(),
            Arc::clone(&config.recipients),
            &subject,
            body,
        )?;
        Some(Self { config, session })
    }

    /// Returns the session driving this attempt.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Connects to the relay and runs the exchange to its end.
    ///
    /// Acceptance by the relay is logged at info level, failure at warn.
    ///
    /// # Errors
    ///
    /// Returns the error that ended the attempt. Nothing is retried.
    pub async fn deliver(mut self) -> Result<()> {
        let server = self.config.server;
        let limit = self.config.timeout;
        let span = info_span!("smtp_alert", %server);

        async move {
            let result = match connect(server, limit).await {
                Ok(mut stream) => exchange(&mut self.session, &mut stream, limit).await,
                Err(e) => Err(e),
            };

            match &result {
                Ok(()) => debug!(subject = %self.session.subject(), "SMTP alert session closed"),
                Err(e) => warn!(error = %e, stage = %self.session.stage(), "SMTP alert not sent"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

/// Sends an alert in the background.
///
/// Spawns the attempt on the current tokio runtime and returns immediately.
/// Nothing is spawned when no recipients are configured. Success or failure
/// is only logged.
///
/// # Panics
///
/// Panics if called outside a tokio runtime.
pub fn send_alert(
    config: &Arc<AlertConfig>,
    context: Option<ResourceContext>,
    subject: &str,
    body: &str,
) {
    let Some(attempt) = AlertAttempt::new(Arc::clone(config), context, subject, body) else {
        debug!("no recipients configured, alert dropped");
        return;
    };

    tokio::spawn(async move {
        // Already logged by deliver.
        let _ = attempt.deliver().await;
    });
}
