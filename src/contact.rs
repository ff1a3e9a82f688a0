use std::{cell::Cell, fmt, rc::Rc, time::Duration};

use futures_util::future::LocalBoxFuture;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::{
    logging::{LogLevel, Logger},
    notify::{NotificationPresenter, Severity},
    timing::{Scheduler, TimerHandle},
};

pub const SUCCESS_MESSAGE: &str = "Message sent successfully! I'll get back to you soon.";
pub const FAILURE_MESSAGE: &str = "Failed to send message. Please try again or email me directly.";
pub const VALIDATION_MESSAGE: &str = "Please fill in your name, email and message before sending.";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub subject: String,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequiredField {
    Name,
    Email,
    Message,
}

impl RequiredField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Message => "message",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ContactFields {
    pub fn missing_fields(&self) -> Vec<RequiredField> {
        [
            (RequiredField::Name, &self.name),
            (RequiredField::Email, &self.email),
            (RequiredField::Message, &self.message),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("request could not be delivered: {0}")]
    Transport(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("missing required fields: {}", join_fields(.missing))]
    Validation { missing: Vec<RequiredField> },
    #[error("relay answered with status {status}")]
    Rejected { status: u16 },
    #[error(transparent)]
    Transport(#[from] RelayError),
}

fn join_fields(fields: &[RequiredField]) -> String {
    fields.iter().map(|field| field.as_str()).collect::<Vec<_>>().join(", ")
}

#[derive(Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Sent,
    Failed(SubmitError),
    Ignored,
}

/// The third-party form relay. One POST per call, resolving to the HTTP
/// status or a transport error. No retries.
pub trait FormRelay {
    fn post<'a>(&'a self, endpoint: &'a str, fields: &'a ContactFields) -> LocalBoxFuture<'a, Result<u16, RelayError>>;
}

pub trait SubmitControl {
    fn set_pending(&self, pending: bool);
    fn clear_fields(&self);
}

pub struct ContactSubmitter {
    endpoint: String,
    relay: Rc<dyn FormRelay>,
    control: Rc<dyn SubmitControl>,
    notifier: Rc<NotificationPresenter>,
    scheduler: Rc<dyn Scheduler>,
    restore_delay: Duration,
    in_flight: Rc<Cell<bool>>,
    restore_timer: Rc<Cell<Option<TimerHandle>>>,
    logger: Logger,
}

impl ContactSubmitter {
    pub fn new(
        endpoint: impl Into<String>,
        relay: Rc<dyn FormRelay>,
        control: Rc<dyn SubmitControl>,
        notifier: Rc<NotificationPresenter>,
        scheduler: Rc<dyn Scheduler>,
        restore_delay: Duration,
        logger: Logger,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            relay,
            control,
            notifier,
            scheduler,
            restore_delay,
            in_flight: Rc::new(Cell::new(false)),
            restore_timer: Rc::new(Cell::new(None)),
            logger,
        }
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight.get()
    }

    pub async fn submit(&self, fields: ContactFields) -> SubmitOutcome {
        if self.in_flight.get() {
            self.logger.event(LogLevel::Debug, "contact_submit_ignored", json!({}));
            return SubmitOutcome::Ignored;
        }

        let missing = fields.missing_fields();
        if !missing.is_empty() {
            self.notifier.notify(VALIDATION_MESSAGE, Severity::Error);
            return SubmitOutcome::Failed(SubmitError::Validation { missing });
        }

        let pending = PendingControl::engage(
            Rc::clone(&self.in_flight),
            Rc::clone(&self.restore_timer),
            Rc::clone(&self.control),
            Rc::clone(&self.scheduler),
        );
        self.logger.event(
            LogLevel::Info,
            "contact_submit_started",
            json!({ "endpoint": self.endpoint }),
        );

        let result = match self.relay.post(&self.endpoint, &fields).await {
            Ok(status) if (200..300).contains(&status) => Ok(status),
            Ok(status) => Err(SubmitError::Rejected { status }),
            Err(error) => Err(SubmitError::Transport(error)),
        };

        match result {
            Ok(status) => {
                self.logger
                    .event(LogLevel::Info, "contact_submit_sent", json!({ "status": status }));
                self.notifier.notify(SUCCESS_MESSAGE, Severity::Success);
                self.control.clear_fields();
                pending.release_after(self.restore_delay);
                SubmitOutcome::Sent
            }
            Err(error) => {
                self.logger.event(
                    LogLevel::Warn,
                    "contact_submit_failed",
                    json!({ "error": error.to_string() }),
                );
                drop(pending);
                self.notifier.notify(FAILURE_MESSAGE, Severity::Error);
                SubmitOutcome::Failed(error)
            }
        }
    }
}

// Restores the submit control when dropped, on every exit path including a
// dropped future.
struct PendingControl {
    in_flight: Rc<Cell<bool>>,
    restore_timer: Rc<Cell<Option<TimerHandle>>>,
    control: Rc<dyn SubmitControl>,
    scheduler: Rc<dyn Scheduler>,
    delay: Duration,
}

impl PendingControl {
    fn engage(
        in_flight: Rc<Cell<bool>>,
        restore_timer: Rc<Cell<Option<TimerHandle>>>,
        control: Rc<dyn SubmitControl>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        // A restore left over from the previous submission must not re-enable
        // the control under this one.
        if let Some(handle) = restore_timer.take() {
            scheduler.clear_timeout(handle);
        }
        in_flight.set(true);
        control.set_pending(true);
        Self {
            in_flight,
            restore_timer,
            control,
            scheduler,
            delay: Duration::ZERO,
        }
    }

    fn release_after(mut self, delay: Duration) {
        self.delay = delay;
    }
}

impl Drop for PendingControl {
    fn drop(&mut self) {
        self.in_flight.set(false);

        if self.delay.is_zero() {
            self.control.set_pending(false);
            return;
        }

        let control = Rc::clone(&self.control);
        let restore_timer = Rc::clone(&self.restore_timer);
        let handle = self.scheduler.set_timeout(
            self.delay,
            Box::new(move || {
                restore_timer.set(None);
                control.set_pending(false);
            }),
        );
        self.restore_timer.set(Some(handle));
    }
}
