//! Confirmation dispatch interface
//!
//! A creating transaction stages a confirmation email task and the commit
//! releases it to the caller, who hands it to a [`NotificationQueue`]. The
//! queue only ever sees tasks whose transaction committed, so an
//! implementation may treat each call as a fact about the store.

use std::sync::{Mutex, PoisonError};

use crate::store::ConfirmationTask;

/// Sink for confirmation tasks released by committed transactions.
pub trait NotificationQueue: Send + Sync {
    /// Accept one task. Called once per task of a committed transaction and
    /// never for a transaction that rolled back.
    fn enqueue(&self, task: &ConfirmationTask);
}

/// Queue that drops every task, for callers that dispatch no confirmations.
#[derive(Debug, Default)]
pub struct NoopNotificationQueue;

impl NotificationQueue for NoopNotificationQueue {
    fn enqueue(&self, _task: &ConfirmationTask) {}
}

/// Queue that emits each task as a structured log event. There is no mail
/// relay in this system, so dispatch means making the task observable.
#[derive(Debug, Default)]
pub struct LoggingNotificationQueue;

impl NotificationQueue for LoggingNotificationQueue {
    fn enqueue(&self, task: &ConfirmationTask) {
        tracing::info!(
            op = "send_confirmation_email",
            organizer_email = %task.organizer_email,
            conference_name = %task.conference_name,
            conference_key = %task.conference_key.websafe(),
            "confirmation email task dispatched"
        );
    }
}

/// Queue that records every task, for tests that assert on dispatch.
#[derive(Debug, Default)]
pub struct RecordingNotificationQueue {
    tasks: Mutex<Vec<ConfirmationTask>>,
}

impl RecordingNotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks recorded so far, in dispatch order
    pub fn tasks(&self) -> Vec<ConfirmationTask> {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl NotificationQueue for RecordingNotificationQueue {
    fn enqueue(&self, task: &ConfirmationTask) {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(task.clone());
    }
}
