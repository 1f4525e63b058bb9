//! Background reminder delivery.
//!
//! # Responsibility
//! - Periodically deliver due reminders to a notification sink.
//! - Keep the delivery pass callable synchronously for front ends and tests.
//!
//! # Invariants
//! - A delivery pass never runs concurrently with store mutations; the
//!   workspace mutex serializes them.
//! - Each reminder is delivered at most once (`shown` flips before the next
//!   pass can see it).
//! - Reminder saves are batched per pass, and only when something was
//!   delivered.

use crate::model::reminder::Reminder;
use crate::model::task::{Task, TaskId};
use crate::storage::DocumentGateway;
use crate::workspace::Workspace;
use chrono::NaiveDate;
use log::{debug, error, info, warn};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Delivery cadence of the background scheduler.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(60);

/// Everything a front end needs to render one reminder.
///
/// Carries owned copies of the task fields, so rendering happens outside
/// the workspace lock without borrowing store internals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderNotification {
    pub task_id: TaskId,
    pub title: String,
    pub category: Option<String>,
    pub description: String,
    pub deadline: Option<NaiveDate>,
    pub reminder_date: NaiveDate,
}

impl ReminderNotification {
    fn for_task(task: &Task, reminder: &Reminder) -> Self {
        Self {
            task_id: task.id,
            title: task.title.clone(),
            category: task.category.clone(),
            description: task.description.clone(),
            deadline: task.deadline,
            reminder_date: reminder.date,
        }
    }
}

/// Receiver for delivered reminders.
///
/// Implementations are called from the scheduler thread and should return
/// promptly; the workspace stays locked for the duration of the pass.
pub trait NotificationSink: Send {
    fn deliver(&self, notification: &ReminderNotification);
}

/// Delivers every due, undelivered reminder to `sink`, marking each one
/// shown. Returns how many reminders were delivered.
///
/// Reminders whose task no longer exists are skipped, logged, and left
/// undelivered. The reminder document is saved once at the end of the pass,
/// and only when at least one reminder went out.
pub fn dispatch_due_reminders<G, S>(
    workspace: &mut Workspace<G>,
    sink: &S,
    today: NaiveDate,
) -> usize
where
    G: DocumentGateway,
    S: NotificationSink + ?Sized,
{
    let due = workspace.reminders.due_unshown(today);
    let mut delivered = 0;

    for reminder in due {
        let Some(task) = workspace.tasks.get(reminder.task_id) else {
            warn!(
                "event=reminder_orphan module=scheduler status=skipped task_id={} date={}",
                reminder.task_id, reminder.date
            );
            continue;
        };

        let notification = ReminderNotification::for_task(task, &reminder);
        sink.deliver(&notification);
        workspace.reminders.mark_shown(reminder.task_id, reminder.date);
        delivered += 1;
    }

    if delivered > 0 {
        workspace.reminders.save();
        info!("event=reminder_dispatch module=scheduler status=ok delivered={delivered}");
    }
    delivered
}

/// Handle to the background delivery thread.
///
/// The thread ticks immediately on start and then at the configured
/// cadence. Dropping the handle (or calling [`ReminderScheduler::stop`])
/// signals shutdown and joins the thread.
pub struct ReminderScheduler {
    shutdown_tx: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl ReminderScheduler {
    /// Spawns the delivery thread over a shared workspace.
    ///
    /// # Errors
    /// Fails only when the OS refuses to spawn the thread.
    pub fn start<G, S>(
        workspace: Arc<Mutex<Workspace<G>>>,
        sink: S,
        cadence: Duration,
    ) -> std::io::Result<Self>
    where
        G: DocumentGateway + Send + 'static,
        S: NotificationSink + 'static,
    {
        let (shutdown_tx, shutdown_rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("taskly-reminders".to_string())
            .spawn(move || run_loop(workspace, sink, cadence, shutdown_rx))?;

        debug!(
            "event=scheduler_start module=scheduler status=ok cadence_secs={}",
            cadence.as_secs()
        );
        Ok(Self {
            shutdown_tx,
            handle: Some(handle),
        })
    }

    /// Signals shutdown and joins the delivery thread.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.shutdown_tx.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_loop<G, S>(
    workspace: Arc<Mutex<Workspace<G>>>,
    sink: S,
    cadence: Duration,
    shutdown_rx: Receiver<()>,
) where
    G: DocumentGateway,
    S: NotificationSink,
{
    loop {
        match workspace.lock() {
            Ok(mut guard) => {
                dispatch_due_reminders(&mut guard, &sink, crate::local_today());
            }
            Err(_) => {
                error!(
                    "event=scheduler_tick module=scheduler status=error error=workspace_mutex_poisoned"
                );
                break;
            }
        }

        match shutdown_rx.recv_timeout(cadence) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    debug!("event=scheduler_stop module=scheduler status=ok");
}
