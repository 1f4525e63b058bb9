use chrono::NaiveDate;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use taskly_core::{
    dispatch_due_reminders, local_today, JsonGateway, NotificationSink, ReminderNotification,
    ReminderScheduler, Task, Workspace,
};

#[test]
fn dispatch_delivers_due_reminders_once() {
    let (_dir, mut workspace) = scratch_workspace();
    let today = date(2025, 7, 1);

    let task = add_task(&mut workspace, "Pay rent");
    workspace.reminders.add(&task, date(2025, 6, 30));
    workspace.reminders.add(&task, today);
    workspace.reminders.add(&task, date(2025, 7, 2));

    let sink = RecordingSink::default();
    assert_eq!(dispatch_due_reminders(&mut workspace, &sink, today), 2);

    let titles: Vec<String> = sink
        .delivered
        .lock()
        .unwrap()
        .iter()
        .map(|notification| notification.title.clone())
        .collect();
    assert_eq!(titles, ["Pay rent", "Pay rent"]);

    let shown: Vec<bool> = workspace
        .reminders
        .reminders()
        .iter()
        .map(|reminder| reminder.shown)
        .collect();
    assert_eq!(shown, [true, true, false]);

    // Nothing left to deliver on the next pass.
    assert_eq!(dispatch_due_reminders(&mut workspace, &sink, today), 0);
}

#[test]
fn notifications_carry_the_task_fields() {
    let (_dir, mut workspace) = scratch_workspace();
    let today = date(2025, 7, 1);

    workspace.categories.add("Bills");
    let task = Task::new(
        "Pay rent",
        "transfer before noon",
        Some("Bills".to_string()),
        None,
        Some(date(2025, 7, 8)),
    )
    .unwrap();
    workspace.tasks.add(task.clone());
    workspace.reminders.add(&task, today);

    let sink = RecordingSink::default();
    dispatch_due_reminders(&mut workspace, &sink, today);

    let delivered = sink.delivered.lock().unwrap();
    let notification = &delivered[0];
    assert_eq!(notification.task_id, task.id);
    assert_eq!(notification.title, "Pay rent");
    assert_eq!(notification.category.as_deref(), Some("Bills"));
    assert_eq!(notification.description, "transfer before noon");
    assert_eq!(notification.deadline, Some(date(2025, 7, 8)));
    assert_eq!(notification.reminder_date, today);
}

#[test]
fn week_before_reminder_comes_due_on_the_derived_date() {
    let (_dir, mut workspace) = scratch_workspace();
    let creation_day = date(2025, 6, 20);

    let task = Task::new("Pay rent", "", None, None, Some(date(2025, 7, 8))).unwrap();
    workspace.tasks.add(task.clone());
    let reminder_date = taskly_core::ReminderRule::WeekBefore
        .resolve(task.deadline, creation_day)
        .unwrap();
    workspace.reminders.add(&task, reminder_date);

    let sink = RecordingSink::default();
    assert_eq!(
        dispatch_due_reminders(&mut workspace, &sink, date(2025, 6, 30)),
        0
    );
    assert_eq!(
        dispatch_due_reminders(&mut workspace, &sink, date(2025, 7, 1)),
        1
    );
}

#[test]
fn orphaned_reminders_are_skipped_and_left_undelivered() {
    let (_dir, mut workspace) = scratch_workspace();
    let today = date(2025, 7, 1);

    // Reminder whose task never made it into the store.
    let ghost = Task::new("Ghost", "", None, None, None).unwrap();
    workspace.reminders.add(&ghost, today);

    let sink = RecordingSink::default();
    assert_eq!(dispatch_due_reminders(&mut workspace, &sink, today), 0);
    assert!(sink.delivered.lock().unwrap().is_empty());

    let entry = &workspace.reminders.reminders()[0];
    assert!(!entry.shown);
}

#[test]
fn reminder_document_is_saved_only_when_something_was_delivered() {
    let (dir, mut workspace) = scratch_workspace();
    let today = date(2025, 7, 1);
    let document = dir.path().join("reminders.json");

    let task = add_task(&mut workspace, "Pay rent");
    workspace.reminders.add(&task, date(2025, 7, 2));

    std::fs::remove_file(&document).unwrap();
    let sink = RecordingSink::default();
    assert_eq!(dispatch_due_reminders(&mut workspace, &sink, today), 0);
    assert!(!document.exists());

    assert_eq!(dispatch_due_reminders(&mut workspace, &sink, date(2025, 7, 2)), 1);
    assert!(document.exists());
    let raw = std::fs::read_to_string(&document).unwrap();
    assert!(raw.contains("\"shown\": true"));
}

#[test]
fn scheduler_thread_ticks_immediately_and_stops_cleanly() {
    let (_dir, mut workspace) = scratch_workspace();

    let task = add_task(&mut workspace, "Pay rent");
    // Long past, so it is due regardless of the wall clock.
    workspace.reminders.add(&task, date(2020, 1, 1));

    let shared = Arc::new(Mutex::new(workspace));
    let (tx, rx) = mpsc::channel();
    let scheduler = ReminderScheduler::start(
        Arc::clone(&shared),
        ChannelSink { tx },
        Duration::from_secs(60),
    )
    .unwrap();

    // The first tick runs on start, not after the first cadence interval.
    let notification = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(notification.title, "Pay rent");

    scheduler.stop();
    assert!(shared.lock().unwrap().reminders.reminders()[0].shown);
    assert!(rx.try_recv().is_err());
}

#[test]
fn dropping_the_scheduler_joins_the_thread() {
    let (_dir, workspace) = scratch_workspace();
    let shared = Arc::new(Mutex::new(workspace));
    let (tx, _rx) = mpsc::channel();

    let scheduler = ReminderScheduler::start(
        Arc::clone(&shared),
        ChannelSink { tx },
        Duration::from_millis(10),
    )
    .unwrap();
    drop(scheduler);

    // The workspace is free again once the thread is gone.
    assert!(shared.lock().unwrap().tasks.is_empty());
}

#[derive(Default)]
struct RecordingSink {
    delivered: Mutex<Vec<ReminderNotification>>,
}

impl NotificationSink for RecordingSink {
    fn deliver(&self, notification: &ReminderNotification) {
        self.delivered.lock().unwrap().push(notification.clone());
    }
}

struct ChannelSink {
    tx: Sender<ReminderNotification>,
}

impl NotificationSink for ChannelSink {
    fn deliver(&self, notification: &ReminderNotification) {
        let _ = self.tx.send(notification.clone());
    }
}

fn scratch_workspace() -> (tempfile::TempDir, Workspace<JsonGateway>) {
    let dir = tempfile::tempdir().unwrap();
    let workspace = Workspace::load(JsonGateway::new(dir.path()), local_today()).unwrap();
    (dir, workspace)
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn add_task(workspace: &mut Workspace<JsonGateway>, title: &str) -> Task {
    let task = Task::new(title, "", None, None, None).unwrap();
    workspace.tasks.add(task.clone());
    task
}
