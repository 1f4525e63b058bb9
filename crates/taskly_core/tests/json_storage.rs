use chrono::NaiveDate;
use serde_json::{json, Value};
use taskly_core::{
    CategoryGateway, JsonGateway, PriorityGateway, Reminder, ReminderGateway, StorageError, Task,
    TaskGateway, TaskStatus,
};

#[test]
fn missing_documents_load_as_empty_collections() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = JsonGateway::new(dir.path().join("never_created"));

    assert!(gateway.load_tasks().unwrap().is_empty());
    assert!(gateway.load_categories().unwrap().is_empty());
    assert!(gateway.load_priorities().unwrap().is_empty());
    assert!(gateway.load_reminders().unwrap().is_empty());
}

#[test]
fn empty_and_null_documents_load_as_empty_collections() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = JsonGateway::new(dir.path());

    std::fs::write(dir.path().join("tasks.json"), "").unwrap();
    std::fs::write(dir.path().join("categories.json"), "null").unwrap();
    std::fs::write(dir.path().join("priorities.json"), "  \n").unwrap();

    assert!(gateway.load_tasks().unwrap().is_empty());
    assert!(gateway.load_categories().unwrap().is_empty());
    assert!(gateway.load_priorities().unwrap().is_empty());
}

#[test]
fn malformed_documents_are_reported_not_masked() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = JsonGateway::new(dir.path());

    std::fs::write(dir.path().join("tasks.json"), "{ not json").unwrap();

    let err = gateway.load_tasks().unwrap_err();
    assert!(matches!(err, StorageError::Malformed { .. }));
    let message = err.to_string();
    assert!(message.contains("tasks.json"), "unexpected message: {message}");
}

#[test]
fn saving_creates_the_data_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("deep").join("data");
    let gateway = JsonGateway::new(&nested);
    assert_eq!(gateway.data_dir(), nested.as_path());

    gateway.save_categories(&["Work".to_string()]).unwrap();

    assert!(nested.join("categories.json").exists());
    assert_eq!(gateway.load_categories().unwrap(), ["Work"]);
}

#[test]
fn name_lists_are_plain_string_arrays() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = JsonGateway::new(dir.path());

    gateway
        .save_priorities(&["Default".to_string(), "High".to_string()])
        .unwrap();

    let raw = std::fs::read_to_string(dir.path().join("priorities.json")).unwrap();
    let value: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value, json!(["Default", "High"]));
}

#[test]
fn tasks_serialize_with_iso_dates_and_snake_case_statuses() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = JsonGateway::new(dir.path());

    let mut task = Task::new(
        "Pay rent",
        "transfer before noon",
        Some("Bills".to_string()),
        Some("High".to_string()),
        Some(date(2024, 3, 15)),
    )
    .unwrap();
    task.status = TaskStatus::InProgress;
    gateway.save_tasks(std::slice::from_ref(&task)).unwrap();

    let raw = std::fs::read_to_string(dir.path().join("tasks.json")).unwrap();
    let value: Value = serde_json::from_str(&raw).unwrap();
    let entry = &value[0];

    assert_eq!(entry["title"], json!("Pay rent"));
    assert_eq!(entry["deadline"], json!("2024-03-15"));
    assert_eq!(entry["status"], json!("in_progress"));
    assert_eq!(entry["category"], json!("Bills"));
    assert_eq!(entry["id"], json!(task.id.to_string()));

    let reloaded = gateway.load_tasks().unwrap();
    assert_eq!(reloaded[0], task);
}

#[test]
fn reminders_serialize_as_task_id_date_and_shown() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = JsonGateway::new(dir.path());

    let task = Task::new("Pay rent", "", None, None, None).unwrap();
    let reminder = Reminder::new(task.id, date(2025, 7, 1));
    gateway
        .save_reminders(std::slice::from_ref(&reminder))
        .unwrap();

    let raw = std::fs::read_to_string(dir.path().join("reminders.json")).unwrap();
    let value: Value = serde_json::from_str(&raw).unwrap();
    let entry = &value[0];

    assert_eq!(entry["task_id"], json!(task.id.to_string()));
    assert_eq!(entry["date"], json!("2025-07-01"));
    assert_eq!(entry["shown"], json!(false));

    let reloaded = gateway.load_reminders().unwrap();
    assert_eq!(reloaded[0].task_id, task.id);
    assert_eq!(reloaded[0].date, date(2025, 7, 1));
}

#[test]
fn reminders_missing_the_shown_field_load_as_undelivered() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = JsonGateway::new(dir.path());
    let task_id = uuid::Uuid::new_v4();

    let raw = json!([{ "task_id": task_id.to_string(), "date": "2025-07-01" }]).to_string();
    std::fs::write(dir.path().join("reminders.json"), raw).unwrap();

    let reminders = gateway.load_reminders().unwrap();
    assert_eq!(reminders.len(), 1);
    assert!(!reminders[0].shown);
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
