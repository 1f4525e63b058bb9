use chrono::NaiveDate;
use taskly_core::{JsonGateway, Task, TaskStatus, TaskStore, Workspace, DEFAULT_PRIORITY};

#[test]
fn loading_a_missing_data_dir_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("fresh");

    let workspace = Workspace::load(JsonGateway::new(&data_dir), date(2025, 7, 1)).unwrap();

    assert!(workspace.tasks.is_empty());
    assert!(workspace.categories.categories().is_empty());
    assert_eq!(workspace.priorities.priorities(), [DEFAULT_PRIORITY]);
    assert!(workspace.reminders.is_empty());
}

#[test]
fn loading_runs_the_overdue_sweep_and_persists_it() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut tasks = TaskStore::load(JsonGateway::new(dir.path())).unwrap();
        tasks.add(Task::new("late", "", None, None, Some(date(2025, 6, 1))).unwrap());
    }

    let workspace = Workspace::load(JsonGateway::new(dir.path()), date(2025, 7, 1)).unwrap();
    assert_eq!(workspace.tasks.tasks()[0].status, TaskStatus::Delayed);

    // The corrected status reached the document, not just memory.
    let reloaded = TaskStore::load(JsonGateway::new(dir.path())).unwrap();
    assert_eq!(reloaded.tasks()[0].status, TaskStatus::Delayed);
}

#[test]
fn removing_a_task_removes_its_reminders() {
    let (_dir, mut workspace) = scratch_workspace();

    let doomed = Task::new("doomed", "", None, None, None).unwrap();
    let survivor = Task::new("survivor", "", None, None, None).unwrap();
    workspace.tasks.add(doomed.clone());
    workspace.tasks.add(survivor.clone());
    workspace.reminders.add(&doomed, date(2025, 7, 1));
    workspace.reminders.add(&survivor, date(2025, 7, 1));

    let removed = workspace.remove_task(doomed.id).unwrap();
    assert_eq!(removed.title, "doomed");

    assert!(workspace.tasks.get(doomed.id).is_none());
    assert_eq!(workspace.reminders.len(), 1);
    assert_eq!(workspace.reminders.reminders()[0].task_id, survivor.id);
}

#[test]
fn removing_an_unknown_task_touches_nothing() {
    let (_dir, mut workspace) = scratch_workspace();

    let task = Task::new("kept", "", None, None, None).unwrap();
    workspace.tasks.add(task.clone());
    workspace.reminders.add(&task, date(2025, 7, 1));

    assert!(workspace.remove_task(uuid::Uuid::new_v4()).is_none());
    assert_eq!(workspace.tasks.len(), 1);
    assert_eq!(workspace.reminders.len(), 1);
}

#[test]
fn save_all_writes_every_document() {
    let (dir, mut workspace) = scratch_workspace();

    let task = Task::new("kept", "", None, None, None).unwrap();
    workspace.tasks.add(task.clone());
    workspace.categories.add("Bills");
    workspace.priorities.add("High");
    workspace.reminders.add(&task, date(2025, 7, 1));

    for document in [
        "tasks.json",
        "categories.json",
        "priorities.json",
        "reminders.json",
    ] {
        std::fs::remove_file(dir.path().join(document)).unwrap();
    }

    workspace.save_all();

    for document in [
        "tasks.json",
        "categories.json",
        "priorities.json",
        "reminders.json",
    ] {
        assert!(dir.path().join(document).exists(), "{document} missing");
    }
}

fn scratch_workspace() -> (tempfile::TempDir, Workspace<JsonGateway>) {
    let dir = tempfile::tempdir().unwrap();
    let workspace = Workspace::load(JsonGateway::new(dir.path()), date(2025, 7, 1)).unwrap();
    (dir, workspace)
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
