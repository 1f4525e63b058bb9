use taskly_core::{JsonGateway, PriorityRegistry, Task, TaskStore, DEFAULT_PRIORITY};

#[test]
fn default_priority_is_seeded_on_first_load() {
    let (dir, gateway) = scratch();
    let priorities = PriorityRegistry::load(gateway).unwrap();

    assert_eq!(priorities.priorities(), [DEFAULT_PRIORITY]);
    // Seeding persists, so the next session starts from the same list.
    assert!(dir.path().join("priorities.json").exists());

    let reloaded = PriorityRegistry::load(JsonGateway::new(dir.path())).unwrap();
    assert_eq!(reloaded.priorities(), [DEFAULT_PRIORITY]);
}

#[test]
fn existing_list_with_default_is_left_alone() {
    let (dir, gateway) = scratch();
    {
        let mut priorities = PriorityRegistry::load(gateway).unwrap();
        priorities.add("High");
        priorities.add("Low");
    }

    let reloaded = PriorityRegistry::load(JsonGateway::new(dir.path())).unwrap();
    assert_eq!(reloaded.priorities(), [DEFAULT_PRIORITY, "High", "Low"]);
}

#[test]
fn add_rejects_empty_and_duplicate_names() {
    let (_dir, gateway) = scratch();
    let mut priorities = PriorityRegistry::load(gateway).unwrap();

    assert!(priorities.add("High"));
    assert!(!priorities.add("High"));
    assert!(!priorities.add(DEFAULT_PRIORITY));
    assert!(!priorities.add(""));
}

#[test]
fn rename_relabels_tasks() {
    let (_dir, gateway) = scratch();
    let mut tasks = TaskStore::load(gateway.clone()).unwrap();
    let mut priorities = PriorityRegistry::load(gateway).unwrap();

    priorities.add("High");
    let urgent = tasks.add(task_with_priority("call landlord", "High"));
    let normal = tasks.add(Task::new("water plants", "", None, None, None).unwrap());

    assert!(priorities.rename("High", "Urgent", &mut tasks));

    assert_eq!(priorities.priorities(), [DEFAULT_PRIORITY, "Urgent"]);
    assert_eq!(tasks.get(urgent).unwrap().priority, "Urgent");
    assert_eq!(tasks.get(normal).unwrap().priority, DEFAULT_PRIORITY);
}

#[test]
fn the_default_priority_is_protected() {
    let (_dir, gateway) = scratch();
    let mut tasks = TaskStore::load(gateway.clone()).unwrap();
    let mut priorities = PriorityRegistry::load(gateway).unwrap();

    assert!(!priorities.rename(DEFAULT_PRIORITY, "Renamed", &mut tasks));
    assert!(!priorities.delete(DEFAULT_PRIORITY, &mut tasks));
    assert_eq!(priorities.priorities(), [DEFAULT_PRIORITY]);
}

#[test]
fn rename_declines_bad_arguments_without_side_effects() {
    let (_dir, gateway) = scratch();
    let mut tasks = TaskStore::load(gateway.clone()).unwrap();
    let mut priorities = PriorityRegistry::load(gateway).unwrap();

    priorities.add("High");
    priorities.add("Low");
    let task = tasks.add(task_with_priority("call landlord", "High"));

    assert!(!priorities.rename("Missing", "Anything", &mut tasks));
    assert!(!priorities.rename("High", "Low", &mut tasks));
    assert!(!priorities.rename("High", "", &mut tasks));

    assert_eq!(priorities.priorities(), [DEFAULT_PRIORITY, "High", "Low"]);
    assert_eq!(tasks.get(task).unwrap().priority, "High");
}

#[test]
fn delete_reassigns_tasks_to_default_instead_of_removing_them() {
    let (dir, gateway) = scratch();
    let mut tasks = TaskStore::load(gateway.clone()).unwrap();
    let mut priorities = PriorityRegistry::load(gateway).unwrap();

    priorities.add("High");
    let urgent = tasks.add(task_with_priority("call landlord", "High"));
    let other = tasks.add(task_with_priority("water plants", "High"));

    assert!(priorities.delete("High", &mut tasks));

    assert_eq!(priorities.priorities(), [DEFAULT_PRIORITY]);
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks.get(urgent).unwrap().priority, DEFAULT_PRIORITY);
    assert_eq!(tasks.get(other).unwrap().priority, DEFAULT_PRIORITY);

    let reloaded = TaskStore::load(JsonGateway::new(dir.path())).unwrap();
    assert_eq!(reloaded.get(urgent).unwrap().priority, DEFAULT_PRIORITY);
}

#[test]
fn delete_unknown_priority_is_a_silent_no_op() {
    let (_dir, gateway) = scratch();
    let mut tasks = TaskStore::load(gateway.clone()).unwrap();
    let mut priorities = PriorityRegistry::load(gateway).unwrap();

    assert!(!priorities.delete("Missing", &mut tasks));
    assert_eq!(priorities.priorities(), [DEFAULT_PRIORITY]);
}

fn scratch() -> (tempfile::TempDir, JsonGateway) {
    let dir = tempfile::tempdir().unwrap();
    let gateway = JsonGateway::new(dir.path());
    (dir, gateway)
}

fn task_with_priority(title: &str, priority: &str) -> Task {
    Task::new(title, "", None, Some(priority.to_string()), None).unwrap()
}
