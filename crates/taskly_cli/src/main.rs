//! Interactive command-line front end.
//!
//! # Responsibility
//! - Drive the core stores from a line-based command loop.
//! - Host the reminder scheduler and print delivered reminders.
//!
//! Task-addressing commands take the number shown by `list`; numbers are
//! positions in the current list, so they shift after a removal.

use chrono::NaiveDate;
use std::io::{self, BufRead, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use taskly_core::{
    core_version, default_log_level, init_logging, local_today, JsonGateway, NotificationSink,
    Reminder, ReminderAddOutcome, ReminderNotification, ReminderRule, ReminderScheduler, Task,
    TaskId, TaskQuery, TaskStatus, TaskUpdate, Workspace, DEFAULT_TICK_INTERVAL,
};

struct CliConfig {
    data_dir: PathBuf,
    log_level: String,
}

/// Prints delivered reminders between prompt lines.
struct StdoutSink;

impl NotificationSink for StdoutSink {
    fn deliver(&self, notification: &ReminderNotification) {
        println!();
        println!("[reminder] {}", notification.title);
        if let Some(category) = &notification.category {
            println!("  Category: {category}");
        }
        if !notification.description.is_empty() {
            println!("  Description: {}", notification.description);
        }
        if let Some(deadline) = notification.deadline {
            println!("  Deadline: {deadline}");
        }
    }
}

fn main() -> ExitCode {
    let config = match parse_args(std::env::args().skip(1)) {
        Ok(Some(config)) => config,
        Ok(None) => return ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    let data_dir = absolute(config.data_dir);
    let log_dir = data_dir.join("logs");
    if let Err(err) = init_logging(&config.log_level, &log_dir.to_string_lossy()) {
        eprintln!("warning: logging disabled: {err}");
    }

    let gateway = JsonGateway::new(&data_dir);
    println!(
        "taskly v{} (data: {})",
        core_version(),
        gateway.data_dir().display()
    );
    let workspace = match Workspace::load(gateway, local_today()) {
        Ok(workspace) => workspace,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    report_delayed(&workspace);

    let shared = Arc::new(Mutex::new(workspace));
    let scheduler =
        match ReminderScheduler::start(Arc::clone(&shared), StdoutSink, DEFAULT_TICK_INTERVAL) {
            Ok(scheduler) => Some(scheduler),
            Err(err) => {
                eprintln!("warning: reminder scheduler unavailable: {err}");
                None
            }
        };

    repl(&shared);

    if let Some(scheduler) = scheduler {
        scheduler.stop();
    }
    match shared.lock() {
        Ok(workspace) => workspace.save_all(),
        Err(_) => eprintln!("warning: state lock poisoned; skipping final save"),
    }
    ExitCode::SUCCESS
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<CliConfig>, String> {
    let mut data_dir: Option<PathBuf> = None;
    let mut log_level: Option<String> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--data-dir" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--data-dir needs a path".to_string())?;
                data_dir = Some(PathBuf::from(value));
            }
            "--log-level" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--log-level needs a level".to_string())?;
                log_level = Some(value);
            }
            "--help" | "-h" => {
                print_usage();
                return Ok(None);
            }
            other => return Err(format!("unknown argument '{other}' (try --help)")),
        }
    }

    let data_dir = data_dir
        .or_else(|| std::env::var_os("TASKLY_DATA_DIR").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("taskly_data"));
    let log_level = log_level
        .or_else(|| std::env::var("TASKLY_LOG").ok())
        .unwrap_or_else(|| default_log_level().to_string());

    Ok(Some(CliConfig {
        data_dir,
        log_level,
    }))
}

fn print_usage() {
    println!("taskly {}", core_version());
    println!("usage: taskly [--data-dir <path>] [--log-level <level>]");
    println!();
    println!("  --data-dir   directory for the JSON documents");
    println!("               (default: ./taskly_data, or TASKLY_DATA_DIR)");
    println!("  --log-level  trace|debug|info|warn|error");
    println!("               (default: build-dependent, or TASKLY_LOG);");
    println!("               logs land under <data-dir>/logs");
}

fn absolute(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(&path))
            .unwrap_or(path)
    }
}

fn report_delayed(workspace: &Workspace<JsonGateway>) {
    let delayed = workspace.tasks.delayed();
    if delayed.is_empty() {
        return;
    }
    println!("Delayed tasks:");
    for task in delayed {
        println!("  {task}");
    }
}

fn repl(shared: &Arc<Mutex<Workspace<JsonGateway>>>) {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    println!("Type 'help' for commands.");

    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                eprintln!("input error: {err}");
                break;
            }
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "quit" | "exit") {
            break;
        }

        let mut guard = match shared.lock() {
            Ok(guard) => guard,
            Err(_) => {
                eprintln!("state lock poisoned; exiting");
                break;
            }
        };
        run_command(&mut guard, &mut input, line);
    }
}

fn run_command<R: BufRead>(workspace: &mut Workspace<JsonGateway>, input: &mut R, line: &str) {
    let (command, rest) = split_command(line);
    match command {
        "help" => print_help(),
        "list" => cmd_list(workspace),
        "add" => cmd_add(workspace, input),
        "update" => cmd_update(workspace, input, rest),
        "status" => cmd_status(workspace, rest),
        "remove" => cmd_remove(workspace, rest),
        "search" => cmd_search(workspace, input),
        "summary" => println!("{}", workspace.tasks.summary(local_today())),
        "categories" => print_names("categories", workspace.categories.categories()),
        "category" => cmd_category(workspace, input, rest),
        "priorities" => print_names("priorities", workspace.priorities.priorities()),
        "priority" => cmd_priority(workspace, input, rest),
        "remind" => cmd_remind(workspace, rest),
        "reminders" => cmd_reminders(workspace, rest),
        "reminder" => cmd_reminder(workspace, rest),
        _ => println!("unknown command '{command}'; type 'help'"),
    }
}

fn print_help() {
    println!(
        "\
Commands:
  list                     show all tasks with their numbers
  add                      add a task (prompts per field)
  update <n>               edit task n (empty input keeps the current value)
  status <n> <status>      set the status of task n
  remove <n>               delete task n and its reminders
  search                   filter tasks (prompts per filter)
  summary                  totals: completed, delayed, due within a week
  categories               list categories
  category add <name>      add a category
  category rename          rename a category (re-files its tasks)
  category delete <name>   delete a category and every task in it
  priorities               list priorities
  priority add <name>      add a priority
  priority rename          rename a priority (re-labels its tasks)
  priority delete <name>   delete a priority (its tasks move to Default)
  remind <n> <when>        add a reminder; when = yyyy-mm-dd,
                           day-before, week-before or month-before
  reminders [n]            list reminders (optionally for task n)
  reminder delete <n> <date>  delete the reminder for task n on that date
  quit                     save and exit"
    );
}

fn cmd_list(workspace: &Workspace<JsonGateway>) {
    if workspace.tasks.is_empty() {
        println!("no tasks");
        return;
    }
    for (index, task) in workspace.tasks.tasks().iter().enumerate() {
        println!("{:>3}. {task}", index + 1);
    }
}

fn cmd_add<R: BufRead>(workspace: &mut Workspace<JsonGateway>, input: &mut R) {
    let title = prompt(input, "Title: ");
    let description = prompt(input, "Description: ");
    let category = non_empty(prompt(input, "Category (empty for none): "));
    let priority = non_empty(prompt(input, "Priority (empty for Default): "));
    let deadline_raw = prompt(input, "Deadline yyyy-mm-dd (empty for none): ");

    if let Some(name) = &category {
        if !workspace.categories.contains(name) {
            println!("unknown category '{name}'; add it first with 'category add {name}'");
            return;
        }
    }
    if let Some(name) = &priority {
        if !workspace.priorities.contains(name) {
            println!("unknown priority '{name}'; add it first with 'priority add {name}'");
            return;
        }
    }
    let deadline = match parse_optional_date(&deadline_raw) {
        Ok(deadline) => deadline,
        Err(()) => {
            println!("invalid date '{deadline_raw}'; expected yyyy-mm-dd");
            return;
        }
    };

    match Task::new(&title, description, category, priority, deadline) {
        Ok(task) => {
            let rendered = task.to_string();
            workspace.tasks.add(task);
            println!("added: {rendered}");
        }
        Err(err) => println!("cannot add task: {err}"),
    }
}

fn cmd_update<R: BufRead>(workspace: &mut Workspace<JsonGateway>, input: &mut R, rest: &str) {
    let Some(id) = task_at(workspace, rest) else {
        println!("usage: update <task-number>");
        return;
    };
    let Some(current) = workspace.tasks.get(id).cloned() else {
        return;
    };

    println!("Editing: {current}");
    println!("(empty keeps the current value, '-' clears optional fields)");
    let title = prompt(input, &format!("Title [{}]: ", current.title));
    let description = prompt(input, &format!("Description [{}]: ", current.description));
    let category = prompt(
        input,
        &format!("Category [{}]: ", current.category.as_deref().unwrap_or("-")),
    );
    let priority = prompt(input, &format!("Priority [{}]: ", current.priority));
    let deadline_raw = prompt(
        input,
        &format!(
            "Deadline [{}]: ",
            current
                .deadline
                .map(|deadline| deadline.to_string())
                .unwrap_or_else(|| "-".to_string())
        ),
    );
    let status_raw = prompt(
        input,
        &format!("Status [{}] ({}): ", current.status, status_names()),
    );

    let mut update = TaskUpdate::from(&current);
    if !title.is_empty() {
        update.title = title;
    }
    if !description.is_empty() {
        update.description = description;
    }
    match category.as_str() {
        "" => {}
        "-" => update.category = None,
        name => {
            if !workspace.categories.contains(name) {
                println!("unknown category '{name}'");
                return;
            }
            update.category = Some(name.to_string());
        }
    }
    match priority.as_str() {
        "" => {}
        "-" => update.priority = None,
        name => {
            if !workspace.priorities.contains(name) {
                println!("unknown priority '{name}'");
                return;
            }
            update.priority = Some(name.to_string());
        }
    }
    match deadline_raw.as_str() {
        "" => {}
        "-" => update.deadline = None,
        raw => match parse_optional_date(raw) {
            Ok(deadline) => update.deadline = deadline,
            Err(()) => {
                println!("invalid date '{raw}'; expected yyyy-mm-dd");
                return;
            }
        },
    }
    if !status_raw.is_empty() {
        match TaskStatus::parse(&status_raw) {
            Some(status) => update.status = status,
            None => {
                println!("unknown status '{status_raw}'");
                return;
            }
        }
    }

    match workspace.tasks.update(id, update) {
        Ok(()) => {
            if let Some(task) = workspace.tasks.get(id) {
                println!("updated: {task}");
            }
        }
        Err(err) => println!("cannot update: {err}"),
    }
}

fn cmd_status(workspace: &mut Workspace<JsonGateway>, rest: &str) {
    let mut parts = rest.splitn(2, char::is_whitespace);
    let (Some(number), Some(status_raw)) = (parts.next(), parts.next()) else {
        println!("usage: status <task-number> <status>");
        return;
    };
    let Some(id) = task_at(workspace, number) else {
        println!("no such task");
        return;
    };
    let Some(status) = TaskStatus::parse(status_raw) else {
        println!("unknown status '{status_raw}' (expected {})", status_names());
        return;
    };
    let Some(task) = workspace.tasks.get(id) else {
        return;
    };

    let mut update = TaskUpdate::from(task);
    update.status = status;
    match workspace.tasks.update(id, update) {
        Ok(()) => println!("status set to {status}"),
        Err(err) => println!("cannot update: {err}"),
    }
}

fn cmd_remove(workspace: &mut Workspace<JsonGateway>, rest: &str) {
    let Some(id) = task_at(workspace, rest) else {
        println!("usage: remove <task-number>");
        return;
    };
    match workspace.remove_task(id) {
        Some(task) => println!("removed: {}", task.title),
        None => println!("no such task"),
    }
}

fn cmd_search<R: BufRead>(workspace: &Workspace<JsonGateway>, input: &mut R) {
    let query = TaskQuery {
        title: non_empty(prompt(input, "Title contains (empty for any): ")),
        priority: non_empty(prompt(input, "Priority (empty for any): ")),
        category: non_empty(prompt(input, "Category (empty for any): ")),
    };
    let hits = workspace.tasks.search(&query);
    if hits.is_empty() {
        println!("no matching tasks");
        return;
    }
    for task in hits {
        println!("  {task}");
    }
}

fn cmd_category<R: BufRead>(workspace: &mut Workspace<JsonGateway>, input: &mut R, rest: &str) {
    let (sub, name) = split_command(rest);
    match sub {
        "add" if !name.is_empty() => {
            if workspace.categories.add(name) {
                println!("category added");
            } else {
                println!("category not added (empty or duplicate name)");
            }
        }
        "rename" => {
            let old = prompt(input, "Current name: ");
            let new = prompt(input, "New name: ");
            if workspace
                .categories
                .rename(&old, &new, &mut workspace.tasks, local_today())
            {
                println!("category renamed; its tasks were re-filed");
            } else {
                println!("rename declined (unknown, empty, or duplicate name)");
            }
        }
        "delete" if !name.is_empty() => {
            if workspace.categories.delete(name, &mut workspace.tasks) {
                println!("category and its tasks deleted");
            } else {
                println!("no such category");
            }
        }
        _ => println!("usage: category add <name> | category rename | category delete <name>"),
    }
}

fn cmd_priority<R: BufRead>(workspace: &mut Workspace<JsonGateway>, input: &mut R, rest: &str) {
    let (sub, name) = split_command(rest);
    match sub {
        "add" if !name.is_empty() => {
            if workspace.priorities.add(name) {
                println!("priority added");
            } else {
                println!("priority not added (empty or duplicate name)");
            }
        }
        "rename" => {
            let old = prompt(input, "Current name: ");
            let new = prompt(input, "New name: ");
            if workspace
                .priorities
                .rename(&old, &new, &mut workspace.tasks)
            {
                println!("priority renamed; its tasks were re-labelled");
            } else {
                println!("rename declined (protected, unknown, empty, or duplicate name)");
            }
        }
        "delete" if !name.is_empty() => {
            if workspace.priorities.delete(name, &mut workspace.tasks) {
                println!("priority deleted; its tasks moved to Default");
            } else {
                println!("delete declined (protected or unknown name)");
            }
        }
        _ => println!("usage: priority add <name> | priority rename | priority delete <name>"),
    }
}

fn cmd_remind(workspace: &mut Workspace<JsonGateway>, rest: &str) {
    let mut parts = rest.split_whitespace();
    let (Some(number), Some(rule_raw)) = (parts.next(), parts.next()) else {
        println!("usage: remind <task-number> <yyyy-mm-dd|day-before|week-before|month-before>");
        return;
    };
    let Some(id) = task_at(workspace, number) else {
        println!("no such task");
        return;
    };

    let rule = match rule_raw {
        "day-before" => ReminderRule::DayBefore,
        "week-before" => ReminderRule::WeekBefore,
        "month-before" => ReminderRule::MonthBefore,
        raw => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => ReminderRule::OnDate(date),
            Err(_) => {
                println!("invalid reminder rule '{raw}'");
                return;
            }
        },
    };

    let Some(task) = workspace.tasks.get(id) else {
        return;
    };
    let date = match rule.resolve(task.deadline, local_today()) {
        Ok(date) => date,
        Err(err) => {
            println!("cannot schedule reminder: {err}");
            return;
        }
    };
    match workspace.reminders.add(task, date) {
        ReminderAddOutcome::Added => println!("reminder set for {date}"),
        ReminderAddOutcome::Duplicate => println!("a reminder for that date already exists"),
        ReminderAddOutcome::TaskCompleted => println!("completed tasks cannot take reminders"),
    }
}

fn cmd_reminders(workspace: &Workspace<JsonGateway>, rest: &str) {
    let entries: Vec<&Reminder> = if rest.is_empty() {
        workspace.reminders.reminders().iter().collect()
    } else {
        let Some(id) = task_at(workspace, rest) else {
            println!("no such task");
            return;
        };
        workspace.reminders.reminders_for_task(id)
    };

    if entries.is_empty() {
        println!("no reminders");
        return;
    }
    for reminder in entries {
        let title = workspace
            .tasks
            .get(reminder.task_id)
            .map(|task| task.title.clone())
            .unwrap_or_else(|| "(deleted task)".to_string());
        let shown = if reminder.shown { " (shown)" } else { "" };
        println!("  {}  {title}{shown}", reminder.date);
    }
}

fn cmd_reminder(workspace: &mut Workspace<JsonGateway>, rest: &str) {
    let (sub, args) = split_command(rest);
    if sub != "delete" {
        println!("usage: reminder delete <task-number> <yyyy-mm-dd>");
        return;
    }
    let mut parts = args.split_whitespace();
    let (Some(number), Some(date_raw)) = (parts.next(), parts.next()) else {
        println!("usage: reminder delete <task-number> <yyyy-mm-dd>");
        return;
    };
    let Some(id) = task_at(workspace, number) else {
        println!("no such task");
        return;
    };
    let Ok(date) = NaiveDate::parse_from_str(date_raw, "%Y-%m-%d") else {
        println!("invalid date '{date_raw}'; expected yyyy-mm-dd");
        return;
    };

    if workspace.reminders.delete(&Reminder::new(id, date)) {
        println!("reminder deleted");
    } else {
        println!("no reminder for that task on {date}");
    }
}

fn print_names(label: &str, names: &[String]) {
    if names.is_empty() {
        println!("no {label}");
        return;
    }
    for name in names {
        println!("  {name}");
    }
}

fn status_names() -> String {
    TaskStatus::ALL
        .map(|status| status.label().replace(' ', "_"))
        .join("|")
}

fn split_command(line: &str) -> (&str, &str) {
    let mut parts = line.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or("");
    let rest = parts.next().unwrap_or("").trim();
    (command, rest)
}

fn task_at(workspace: &Workspace<JsonGateway>, token: &str) -> Option<TaskId> {
    let number: usize = token.trim().parse().ok()?;
    let task = workspace.tasks.tasks().get(number.checked_sub(1)?)?;
    Some(task.id)
}

fn prompt<R: BufRead>(input: &mut R, label: &str) -> String {
    print!("{label}");
    let _ = io::stdout().flush();
    let mut line = String::new();
    if input.read_line(&mut line).is_err() {
        return String::new();
    }
    line.trim().to_string()
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_optional_date(raw: &str) -> Result<Option<NaiveDate>, ()> {
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ())
}
