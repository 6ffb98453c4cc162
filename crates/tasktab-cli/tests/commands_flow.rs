use chrono::NaiveDate;
use tasktab_cli::cli::{CategoryCommand, Command};
use tasktab_cli::commands::{Now, dispatch};
use tasktab_cli::config::Config;
use tasktab_cli::file_storage::FileStorage;
use tasktab_cli::render::Renderer;
use tasktab_core::{KeyValueStorage, Priority, persist};
use tempfile::tempdir;

fn now(millis: u64) -> Now {
    Now {
        today: NaiveDate::from_ymd_opt(2026, 10, 19).expect("date"),
        millis,
    }
}

fn run(storage: &FileStorage, command: Command, millis: u64) -> String {
    let mut out = Vec::new();
    dispatch(
        storage,
        &Config::default(),
        &Renderer::plain(),
        &mut out,
        command,
        now(millis),
    )
    .expect("dispatch");
    String::from_utf8(out).expect("utf8")
}

fn add(text: &str, category: Option<&str>, due: Option<&str>) -> Command {
    Command::Add {
        category: category.map(str::to_string),
        priority: Some("high".to_string()),
        due: due.map(str::to_string),
        text: text.split(' ').map(str::to_string).collect(),
    }
}

#[test]
fn add_toggle_and_list_through_files() {
    let temp = tempdir().expect("tempdir");
    let storage = FileStorage::open(temp.path()).expect("open storage");

    run(&storage, add("Water plants", None, Some("+2d")), 100);
    run(&storage, add("Fix bike", None, None), 200);
    run(
        &storage,
        Command::Done {
            category: None,
            task: "100".to_string(),
        },
        300,
    );

    let listing = run(
        &storage,
        Command::List {
            category: None,
            active: false,
        },
        400,
    );
    assert!(listing.starts_with("Home Tasks\n"));
    assert!(listing.contains("50% Completed (1/2)"));
    assert!(listing.find("Fix bike") < listing.find("Water plants"));

    let store = persist::load(&storage);
    let task = &store.categories()[0].tasks[0];
    assert_eq!(task.priority, Priority::High);
    assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2026, 10, 21));
    assert!(task.completed);
}

#[test]
fn blank_task_writes_nothing() {
    let temp = tempdir().expect("tempdir");
    let storage = FileStorage::open(temp.path()).expect("open storage");

    run(&storage, add("   ", None, None), 1);
    assert_eq!(storage.get_item(persist::CATEGORIES_KEY).expect("read"), None);
}

#[test]
fn category_lifecycle_and_row_references() {
    let temp = tempdir().expect("tempdir");
    let storage = FileStorage::open(temp.path()).expect("open storage");

    run(
        &storage,
        Command::Category(CategoryCommand::Add {
            name: vec!["Errands".to_string()],
        }),
        1,
    );
    run(&storage, add("Bank", Some("errands"), None), 10);
    run(&storage, add("Post", Some("errands"), None), 20);
    run(
        &storage,
        Command::Move {
            category: Some("3".to_string()),
            from: 1,
            to: 0,
        },
        30,
    );
    // Row 1 is now "Post".
    run(
        &storage,
        Command::Delete {
            category: Some("Errands".to_string()),
            task: "1".to_string(),
        },
        40,
    );
    run(
        &storage,
        Command::Category(CategoryCommand::Rename {
            selector: "Errands".to_string(),
            name: vec!["Town".to_string()],
        }),
        50,
    );

    let store = persist::load(&storage);
    let town = &store.categories()[3];
    assert_eq!(town.name, "Town");
    assert_eq!(town.tasks.len(), 1);
    assert_eq!(town.tasks[0].text, "Bank");

    run(
        &storage,
        Command::Category(CategoryCommand::Remove {
            selector: "Town".to_string(),
        }),
        60,
    );
    assert_eq!(persist::load(&storage).categories().len(), 3);
}

#[test]
fn theme_toggle_is_persisted() {
    let temp = tempdir().expect("tempdir");
    let storage = FileStorage::open(temp.path()).expect("open storage");

    let shown = run(
        &storage,
        Command::Theme {
            value: Some("toggle".to_string()),
        },
        1,
    );
    assert_eq!(shown, "dark\n");
    assert_eq!(
        storage.get_item(persist::THEME_KEY).expect("read").as_deref(),
        Some("dark")
    );
}

#[test]
fn unknown_category_is_an_error() {
    let temp = tempdir().expect("tempdir");
    let storage = FileStorage::open(temp.path()).expect("open storage");

    let mut out = Vec::new();
    let result = dispatch(
        &storage,
        &Config::default(),
        &Renderer::plain(),
        &mut out,
        Command::List {
            category: Some("Nowhere".to_string()),
            active: false,
        },
        now(1),
    );
    assert!(result.is_err());
}

fn edit(task: &str, priority: Option<&str>, due: Option<&str>, text: Option<&str>) -> Command {
    Command::Edit {
        category: None,
        task: task.to_string(),
        priority: priority.map(str::to_string),
        due: due.map(str::to_string),
        text: text.map(str::to_string),
    }
}

#[test]
fn edit_replaces_priority_due_and_text() {
    let temp = tempdir().expect("tempdir");
    let storage = FileStorage::open(temp.path()).expect("open storage");

    run(&storage, add("Water plants", None, Some("2026-11-01")), 5);
    let shown = run(&storage, edit("5", Some("low"), Some("none"), Some("  Water ferns ")), 6);
    assert_eq!(shown, "Edited task 5.\n");

    let store = persist::load(&storage);
    let task = &store.categories()[0].tasks[0];
    assert_eq!(task.priority, Priority::Low);
    assert_eq!(task.due_date, None);
    assert_eq!(task.text, "Water ferns");
}

#[test]
fn edit_keeps_fields_that_are_not_given() {
    let temp = tempdir().expect("tempdir");
    let storage = FileStorage::open(temp.path()).expect("open storage");

    run(&storage, add("Water plants", None, Some("2026-11-01")), 5);
    run(&storage, edit("1", None, Some("+1w"), Some("   ")), 6);

    let store = persist::load(&storage);
    let task = &store.categories()[0].tasks[0];
    assert_eq!(task.priority, Priority::High);
    assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2026, 10, 26));
    assert_eq!(task.text, "Water plants");
}

#[test]
fn edit_without_changes_is_an_error() {
    let temp = tempdir().expect("tempdir");
    let storage = FileStorage::open(temp.path()).expect("open storage");
    run(&storage, add("Water plants", None, None), 5);

    let mut out = Vec::new();
    let err = dispatch(
        &storage,
        &Config::default(),
        &Renderer::plain(),
        &mut out,
        edit("5", None, None, None),
        now(6),
    )
    .expect_err("nothing to edit");
    assert!(format!("{err:#}").contains("nothing to edit"));
    assert!(out.is_empty());
}

#[test]
fn blank_text_only_edit_writes_nothing() {
    let temp = tempdir().expect("tempdir");
    let storage = FileStorage::open(temp.path()).expect("open storage");
    run(&storage, add("Water plants", None, None), 5);
    let before = storage.get_item(persist::CATEGORIES_KEY).expect("read");

    let shown = run(&storage, edit("5", None, None, Some(" ")), 6);
    assert_eq!(shown, "");
    assert_eq!(storage.get_item(persist::CATEGORIES_KEY).expect("read"), before);
}

#[test]
fn numeric_category_name_selects_by_name() {
    let temp = tempdir().expect("tempdir");
    let storage = FileStorage::open(temp.path()).expect("open storage");

    run(
        &storage,
        Command::Category(CategoryCommand::Add {
            name: vec!["2026".to_string()],
        }),
        1,
    );
    run(&storage, add("Taxes", Some("2026"), None), 10);

    let store = persist::load(&storage);
    assert_eq!(store.categories()[3].name, "2026");
    assert_eq!(store.categories()[3].tasks.len(), 1);
}
