use chrono::NaiveDate;
use tasktab_core::persist;
use tasktab_core::{KeyValueStorage, MemoryStorage, Priority, Theme};

#[test]
fn session_edits_survive_reload() {
    let storage = MemoryStorage::new();

    let mut store = persist::load(&storage);
    assert_eq!(store.categories().len(), 3);

    assert!(store.add_category("Errands"));
    assert!(store.select(3));
    let due = NaiveDate::from_ymd_opt(2026, 10, 24);
    let groceries = store
        .add_task("Groceries", Priority::High, due, 1_760_000_000_000)
        .expect("add groceries");
    let post = store
        .add_task("Post office", Priority::Low, None, 1_760_000_000_500)
        .expect("add post office");
    assert!(store.toggle_complete(groceries));
    assert!(store.reorder_by_id(post, groceries));
    store.toggle_theme();
    persist::save(&storage, &store).expect("save");

    let mut reloaded = persist::load(&storage);
    assert_eq!(reloaded.theme(), Theme::Dark);
    assert_eq!(reloaded.selected_index(), 0);
    assert!(reloaded.select(3));

    let view = reloaded.view();
    assert_eq!(view.total, 2);
    assert_eq!(view.completion_percentage, 50);
    assert_eq!(view.tasks[0].text, "Post office");
    assert_eq!(view.tasks[1].due_date, due);

    let raw = storage
        .get_item(persist::CATEGORIES_KEY)
        .expect("read")
        .expect("categories stored");
    assert!(raw.contains("\"dueDate\":\"2026-10-24\""));
    assert_eq!(
        storage.get_item(persist::THEME_KEY).expect("read").as_deref(),
        Some("dark")
    );
}

#[test]
fn deleting_all_categories_then_adding_task_recovers() {
    let storage = MemoryStorage::new();
    let mut store = persist::load(&storage);
    while store.remove_category(0) {}

    persist::save(&storage, &store).expect("save");
    let mut store = persist::load(&storage);
    assert!(store.categories().is_empty());

    store
        .add_task("Start over", Priority::Medium, None, 1)
        .expect("add");
    assert_eq!(store.categories()[0].name, "General Tasks");
}
