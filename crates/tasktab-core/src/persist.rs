use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::storage::KeyValueStorage;
use crate::store::{Theme, TaskStore};
use crate::task::Category;

pub const CATEGORIES_KEY: &str = "categories";
pub const THEME_KEY: &str = "theme";

/// Serialized snapshot of the persisted part of a [`TaskStore`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    pub categories: Vec<Category>,
}

// Both the bare array and the wrapped object are accepted on load.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredCategories {
    Bare(Vec<Category>),
    Wrapped(Snapshot),
}

impl Snapshot {
    /// Parses the value stored under [`CATEGORIES_KEY`].
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let stored: StoredCategories =
            serde_json::from_str(raw).context("failed parsing stored categories")?;
        let categories = match stored {
            StoredCategories::Bare(categories) => categories,
            StoredCategories::Wrapped(snapshot) => snapshot.categories,
        };
        Ok(Self { categories })
    }
}

/// Loads the store, falling back to the seeded categories when nothing
/// usable is stored.
///
/// Read failures and malformed JSON are logged, never returned: the widget
/// always starts.
#[tracing::instrument(skip(storage))]
pub fn load<S: KeyValueStorage + ?Sized>(storage: &S) -> TaskStore {
    let theme = load_theme(storage);

    let raw = match storage.get_item(CATEGORIES_KEY) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(error = %format!("{err:#}"), "failed reading categories; using seed");
            None
        }
    };

    let Some(raw) = raw else {
        info!("no stored categories; using seed");
        return TaskStore::seeded(theme);
    };

    match Snapshot::parse(&raw) {
        Ok(snapshot) => {
            debug!(count = snapshot.categories.len(), "loaded categories");
            TaskStore::new(snapshot.categories, theme)
        }
        Err(err) => {
            warn!(error = %format!("{err:#}"), "stored categories malformed; using seed");
            TaskStore::seeded(theme)
        }
    }
}

fn load_theme<S: KeyValueStorage + ?Sized>(storage: &S) -> Theme {
    match storage.get_item(THEME_KEY) {
        Ok(Some(raw)) => raw.parse().unwrap_or_else(|_| {
            debug!(raw = %raw, "unknown stored theme; using default");
            Theme::default()
        }),
        Ok(None) => Theme::default(),
        Err(err) => {
            warn!(error = %format!("{err:#}"), "failed reading theme");
            Theme::default()
        }
    }
}

/// Writes categories and theme under their keys.
#[tracing::instrument(skip(storage, store))]
pub fn save<S: KeyValueStorage + ?Sized>(storage: &S, store: &TaskStore) -> anyhow::Result<()> {
    let json = serde_json::to_string(store.categories()).context("failed serializing categories")?;
    storage
        .set_item(CATEGORIES_KEY, &json)
        .context("failed writing categories")?;
    storage
        .set_item(THEME_KEY, store.theme().storage_value())
        .context("failed writing theme")?;
    debug!(
        categories = store.categories().len(),
        bytes = json.len(),
        theme = %store.theme(),
        "saved store"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::storage::MemoryStorage;
    use crate::store::SEED_CATEGORIES;
    use crate::task::Priority;

    fn names(store: &TaskStore) -> Vec<&str> {
        store.categories().iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn empty_storage_loads_seed() {
        let storage = MemoryStorage::new();
        let store = load(&storage);
        assert_eq!(names(&store), SEED_CATEGORIES.to_vec());
        assert_eq!(store.theme(), Theme::Light);
    }

    #[test]
    fn malformed_categories_load_seed_and_keep_theme() {
        let storage = MemoryStorage::new();
        storage.set_item(CATEGORIES_KEY, "{not json").expect("set");
        storage.set_item(THEME_KEY, "dark").expect("set");
        let store = load(&storage);
        assert_eq!(names(&store), SEED_CATEGORIES.to_vec());
        assert_eq!(store.theme(), Theme::Dark);
    }

    #[test]
    fn stored_empty_array_stays_empty() {
        let storage = MemoryStorage::new();
        storage.set_item(CATEGORIES_KEY, "[]").expect("set");
        assert!(load(&storage).categories().is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let storage = MemoryStorage::new();
        let mut store = TaskStore::seeded(Theme::Light);
        store.toggle_theme();
        let id = store
            .add_task("Pay rent", Priority::High, NaiveDate::from_ymd_opt(2026, 11, 1), 99)
            .expect("added");
        store.toggle_complete(id);

        save(&storage, &store).expect("save");
        let loaded = load(&storage);

        assert_eq!(loaded.categories(), store.categories());
        assert_eq!(loaded.theme(), Theme::Dark);
    }

    #[test]
    fn reads_browser_snapshot_format() {
        let storage = MemoryStorage::new();
        storage
            .set_item(
                CATEGORIES_KEY,
                r#"[{"name":"Home Tasks","tasks":[
                    {"id":1729300000000,"text":"Dishes","completed":false,"priority":"Low","dueDate":""},
                    {"id":1729300000001,"text":"Bins","completed":true,"priority":"High","dueDate":"2024-10-20"}
                ]}]"#,
            )
            .expect("set");

        let store = load(&storage);
        let tasks = &store.categories()[0].tasks;
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].due_date, None);
        assert_eq!(tasks[1].due_date, NaiveDate::from_ymd_opt(2024, 10, 20));
        assert!(tasks[1].completed);
    }

    #[test]
    fn accepts_wrapped_snapshot() {
        let snapshot = Snapshot::parse(r#"{"categories":[{"name":"Work","tasks":[]}]}"#)
            .expect("parse wrapped");
        assert_eq!(snapshot.categories.len(), 1);
        assert_eq!(snapshot.categories[0].name, "Work");
    }
}
