use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::task::{Category, Priority, Task, TaskId};
use crate::view::TaskView;

pub const FALLBACK_CATEGORY: &str = "General Tasks";

pub const SEED_CATEGORIES: [&str; 3] = ["Home Tasks", "School Tasks", "Projects"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn storage_value(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.storage_value())
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(anyhow!("unknown theme: {other}")),
        }
    }
}

/// Draft values for a task in edit mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEdit {
    pub id: TaskId,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
}

/// Draft name for a category being renamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRename {
    pub index: usize,
    pub name: String,
}

/// The whole widget state: persisted categories and theme plus the
/// transient selection and edit modes.
///
/// Every mutation returns whether anything changed; callers persist the
/// store after a `true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStore {
    categories: Vec<Category>,
    selected: usize,
    theme: Theme,
    show_all: bool,
    editing: Option<TaskEdit>,
    renaming: Option<CategoryRename>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new(vec![], Theme::default())
    }
}

impl TaskStore {
    pub fn new(categories: Vec<Category>, theme: Theme) -> Self {
        Self {
            categories,
            selected: 0,
            theme,
            show_all: true,
            editing: None,
            renaming: None,
        }
    }

    /// Store holding the three starter categories.
    pub fn seeded(theme: Theme) -> Self {
        Self::new(seed_categories(), theme)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.categories.get(self.selected)
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) -> bool {
        if self.theme == theme {
            return false;
        }
        self.theme = theme;
        true
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        debug!(theme = %self.theme, "toggled theme");
    }

    pub fn show_all(&self) -> bool {
        self.show_all
    }

    pub fn set_show_all(&mut self, show_all: bool) {
        self.show_all = show_all;
    }

    pub fn toggle_show_all(&mut self) {
        self.show_all = !self.show_all;
    }

    pub fn editing(&self) -> Option<&TaskEdit> {
        self.editing.as_ref()
    }

    pub fn renaming(&self) -> Option<&CategoryRename> {
        self.renaming.as_ref()
    }

    /// Derived presentation of the selected category.
    pub fn view(&self) -> TaskView {
        match self.selected_category() {
            Some(category) => TaskView::build(&category.tasks, self.show_all),
            None => TaskView::build(&[], self.show_all),
        }
    }

    /// Resolves a 0-based index or a case-insensitive category name.
    pub fn find_category(&self, selector: &str) -> Option<usize> {
        let selector = selector.trim();
        if let Ok(index) = selector.parse::<usize>()
            && index < self.categories.len()
        {
            return Some(index);
        }
        self.categories
            .iter()
            .position(|c| c.name.trim().eq_ignore_ascii_case(selector))
    }

    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.categories.len() {
            return false;
        }
        if index != self.selected {
            self.editing = None;
        }
        self.selected = index;
        true
    }

    #[tracing::instrument(skip(self))]
    pub fn add_category(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            debug!("ignoring blank category name");
            return false;
        }
        self.categories.push(Category::new(name));
        info!(name, count = self.categories.len(), "added category");
        true
    }

    #[tracing::instrument(skip(self))]
    pub fn rename_category(&mut self, index: usize, name: &str) -> bool {
        self.renaming = None;
        let name = name.trim();
        let Some(category) = self.categories.get_mut(index) else {
            return false;
        };
        if name.is_empty() {
            debug!("ignoring blank category rename");
            return false;
        }
        category.name = name.to_string();
        info!(index, name, "renamed category");
        true
    }

    pub fn start_rename(&mut self, index: usize) -> bool {
        let Some(category) = self.categories.get(index) else {
            return false;
        };
        self.renaming = Some(CategoryRename {
            index,
            name: category.name.clone(),
        });
        true
    }

    pub fn set_rename_draft(&mut self, name: impl Into<String>) {
        if let Some(draft) = self.renaming.as_mut() {
            draft.name = name.into();
        }
    }

    pub fn cancel_rename(&mut self) {
        self.renaming = None;
    }

    /// Applies the rename draft, if any.
    pub fn save_rename(&mut self) -> bool {
        let Some(draft) = self.renaming.clone() else {
            return false;
        };
        self.rename_category(draft.index, &draft.name)
    }

    #[tracing::instrument(skip(self))]
    pub fn remove_category(&mut self, index: usize) -> bool {
        if index >= self.categories.len() {
            return false;
        }
        let removed = self.categories.remove(index);

        if self.selected >= self.categories.len() {
            self.selected = 0;
        }
        // Indexes shift on removal, so pending edits no longer point at the
        // same category.
        self.editing = None;
        self.renaming = None;

        info!(
            name = %removed.name,
            tasks = removed.tasks.len(),
            selected = self.selected,
            "removed category"
        );
        true
    }

    /// Appends a task to the selected category and returns its id.
    ///
    /// With no categories at all, a "General Tasks" category is created
    /// and selected first.
    #[tracing::instrument(skip(self, text))]
    pub fn add_task(
        &mut self,
        text: &str,
        priority: Priority,
        due_date: Option<NaiveDate>,
        now_ms: TaskId,
    ) -> Option<TaskId> {
        let text = text.trim();
        if text.is_empty() {
            debug!("ignoring blank task text");
            return None;
        }

        if self.categories.is_empty() {
            self.categories.push(Category::new(FALLBACK_CATEGORY));
            self.selected = 0;
            info!("created fallback category");
        }
        if self.selected >= self.categories.len() {
            self.selected = 0;
        }

        let category = &mut self.categories[self.selected];
        let id = category.next_id(now_ms);
        category
            .tasks
            .push(Task::new(id, text.to_string(), priority, due_date));

        info!(id, category = %category.name, "added task");
        Some(id)
    }

    #[tracing::instrument(skip(self))]
    pub fn toggle_complete(&mut self, id: TaskId) -> bool {
        let Some(task) = self.selected_task_mut(id) else {
            return false;
        };
        task.completed = !task.completed;
        let completed = task.completed;
        if completed && self.editing.as_ref().is_some_and(|e| e.id == id) {
            self.editing = None;
        }
        debug!(id, completed, "toggled task");
        true
    }

    #[tracing::instrument(skip(self))]
    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let Some(category) = self.categories.get_mut(self.selected) else {
            return false;
        };
        let before = category.tasks.len();
        category.tasks.retain(|t| t.id != id);
        if category.tasks.len() == before {
            return false;
        }
        if self.editing.as_ref().is_some_and(|e| e.id == id) {
            self.editing = None;
        }
        info!(id, "deleted task");
        true
    }

    /// Puts an active task into edit mode with drafts taken from the task.
    pub fn start_edit(&mut self, id: TaskId) -> bool {
        let Some(task) = self.selected_category().and_then(|c| c.task(id)) else {
            return false;
        };
        if task.completed {
            return false;
        }
        self.editing = Some(TaskEdit {
            id,
            priority: task.priority,
            due_date: task.due_date,
        });
        true
    }

    pub fn set_edit_priority(&mut self, priority: Priority) {
        if let Some(draft) = self.editing.as_mut() {
            draft.priority = priority;
        }
    }

    pub fn set_edit_due_date(&mut self, due_date: Option<NaiveDate>) {
        if let Some(draft) = self.editing.as_mut() {
            draft.due_date = due_date;
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Applies the edit drafts, if any.
    pub fn save_edit(&mut self) -> bool {
        let Some(draft) = self.editing.take() else {
            return false;
        };
        self.edit_task(draft.id, draft.priority, draft.due_date)
    }

    #[tracing::instrument(skip(self))]
    pub fn edit_task(
        &mut self,
        id: TaskId,
        priority: Priority,
        due_date: Option<NaiveDate>,
    ) -> bool {
        let Some(task) = self.selected_task_mut(id) else {
            return false;
        };
        task.priority = priority;
        task.due_date = due_date;
        self.editing = None;
        debug!(id, "edited task");
        true
    }

    #[tracing::instrument(skip(self, text))]
    pub fn edit_text(&mut self, id: TaskId, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let Some(task) = self.selected_task_mut(id) else {
            return false;
        };
        task.text = text.to_string();
        true
    }

    /// Moves the task at `old_index` to `new_index` in the selected
    /// category, shifting the tasks in between.
    #[tracing::instrument(skip(self))]
    pub fn reorder(&mut self, old_index: usize, new_index: usize) -> bool {
        let Some(category) = self.categories.get_mut(self.selected) else {
            return false;
        };
        let moved = move_item(&mut category.tasks, old_index, new_index);
        if moved {
            debug!(old_index, new_index, "reordered task");
        }
        moved
    }

    /// Drag-drop form of [`TaskStore::reorder`]: the dragged task takes the
    /// position of the task it was dropped on.
    pub fn reorder_by_id(&mut self, active: TaskId, over: TaskId) -> bool {
        if active == over {
            return false;
        }
        let Some(category) = self.selected_category() else {
            return false;
        };
        let (Some(old_index), Some(new_index)) = (category.position(active), category.position(over))
        else {
            return false;
        };
        self.reorder(old_index, new_index)
    }

    fn selected_task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.categories
            .get_mut(self.selected)?
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
    }
}

pub fn seed_categories() -> Vec<Category> {
    SEED_CATEGORIES.iter().map(|name| Category::new(*name)).collect()
}

/// Removes the item at `from` and inserts it at `to`.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from == to || from >= items.len() || to >= items.len() {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}
