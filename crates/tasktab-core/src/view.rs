use crate::task::Task;

/// Display-ready projection of one category's tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    /// Tasks to render: completed last, active only when `show_all` is off.
    pub tasks: Vec<Task>,
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    pub completion_percentage: u8,
}

impl TaskView {
    pub fn build(tasks: &[Task], show_all: bool) -> Self {
        let mut sorted = tasks.to_vec();
        // Stable sort keeps the user's drag order within each group.
        sorted.sort_by_key(|t| t.completed);

        let total = sorted.len();
        let completed = sorted.iter().filter(|t| t.completed).count();

        if !show_all {
            sorted.retain(|t| !t.completed);
        }

        Self {
            tasks: sorted,
            total,
            completed,
            active: total - completed,
            completion_percentage: completion_percentage(completed, total),
        }
    }

    pub fn progress_label(&self) -> String {
        format!(
            "{}% Completed ({}/{})",
            self.completion_percentage, self.completed, self.total
        )
    }
}

/// `round(completed / total * 100)`, halves rounding up, 0 for an empty list.
pub fn completion_percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total);
    let pct = (completed * 200 + total) / (total * 2);
    pct as u8
}
