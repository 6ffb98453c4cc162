use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::due::due_date_serde;

/// Creation timestamp in milliseconds since the Unix epoch.
pub type TaskId = u64;

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq, Hash)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// CSS colour name used to paint the priority label.
    pub fn color(self) -> &'static str {
        match self {
            Priority::High => "red",
            Priority::Medium => "orange",
            Priority::Low => "green",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "h" | "high" => Ok(Priority::High),
            "m" | "medium" => Ok(Priority::Medium),
            "l" | "low" => Ok(Priority::Low),
            other => Err(anyhow!("unknown priority: {other}")),
        }
    }
}

// Stored snapshots may carry priorities this build does not know about.
impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,

    pub text: String,

    #[serde(default)]
    pub completed: bool,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default, with = "due_date_serde")]
    pub due_date: Option<NaiveDate>,
}

impl Task {
    pub fn new(id: TaskId, text: String, priority: Priority, due_date: Option<NaiveDate>) -> Self {
        Self {
            id,
            text,
            completed: false,
            priority,
            due_date,
        }
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub name: String,

    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: vec![],
        }
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Returns `now_ms` unless a task already holds that id, in which case
    /// the next id past the largest one in this category. When that would
    /// overflow, the lowest unused id is taken instead.
    pub fn next_id(&self, now_ms: TaskId) -> TaskId {
        if self.task(now_ms).is_none() {
            return now_ms;
        }
        let max = self.tasks.iter().map(|t| t.id).max().unwrap_or(now_ms);
        match max.checked_add(1) {
            Some(id) => id,
            None => (0..=TaskId::MAX)
                .find(|id| self.task(*id).is_none())
                .unwrap_or(now_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_serializes_with_camel_case_due_date() {
        let task = Task::new(
            1_700_000_000_000,
            "Buy milk".to_string(),
            Priority::High,
            NaiveDate::from_ymd_opt(2026, 3, 1),
        );
        let json = serde_json::to_value(&task).expect("serialize");
        assert_eq!(json["dueDate"], "2026-03-01");
        assert_eq!(json["priority"], "High");
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn unknown_priority_falls_back_to_medium() {
        let task: Task = serde_json::from_str(
            r#"{"id":1,"text":"x","completed":true,"priority":"Urgent","dueDate":null}"#,
        )
        .expect("deserialize");
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.completed);
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn next_id_bumps_past_collision() {
        let mut category = Category::new("Home");
        category
            .tasks
            .push(Task::new(10, "a".into(), Priority::Low, None));
        category
            .tasks
            .push(Task::new(12, "b".into(), Priority::Low, None));

        assert_eq!(category.next_id(11), 11);
        assert_eq!(category.next_id(10), 13);
    }

    #[test]
    fn next_id_at_max_takes_lowest_free_id() {
        let mut category = Category::new("Home");
        for id in [0, 1, TaskId::MAX] {
            category
                .tasks
                .push(Task::new(id, "x".into(), Priority::Low, None));
        }
        assert_eq!(category.next_id(TaskId::MAX), 2);
    }

    #[test]
    fn overdue_ignores_completed_tasks() {
        let today = NaiveDate::from_ymd_opt(2026, 5, 10).expect("date");
        let mut task = Task::new(1, "late".into(), Priority::Medium, today.pred_opt());
        assert!(task.is_overdue(today));
        task.completed = true;
        assert!(!task.is_overdue(today));
    }

    #[test]
    fn parses_priority_abbreviations() {
        assert_eq!("H".parse::<Priority>().expect("parse"), Priority::High);
        assert_eq!(" low ".parse::<Priority>().expect("parse"), Priority::Low);
        assert!("urgent".parse::<Priority>().is_err());
    }
}
