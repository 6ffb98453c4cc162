use std::io::{self, IsTerminal, Write};

use chrono::NaiveDate;
use tasktab_core::due::due_label;
use tasktab_core::{Category, Priority, TaskView};
use unicode_width::UnicodeWidthStr;

use crate::config::Config;

const PROGRESS_WIDTH: usize = 20;
const COLUMN_GAP: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
struct Column {
    title: &'static str,
    align: Align,
}

const fn column(title: &'static str, align: Align) -> Column {
    Column { title, align }
}

const CATEGORY_COLUMNS: [Column; 4] = [
    column("#", Align::Right),
    column("Category", Align::Left),
    column("Tasks", Align::Right),
    column("Done", Align::Right),
];

const TASK_COLUMNS: [Column; 6] = [
    column("#", Align::Right),
    column("ID", Align::Right),
    column("Done", Align::Left),
    column("Priority", Align::Left),
    column("Due", Align::Left),
    column("Task", Align::Left),
];

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    /// Colour is used only when enabled in config and stdout is a terminal.
    pub fn new(cfg: &Config) -> Self {
        Self {
            color: cfg.color && io::stdout().is_terminal(),
        }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    #[tracing::instrument(skip(self, out, categories))]
    pub fn print_categories<W: Write>(&self, out: &mut W, categories: &[Category]) -> anyhow::Result<()> {
        if categories.is_empty() {
            writeln!(out, "No categories.")?;
            return Ok(());
        }

        let rows: Vec<Vec<String>> = categories
            .iter()
            .enumerate()
            .map(|(idx, category)| {
                let view = TaskView::build(&category.tasks, true);
                vec![
                    self.paint(&idx.to_string(), "33"),
                    category.name.clone(),
                    view.total.to_string(),
                    format!("{}%", view.completion_percentage),
                ]
            })
            .collect();

        write_table(out, &CATEGORY_COLUMNS, &rows)
    }

    #[tracing::instrument(skip(self, out, view, today))]
    pub fn print_task_view<W: Write>(
        &self,
        out: &mut W,
        name: &str,
        view: &TaskView,
        today: NaiveDate,
    ) -> anyhow::Result<()> {
        writeln!(out, "{}", self.paint(name, "1"))?;
        writeln!(
            out,
            "{} {}",
            progress_bar(view.completion_percentage),
            view.progress_label()
        )?;
        writeln!(out)?;

        if view.tasks.is_empty() {
            writeln!(out, "No tasks.")?;
            return Ok(());
        }

        let rows: Vec<Vec<String>> = view
            .tasks
            .iter()
            .enumerate()
            .map(|(idx, task)| {
                let due = due_label(task.due_date);
                let due = if task.is_overdue(today) {
                    self.paint(&due, "31")
                } else {
                    due
                };
                let text = if task.completed {
                    self.paint(&task.text, "2")
                } else {
                    task.text.clone()
                };

                vec![
                    self.paint(&(idx + 1).to_string(), "33"),
                    task.id.to_string(),
                    if task.completed { "[x]" } else { "[ ]" }.to_string(),
                    self.paint(task.priority.as_str(), priority_code(task.priority)),
                    due,
                    text,
                ]
            })
            .collect();

        write_table(out, &TASK_COLUMNS, &rows)
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn priority_code(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "31",
        Priority::Medium => "33",
        Priority::Low => "32",
    }
}

pub fn progress_bar(percentage: u8) -> String {
    let filled = (usize::from(percentage.min(100)) * PROGRESS_WIDTH + 50) / 100;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(PROGRESS_WIDTH - filled)
    )
}

fn write_table<W: Write>(out: &mut W, columns: &[Column], rows: &[Vec<String>]) -> anyhow::Result<()> {
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            rows.iter()
                .filter_map(|row| row.get(idx))
                .map(|cell| visible_width(cell))
                .fold(UnicodeWidthStr::width(col.title), usize::max)
        })
        .collect();

    let titles: Vec<String> = columns.iter().map(|col| col.title.to_string()).collect();
    write_row(out, columns, &widths, &titles)?;
    let rules: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    write_row(out, columns, &widths, &rules)?;
    for row in rows {
        write_row(out, columns, &widths, row)?;
    }
    Ok(())
}

fn write_row<W: Write>(
    out: &mut W,
    columns: &[Column],
    widths: &[usize],
    cells: &[String],
) -> anyhow::Result<()> {
    let line = columns
        .iter()
        .zip(widths)
        .zip(cells)
        .map(|((col, width), cell)| {
            let pad = " ".repeat(width.saturating_sub(visible_width(cell)));
            match col.align {
                Align::Left => format!("{cell}{pad}"),
                Align::Right => format!("{pad}{cell}"),
            }
        })
        .collect::<Vec<_>>()
        .join(COLUMN_GAP);
    writeln!(out, "{}", line.trim_end())?;
    Ok(())
}

/// Display width of a cell, not counting SGR colour sequences.
fn visible_width(cell: &str) -> usize {
    let mut segments = cell.split('\x1b');
    let lead = segments.next().unwrap_or_default();
    segments
        .map(|seg| seg.split_once('m').map_or("", |(_, text)| text))
        .map(UnicodeWidthStr::width)
        .sum::<usize>()
        + UnicodeWidthStr::width(lead)
}

#[cfg(test)]
mod tests {
    use tasktab_core::{Priority, Task};

    use super::*;

    #[test]
    fn progress_bar_scales_to_width() {
        assert_eq!(progress_bar(0), format!("[{}]", "-".repeat(20)));
        assert_eq!(progress_bar(50), format!("[{}{}]", "#".repeat(10), "-".repeat(10)));
        assert_eq!(progress_bar(100), format!("[{}]", "#".repeat(20)));
    }

    #[test]
    fn colour_codes_take_no_width() {
        assert_eq!(visible_width("\x1b[31mHigh\x1b[0m"), 4);
        assert_eq!(visible_width("plain"), 5);
    }

    #[test]
    fn numeric_columns_align_right() {
        let rows = vec![
            vec!["0".to_string(), "Home".to_string(), "12".to_string(), "50%".to_string()],
            vec!["1".to_string(), "School".to_string(), "3".to_string(), "100%".to_string()],
        ];
        let mut out = Vec::new();
        write_table(&mut out, &CATEGORY_COLUMNS, &rows).expect("table");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "#  Category  Tasks  Done");
        assert_eq!(lines[2], "0  Home         12   50%");
        assert_eq!(lines[3], "1  School        3  100%");
    }

    #[test]
    fn task_view_lists_completed_last() {
        let mut done = Task::new(1, "Bins".into(), Priority::High, None);
        done.completed = true;
        let open = Task::new(2, "Dishes".into(), Priority::Low, NaiveDate::from_ymd_opt(2026, 1, 1));
        let view = TaskView::build(&[done, open], true);

        let mut out = Vec::new();
        Renderer::plain()
            .print_task_view(
                &mut out,
                "Home Tasks",
                &view,
                NaiveDate::from_ymd_opt(2026, 10, 19).expect("date"),
            )
            .expect("render");
        let text = String::from_utf8(out).expect("utf8");

        assert!(text.starts_with("Home Tasks\n"));
        assert!(text.contains("50% Completed (1/2)"));
        let dishes = text.find("Dishes").expect("dishes row");
        let bins = text.find("Bins").expect("bins row");
        assert!(dishes < bins);
        assert!(text.contains("No due date"));
    }

    #[test]
    fn empty_category_list() {
        let mut out = Vec::new();
        Renderer::plain()
            .print_categories(&mut out, &[])
            .expect("render");
        assert_eq!(String::from_utf8(out).expect("utf8"), "No categories.\n");
    }
}
