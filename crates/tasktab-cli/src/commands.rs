use std::io::Write;

use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use tasktab_core::due::parse_due_expr;
use tasktab_core::{KeyValueStorage, Priority, TaskId, TaskStore, TaskView, Theme, persist};
use tracing::{debug, info, warn};

use crate::cli::{CategoryCommand, Command};
use crate::config::Config;
use crate::render::Renderer;

/// Clock readings for one invocation.
#[derive(Debug, Clone, Copy)]
pub struct Now {
    pub today: NaiveDate,
    pub millis: TaskId,
}

#[tracing::instrument(skip(storage, cfg, renderer, out))]
pub fn dispatch<S, W>(
    storage: &S,
    cfg: &Config,
    renderer: &Renderer,
    out: &mut W,
    command: Command,
    now: Now,
) -> anyhow::Result<()>
where
    S: KeyValueStorage + ?Sized,
    W: Write,
{
    let mut store = persist::load(storage);

    let changed = match command {
        Command::Categories => {
            renderer.print_categories(out, store.categories())?;
            false
        }
        Command::Category(sub) => category_command(&mut store, out, sub)?,
        Command::List { category, active } => {
            select(&mut store, category.as_deref())?;
            store.set_show_all(!active);
            let name = store
                .selected_category()
                .map(|c| c.name.clone())
                .unwrap_or_default();
            renderer.print_task_view(out, &name, &store.view(), now.today)?;
            false
        }
        Command::Add {
            category,
            priority,
            due,
            text,
        } => {
            select(&mut store, category.as_deref())?;
            let priority = match priority {
                Some(raw) => raw.parse::<Priority>()?,
                None => cfg.default_priority,
            };
            let due_date = match due {
                Some(raw) => parse_due_expr(&raw, now.today)?,
                None => None,
            };
            match store.add_task(&text.join(" "), priority, due_date, now.millis) {
                Some(id) => {
                    writeln!(out, "Added task {id}.")?;
                    true
                }
                None => {
                    warn!("task text is blank; nothing added");
                    false
                }
            }
        }
        Command::Done { category, task } => {
            select(&mut store, category.as_deref())?;
            let id = resolve_task(&store, &task)?;
            let changed = store.toggle_complete(id);
            if changed {
                let completed = store
                    .selected_category()
                    .and_then(|c| c.task(id))
                    .is_some_and(|t| t.completed);
                let state = if completed { "completed" } else { "active" };
                writeln!(out, "Task {id} is now {state}.")?;
            }
            changed
        }
        Command::Delete { category, task } => {
            select(&mut store, category.as_deref())?;
            let id = resolve_task(&store, &task)?;
            let changed = store.delete_task(id);
            if changed {
                writeln!(out, "Deleted task {id}.")?;
            }
            changed
        }
        Command::Edit {
            category,
            task,
            priority,
            due,
            text,
        } => {
            select(&mut store, category.as_deref())?;
            let id = resolve_task(&store, &task)?;
            edit_command(&mut store, out, id, priority, due, text, now.today)?
        }
        Command::Move { category, from, to } => {
            select(&mut store, category.as_deref())?;
            let changed = store.reorder(from, to);
            if changed {
                writeln!(out, "Moved task from {from} to {to}.")?;
            } else {
                warn!(from, to, "positions out of range or equal; nothing moved");
            }
            changed
        }
        Command::Theme { value } => theme_command(&mut store, out, value.as_deref())?,
    };

    if changed {
        persist::save(storage, &store).context("failed saving store")?;
        info!("store saved");
    } else {
        debug!("store unchanged");
    }

    Ok(())
}

fn category_command<W: Write>(
    store: &mut TaskStore,
    out: &mut W,
    sub: CategoryCommand,
) -> anyhow::Result<bool> {
    match sub {
        CategoryCommand::Add { name } => {
            let name = name.join(" ");
            if !store.add_category(&name) {
                warn!("category name is blank; nothing added");
                return Ok(false);
            }
            writeln!(out, "Added category {}.", name.trim())?;
            Ok(true)
        }
        CategoryCommand::Rename { selector, name } => {
            let index = find_category(store, &selector)?;
            let name = name.join(" ");
            if !store.rename_category(index, &name) {
                warn!("category name is blank; nothing renamed");
                return Ok(false);
            }
            writeln!(out, "Renamed category {index} to {}.", name.trim())?;
            Ok(true)
        }
        CategoryCommand::Remove { selector } => {
            let index = find_category(store, &selector)?;
            let name = store.categories()[index].name.clone();
            let changed = store.remove_category(index);
            if changed {
                writeln!(out, "Removed category {name}.")?;
            }
            Ok(changed)
        }
    }
}

fn edit_command<W: Write>(
    store: &mut TaskStore,
    out: &mut W,
    id: TaskId,
    priority: Option<String>,
    due: Option<String>,
    text: Option<String>,
    today: NaiveDate,
) -> anyhow::Result<bool> {
    if priority.is_none() && due.is_none() && text.is_none() {
        return Err(anyhow!("nothing to edit: pass --priority, --due or --text"));
    }

    let current = store
        .selected_category()
        .and_then(|c| c.task(id))
        .cloned()
        .ok_or_else(|| anyhow!("no task {id}"))?;

    let mut changed = false;
    if priority.is_some() || due.is_some() {
        let priority = match priority {
            Some(raw) => raw.parse::<Priority>()?,
            None => current.priority,
        };
        let due_date = match due {
            Some(raw) => parse_due_expr(&raw, today)?,
            None => current.due_date,
        };
        changed |= store.edit_task(id, priority, due_date);
    }
    if let Some(text) = text {
        if store.edit_text(id, &text) {
            changed = true;
        } else {
            warn!("task text is blank; text left unchanged");
        }
    }

    if changed {
        writeln!(out, "Edited task {id}.")?;
    }
    Ok(changed)
}

fn theme_command<W: Write>(
    store: &mut TaskStore,
    out: &mut W,
    value: Option<&str>,
) -> anyhow::Result<bool> {
    let changed = match value {
        None => false,
        Some("toggle") => {
            store.toggle_theme();
            true
        }
        Some(raw) => store.set_theme(raw.parse::<Theme>()?),
    };
    writeln!(out, "{}", store.theme())?;
    Ok(changed)
}

fn find_category(store: &TaskStore, selector: &str) -> anyhow::Result<usize> {
    store
        .find_category(selector)
        .ok_or_else(|| anyhow!("no category matches {selector:?}"))
}

/// Selects the category named by `selector`, or the first one.
fn select(store: &mut TaskStore, selector: Option<&str>) -> anyhow::Result<()> {
    let Some(selector) = selector else {
        return Ok(());
    };
    let index = find_category(store, selector)?;
    store.select(index);
    Ok(())
}

/// Resolves a task id, or a 1-based row number of the full listing.
fn resolve_task(store: &TaskStore, token: &str) -> anyhow::Result<TaskId> {
    let category = store
        .selected_category()
        .ok_or_else(|| anyhow!("there are no categories"))?;
    let value: u64 = token
        .trim()
        .parse()
        .with_context(|| format!("invalid task reference: {token}"))?;

    if category.task(value).is_some() {
        return Ok(value);
    }

    let listing = TaskView::build(&category.tasks, true);
    usize::try_from(value)
        .ok()
        .and_then(|row| row.checked_sub(1))
        .and_then(|row| listing.tasks.get(row))
        .map(|task| task.id)
        .ok_or_else(|| anyhow!("no task {token} in {}", category.name))
}
