use chrono::NaiveDate;
use tasktab_core::{
  Priority,
  TaskId,
  TaskStore,
  Theme,
  persist
};
use yew::{
  Callback,
  Html,
  TargetCast,
  UseStateHandle,
  function_component,
  html,
  use_state
};

use crate::components::{
  CategoryTabs,
  PrioritySelect,
  ProgressBar,
  TaskList,
  parse_date_input
};
use crate::storage::LocalStorage;

/// Applies `change` to a copy of the
/// store and publishes it. The copy is
/// written to local storage when
/// `change` reports a persisted
/// mutation.
fn commit(
  store: &UseStateHandle<TaskStore>,
  change: impl FnOnce(&mut TaskStore) -> bool
) {
  let mut next = (**store).clone();
  if change(&mut next) {
    save_store(&next);
  }
  store.set(next);
}

fn save_store(store: &TaskStore) {
  if let Err(error) =
    persist::save(&LocalStorage, store)
  {
    tracing::error!(
      error = %format!("{error:#}"),
      "failed saving store to local \
       storage"
    );
  }
}

fn now_millis() -> TaskId {
  js_sys::Date::now() as TaskId
}

fn today() -> NaiveDate {
  let now = js_sys::Date::new_0();
  NaiveDate::from_ymd_opt(
    now.get_full_year() as i32,
    now.get_month() + 1,
    now.get_date()
  )
  .unwrap_or_default()
}

fn theme_toggle_label(
  theme: Theme
) -> &'static str {
  match theme {
    | Theme::Light => "Dark Mode",
    | Theme::Dark => "Light Mode"
  }
}

#[function_component(App)]
pub fn app() -> Html {
  let store = use_state(|| {
    persist::load(&LocalStorage)
  });
  let new_category =
    use_state(String::new);
  let new_task = use_state(String::new);
  let task_priority =
    use_state(Priority::default);
  let task_due =
    use_state(|| None::<NaiveDate>);
  let dragging =
    use_state(|| None::<TaskId>);

  let on_toggle_theme = {
    let store = store.clone();
    Callback::from(move |_| {
      commit(&store, |s| {
        s.toggle_theme();
        true
      })
    })
  };

  let on_new_category_input = {
    let new_category =
      new_category.clone();
    Callback::from(
      move |e: web_sys::InputEvent| {
        let input: web_sys::HtmlInputElement =
          e.target_unchecked_into();
        new_category.set(input.value());
      }
    )
  };

  let on_add_category = {
    let store = store.clone();
    let new_category =
      new_category.clone();
    Callback::from(move |_| {
      let name = (*new_category).clone();
      let mut added = false;
      commit(&store, |s| {
        added = s.add_category(&name);
        added
      });
      if added {
        new_category.set(String::new());
      }
    })
  };

  let on_select_category = {
    let store = store.clone();
    Callback::from(move |index: usize| {
      commit(&store, |s| {
        s.select(index);
        false
      })
    })
  };

  let on_start_rename = {
    let store = store.clone();
    Callback::from(move |index: usize| {
      commit(&store, |s| {
        s.start_rename(index);
        false
      })
    })
  };

  let on_rename_input = {
    let store = store.clone();
    Callback::from(move |name: String| {
      commit(&store, |s| {
        s.set_rename_draft(name);
        false
      })
    })
  };

  let on_save_rename = {
    let store = store.clone();
    Callback::from(move |()| {
      commit(&store, TaskStore::save_rename)
    })
  };

  let on_cancel_rename = {
    let store = store.clone();
    Callback::from(move |()| {
      commit(&store, |s| {
        s.cancel_rename();
        false
      })
    })
  };

  let on_remove_category = {
    let store = store.clone();
    Callback::from(move |index: usize| {
      commit(&store, |s| {
        s.remove_category(index)
      })
    })
  };

  let on_new_task_input = {
    let new_task = new_task.clone();
    Callback::from(
      move |e: web_sys::InputEvent| {
        let input: web_sys::HtmlInputElement =
          e.target_unchecked_into();
        new_task.set(input.value());
      }
    )
  };

  let on_task_priority = {
    let task_priority =
      task_priority.clone();
    Callback::from(
      move |priority: Priority| {
        task_priority.set(priority)
      }
    )
  };

  let on_task_due = {
    let task_due = task_due.clone();
    Callback::from(
      move |e: web_sys::Event| {
        let input: web_sys::HtmlInputElement =
          e.target_unchecked_into();
        task_due.set(parse_date_input(
          &input.value()
        ));
      }
    )
  };

  let on_add_task = {
    let store = store.clone();
    let new_task = new_task.clone();
    let task_priority =
      task_priority.clone();
    let task_due = task_due.clone();
    Callback::from(move |_| {
      let text = (*new_task).clone();
      let mut added = None;
      commit(&store, |s| {
        added = s.add_task(
          &text,
          *task_priority,
          *task_due,
          now_millis()
        );
        added.is_some()
      });
      if added.is_some() {
        new_task.set(String::new());
        task_priority
          .set(Priority::default());
        task_due.set(None);
      }
    })
  };

  let on_toggle_show_all = {
    let store = store.clone();
    Callback::from(move |_| {
      commit(&store, |s| {
        s.toggle_show_all();
        false
      })
    })
  };

  let on_toggle_task = {
    let store = store.clone();
    Callback::from(move |id: TaskId| {
      commit(&store, |s| {
        s.toggle_complete(id)
      })
    })
  };

  let on_delete_task = {
    let store = store.clone();
    Callback::from(move |id: TaskId| {
      commit(&store, |s| s.delete_task(id))
    })
  };

  let on_start_edit = {
    let store = store.clone();
    Callback::from(move |id: TaskId| {
      commit(&store, |s| {
        s.start_edit(id);
        false
      })
    })
  };

  let on_edit_priority = {
    let store = store.clone();
    Callback::from(
      move |priority: Priority| {
        commit(&store, |s| {
          s.set_edit_priority(priority);
          false
        })
      }
    )
  };

  let on_edit_due = {
    let store = store.clone();
    Callback::from(
      move |due: Option<NaiveDate>| {
        commit(&store, |s| {
          s.set_edit_due_date(due);
          false
        })
      }
    )
  };

  let on_save_edit = {
    let store = store.clone();
    Callback::from(move |()| {
      commit(&store, TaskStore::save_edit)
    })
  };

  let on_cancel_edit = {
    let store = store.clone();
    Callback::from(move |()| {
      commit(&store, |s| {
        s.cancel_edit();
        false
      })
    })
  };

  let on_drag_start = {
    let dragging = dragging.clone();
    Callback::from(move |id: TaskId| {
      dragging.set(Some(id))
    })
  };

  let on_drag_end = {
    let dragging = dragging.clone();
    Callback::from(move |()| {
      dragging.set(None)
    })
  };

  let on_drop = {
    let store = store.clone();
    let dragging = dragging.clone();
    Callback::from(move |over: TaskId| {
      if let Some(active) = *dragging {
        commit(&store, |s| {
          s.reorder_by_id(active, over)
        });
      }
      dragging.set(None);
    })
  };

  let view = store.view();
  let heading = store
    .selected_category()
    .map(|category| category.name.clone())
    .unwrap_or_default();
  let theme = store.theme();
  let show_all_label = if store.show_all()
  {
    "Show Only Active"
  } else {
    "Show All Tasks"
  };

  html! {
      <div class={format!("app {}", theme.storage_value())}>
          <h1>{ "To-Do List" }</h1>
          <button class="theme-toggle" onclick={on_toggle_theme}>
              { theme_toggle_label(theme) }
          </button>

          <div class="category-management">
              <input
                  type="text"
                  value={(*new_category).clone()}
                  oninput={on_new_category_input}
                  placeholder="Add new category..."
              />
              <button onclick={on_add_category}>{ "Add" }</button>
          </div>

          <CategoryTabs
              categories={store.categories().to_vec()}
              selected={store.selected_index()}
              renaming={store.renaming().cloned()}
              on_select={on_select_category}
              on_start_rename={on_start_rename}
              on_rename_input={on_rename_input}
              on_save_rename={on_save_rename}
              on_cancel_rename={on_cancel_rename}
              on_remove={on_remove_category}
          />

          <div class="task-section">
              <h2>{ heading }</h2>
              <ProgressBar
                  percentage={view.completion_percentage}
                  label={view.progress_label()}
              />
              <div class="input-container">
                  <input
                      type="text"
                      value={(*new_task).clone()}
                      oninput={on_new_task_input}
                      placeholder="Add a new task..."
                  />
                  <PrioritySelect value={*task_priority} on_change={on_task_priority} />
                  <input
                      type="date"
                      value={(*task_due).map(|date| date.to_string()).unwrap_or_default()}
                      onchange={on_task_due}
                  />
                  <button onclick={on_add_task}>{ "Add" }</button>
              </div>

              <button class="toggle-btn" onclick={on_toggle_show_all}>
                  { show_all_label }
              </button>

              <TaskList
                  tasks={view.tasks}
                  today={today()}
                  editing={store.editing().cloned()}
                  dragging={*dragging}
                  on_toggle={on_toggle_task}
                  on_delete={on_delete_task}
                  on_start_edit={on_start_edit}
                  on_edit_priority={on_edit_priority}
                  on_edit_due={on_edit_due}
                  on_save_edit={on_save_edit}
                  on_cancel_edit={on_cancel_edit}
                  on_drag_start={on_drag_start}
                  on_drag_end={on_drag_end}
                  on_drop={on_drop}
              />
          </div>
      </div>
  }
}
