use chrono::NaiveDate;
use tasktab_core::due::{
  DUE_DATE_FORMAT,
  due_label
};
use tasktab_core::{
  Priority,
  Task,
  TaskEdit,
  TaskId
};
use web_sys::DragEvent;
use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  classes,
  function_component,
  html
};

use super::PrioritySelect;

#[derive(Properties, PartialEq)]
pub struct TaskRowProps {
  pub task:             Task,
  pub editing:          Option<TaskEdit>,
  pub is_dragging:      bool,
  pub overdue:          bool,
  pub on_toggle:        Callback<TaskId>,
  pub on_delete:        Callback<TaskId>,
  pub on_start_edit:    Callback<TaskId>,
  pub on_edit_priority:
    Callback<Priority>,
  pub on_edit_due:
    Callback<Option<NaiveDate>>,
  pub on_save_edit:     Callback<()>,
  pub on_cancel_edit:   Callback<()>,
  pub on_drag_start:    Callback<TaskId>,
  pub on_drag_end:      Callback<()>,
  pub on_drop:          Callback<TaskId>
}

#[function_component(TaskRow)]
pub fn task_row(
  props: &TaskRowProps
) -> Html {
  let task = &props.task;
  let task_id = task.id;

  let ondragstart = {
    let on_drag_start =
      props.on_drag_start.clone();
    Callback::from(
      move |event: DragEvent| {
        if let Some(data_transfer) =
          event.data_transfer()
        {
          if let Err(error) = data_transfer
            .set_data(
              "text/plain",
              &task_id.to_string()
            )
          {
            tracing::warn!(
              ?error,
              task_id,
              "failed setting drag data"
            );
          }
          data_transfer
            .set_drop_effect("move");
        }
        on_drag_start.emit(task_id);
      }
    )
  };

  let ondragend = {
    let on_drag_end =
      props.on_drag_end.clone();
    Callback::from(move |_| {
      on_drag_end.emit(());
    })
  };

  let ondragover =
    Callback::from(|event: DragEvent| {
      event.prevent_default();
    });

  let ondrop = {
    let on_drop = props.on_drop.clone();
    Callback::from(
      move |event: DragEvent| {
        event.prevent_default();
        on_drop.emit(task_id);
      }
    )
  };

  let on_toggle = {
    let on_toggle =
      props.on_toggle.clone();
    Callback::from(move |_| {
      on_toggle.emit(task_id)
    })
  };

  let on_delete = {
    let on_delete =
      props.on_delete.clone();
    Callback::from(move |_| {
      on_delete.emit(task_id)
    })
  };

  let controls = match props
    .editing
    .as_ref()
    .filter(|draft| draft.id == task_id)
  {
    | Some(draft) => {
      let on_due_change = {
        let on_edit_due =
          props.on_edit_due.clone();
        Callback::from(
          move |e: web_sys::Event| {
            let input: web_sys::HtmlInputElement =
              e.target_unchecked_into();
            on_edit_due.emit(
              parse_date_input(
                &input.value()
              )
            );
          }
        )
      };
      let on_save = {
        let on_save_edit =
          props.on_save_edit.clone();
        Callback::from(move |_| {
          on_save_edit.emit(())
        })
      };
      let on_cancel = {
        let on_cancel_edit =
          props.on_cancel_edit.clone();
        Callback::from(move |_| {
          on_cancel_edit.emit(())
        })
      };
      let due_value = draft
        .due_date
        .map(|date| {
          date
            .format(DUE_DATE_FORMAT)
            .to_string()
        })
        .unwrap_or_default();

      html! {
          <>
              <PrioritySelect
                  value={draft.priority}
                  on_change={props.on_edit_priority.clone()}
              />
              <input type="date" value={due_value} onchange={on_due_change} />
              <button onclick={on_save}>{ "Save" }</button>
              <button onclick={on_cancel}>{ "Cancel" }</button>
          </>
      }
    }
    | None => {
      let on_edit = {
        let on_start_edit =
          props.on_start_edit.clone();
        Callback::from(move |_| {
          on_start_edit.emit(task_id)
        })
      };
      let priority_style = format!(
        "color: {}",
        task.priority.color()
      );

      html! {
          <>
              <span class="task-priority" style={priority_style}>
                  { task.priority.as_str() }
              </span>
              <span class={classes!("task-due-date", props.overdue.then_some("overdue"))}>
                  { due_label(task.due_date) }
              </span>
              {
                  if task.completed {
                      html! {}
                  } else {
                      html! { <button onclick={on_edit}>{ "Edit" }</button> }
                  }
              }
              <button onclick={on_delete}>{ "Delete" }</button>
          </>
      }
    }
  };

  html! {
      <li
          class={classes!(
              "task-item",
              task.completed.then_some("completed"),
              props.is_dragging.then_some("dragging")
          )}
          {ondragover}
          {ondrop}
      >
          <label class="checkbox-container">
              <input type="checkbox" checked={task.completed} onchange={on_toggle} />
              <span class="checkmark"></span>
          </label>
          <span
              class="task-text"
              draggable="true"
              {ondragstart}
              {ondragend}
          >
              { task.text.clone() }
          </span>
          { controls }
      </li>
  }
}

/// `<input type="date">` yields `""`
/// when cleared.
pub fn parse_date_input(
  value: &str
) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(
    value.trim(),
    DUE_DATE_FORMAT
  )
  .ok()
}
