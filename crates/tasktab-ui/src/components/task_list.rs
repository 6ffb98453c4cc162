use chrono::NaiveDate;
use tasktab_core::{
  Priority,
  Task,
  TaskEdit,
  TaskId
};
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

use super::TaskRow;

#[derive(Properties, PartialEq)]
pub struct TaskListProps {
  pub tasks:            Vec<Task>,
  pub today:            NaiveDate,
  pub editing:          Option<TaskEdit>,
  pub dragging:         Option<TaskId>,
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

#[function_component(TaskList)]
pub fn task_list(
  props: &TaskListProps
) -> Html {
  html! {
      <ul class="task-list">
          { for props.tasks.iter().map(|task| html! {
              <TaskRow
                  key={task.id.to_string()}
                  task={task.clone()}
                  editing={props.editing.clone()}
                  is_dragging={props.dragging == Some(task.id)}
                  overdue={task.is_overdue(props.today)}
                  on_toggle={props.on_toggle.clone()}
                  on_delete={props.on_delete.clone()}
                  on_start_edit={props.on_start_edit.clone()}
                  on_edit_priority={props.on_edit_priority.clone()}
                  on_edit_due={props.on_edit_due.clone()}
                  on_save_edit={props.on_save_edit.clone()}
                  on_cancel_edit={props.on_cancel_edit.clone()}
                  on_drag_start={props.on_drag_start.clone()}
                  on_drag_end={props.on_drag_end.clone()}
                  on_drop={props.on_drop.clone()}
              />
          }) }
      </ul>
  }
}
