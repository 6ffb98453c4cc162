use tasktab_core::Priority;
use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct PrioritySelectProps {
  pub value:     Priority,
  pub on_change: Callback<Priority>
}

#[function_component(PrioritySelect)]
pub fn priority_select(
  props: &PrioritySelectProps
) -> Html {
  let onchange = {
    let on_change =
      props.on_change.clone();
    Callback::from(
      move |e: web_sys::Event| {
        let Some(select) = e
          .target_dyn_into::<
            web_sys::HtmlSelectElement
          >()
        else {
          tracing::warn!(
            "priority change event had \
             non-select target"
          );
          return;
        };
        match select
          .value()
          .parse::<Priority>()
        {
          | Ok(priority) => {
            on_change.emit(priority)
          }
          | Err(error) => {
            tracing::warn!(
              %error,
              "ignoring unknown priority"
            );
          }
        }
      }
    )
  };

  html! {
      <select {onchange}>
          { for Priority::ALL.iter().map(|priority| html! {
              <option
                  value={priority.as_str()}
                  selected={*priority == props.value}
              >
                  { priority.as_str() }
              </option>
          }) }
      </select>
  }
}
