use yew::{
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct ProgressBarProps {
  pub percentage: u8,
  pub label:      String
}

#[function_component(ProgressBar)]
pub fn progress_bar(
  props: &ProgressBarProps
) -> Html {
  let width = format!(
    "width: {}%",
    props.percentage.min(100)
  );

  html! {
      <>
          <div class="progress-bar">
              <div class="progress" style={width}></div>
          </div>
          <p>{ props.label.clone() }</p>
      </>
  }
}
