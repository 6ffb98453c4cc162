use tasktab_core::{
  Category,
  CategoryRename
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  TargetCast,
  classes,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct CategoryTabsProps {
  pub categories:       Vec<Category>,
  pub selected:         usize,
  pub renaming:
    Option<CategoryRename>,
  pub on_select:        Callback<usize>,
  pub on_start_rename:  Callback<usize>,
  pub on_rename_input:
    Callback<String>,
  pub on_save_rename:   Callback<()>,
  pub on_cancel_rename: Callback<()>,
  pub on_remove:        Callback<usize>
}

#[function_component(CategoryTabs)]
pub fn category_tabs(
  props: &CategoryTabsProps
) -> Html {
  html! {
      <div class="category-tabs">
          { for props.categories.iter().enumerate().map(|(index, category)| render_tab(props, index, category)) }
      </div>
  }
}

fn render_tab(
  props: &CategoryTabsProps,
  index: usize,
  category: &Category
) -> Html {
  let onclick = {
    let on_select =
      props.on_select.clone();
    Callback::from(move |_| {
      on_select.emit(index)
    })
  };

  let renaming = props
    .renaming
    .as_ref()
    .filter(|draft| draft.index == index);

  let body = if let Some(draft) =
    renaming
  {
    let oninput = {
      let on_rename_input =
        props.on_rename_input.clone();
      Callback::from(
        move |e: web_sys::InputEvent| {
          let input: web_sys::HtmlInputElement =
            e.target_unchecked_into();
          on_rename_input
            .emit(input.value());
        }
      )
    };
    let on_save =
      stop_then(props.on_save_rename.clone(), ());
    let on_cancel = stop_then(
      props.on_cancel_rename.clone(),
      ()
    );

    html! {
        <>
            <input type="text" value={draft.name.clone()} {oninput} onclick={Callback::from(|e: MouseEvent| e.stop_propagation())} />
            <button onclick={on_save}>{ "Save" }</button>
            <button onclick={on_cancel}>{ "Cancel" }</button>
        </>
    }
  } else {
    let on_edit = stop_then(
      props.on_start_rename.clone(),
      index
    );
    let on_remove =
      stop_then(props.on_remove.clone(), index);

    html! {
        <>
            { category.name.clone() }
            <button class="edit-btn" onclick={on_edit}>{ "Rename" }</button>
            <button class="remove-btn" onclick={on_remove}>{ "Remove" }</button>
        </>
    }
  };

  html! {
      <div
          key={index.to_string()}
          class={classes!("tab", (props.selected == index).then_some("active"))}
          {onclick}
      >
          { body }
      </div>
  }
}

// Tab buttons sit inside the clickable
// tab; keep their clicks from also
// selecting it.
fn stop_then<T: Clone + 'static>(
  callback: Callback<T>,
  value: T
) -> Callback<MouseEvent> {
  Callback::from(
    move |e: MouseEvent| {
      e.stop_propagation();
      callback.emit(value.clone());
    }
  )
}
