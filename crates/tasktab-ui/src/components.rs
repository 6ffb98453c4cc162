mod category_tabs;
mod priority_select;
mod progress_bar;
mod task_list;
mod task_row;

pub use category_tabs::CategoryTabs;
pub use priority_select::PrioritySelect;
pub use progress_bar::ProgressBar;
pub use task_list::TaskList;
pub use task_row::{
  TaskRow,
  parse_date_input
};
