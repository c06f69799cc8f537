mod busy_indicator;
mod confirm_dialog;
mod edit_modal;
mod filter_bar;
mod task_form;
mod task_list;
mod task_list_row;
mod toasts;

pub use busy_indicator::BusyIndicator;
pub use confirm_dialog::ConfirmDialog;
pub use edit_modal::EditModal;
pub use filter_bar::FilterBar;
pub use task_form::TaskForm;
pub use task_list::TaskList;
pub use task_list_row::TaskListRow;
pub use toasts::Toasts;

use web_sys::HtmlElement;
use yew::NodeRef;

pub(crate) fn focus_node(node: &NodeRef) {
  if let Some(element) =
    node.cast::<HtmlElement>()
    && let Err(err) = element.focus()
  {
    tracing::debug!(
      ?err,
      "could not focus element"
    );
  }
}
