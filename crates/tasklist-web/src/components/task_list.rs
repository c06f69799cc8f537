use tasklist_core::Command;
use tasklist_core::view::ListView;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

use super::TaskListRow;

#[derive(Properties, PartialEq)]
pub struct TaskListProps {
  pub view:       ListView,
  pub on_command: Callback<Command>
}

#[function_component(TaskList)]
pub fn task_list(
  props: &TaskListProps
) -> Html {
  html! {
      <section class="panel list">
          <div class="header">
              <span>{ format!("{} Tasks", props.view.filter.label()) }</span>
              <span class="count">{ &props.view.count_label }</span>
          </div>
          {
              if props.view.is_empty {
                  html! {
                      <div class="empty-state">
                          <p>{ "No tasks found" }</p>
                          <p class="hint">{ "Add a task above to get started." }</p>
                      </div>
                  }
              } else {
                  html! {
                      <div class="rows">
                          {
                              for props.view.rows.iter().cloned().map(|row| html! {
                                  <TaskListRow key={row.id.to_string()} row={row.clone()} on_command={props.on_command.clone()} />
                              })
                          }
                      </div>
                  }
              }
          }
      </section>
  }
}
