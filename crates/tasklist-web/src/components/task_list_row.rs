use tasklist_core::Command;
use tasklist_core::view::{
  Action,
  TaskRow
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  classes,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct TaskListRowProps {
  pub row:        TaskRow,
  pub on_command: Callback<Command>
}

#[function_component(TaskListRow)]
pub fn task_list_row(
  props: &TaskListRowProps
) -> Html {
  let row = &props.row;
  let id = row.id;

  html! {
      <div class={classes!("row", row.completed.then_some("completed"))} data-task-id={id.to_string()}>
          <div class="row-main">
              <div class="task-title">{ &row.title }</div>
              {
                  match &row.description {
                      Some(description) => html! { <div class="task-subtitle">{ description }</div> },
                      None => html! {},
                  }
              }
              <div class="row-meta">
                  <span class={classes!("badge", row.status.class)}>{ row.status.label }</span>
                  {
                      if row.created.is_empty() {
                          html! {}
                      } else {
                          html! { <span class="created">{ &row.created }</span> }
                      }
                  }
              </div>
          </div>
          <div class="row-actions">
              {
                  for row.actions.iter().map(|affordance| {
                      let command = match affordance.action {
                          Action::Toggle => Command::Toggle(id),
                          Action::Edit => Command::OpenEdit(id),
                          Action::Delete => Command::RequestDelete(id),
                      };
                      let on_command = props.on_command.clone();
                      html! {
                          <button
                              class={classes!("icon-button", affordance.icon)}
                              title={affordance.label}
                              aria-label={affordance.label}
                              onclick={move |e: MouseEvent| {
                                  e.stop_propagation();
                                  on_command.emit(command.clone());
                              }}
                          >
                              { affordance.label }
                          </button>
                      }
                  })
              }
          </div>
      </div>
  }
}
