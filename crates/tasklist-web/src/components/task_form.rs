use tasklist_core::Command;
use tasklist_core::controller::TaskDraft;
use web_sys::{
  HtmlInputElement,
  HtmlTextAreaElement,
  InputEvent,
  KeyboardEvent
};
use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  function_component,
  html,
  use_effect_with,
  use_node_ref
};

use super::focus_node;

#[derive(Properties, PartialEq)]
pub struct TaskFormProps {
  pub draft:      TaskDraft,
  pub busy:       bool,
  /// Set after a rejected submit.
  pub focus:      bool,
  pub on_command: Callback<Command>
}

#[function_component(TaskForm)]
pub fn task_form(
  props: &TaskFormProps
) -> Html {
  let title_ref = use_node_ref();

  {
    let title_ref = title_ref.clone();
    let on_command =
      props.on_command.clone();
    use_effect_with(
      props.focus,
      move |focus| {
        if *focus {
          focus_node(&title_ref);
          on_command
            .emit(Command::ClearFocus);
        }
        || ()
      }
    );
  }

  let on_title = {
    let on_command =
      props.on_command.clone();
    Callback::from(move |e: InputEvent| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      on_command.emit(
        Command::SetDraftTitle(
          input.value()
        )
      );
    })
  };
  let on_description = {
    let on_command =
      props.on_command.clone();
    Callback::from(move |e: InputEvent| {
      let input: HtmlTextAreaElement =
        e.target_unchecked_into();
      on_command.emit(
        Command::SetDraftDescription(
          input.value()
        )
      );
    })
  };
  let on_title_key = {
    let on_command =
      props.on_command.clone();
    Callback::from(
      move |e: KeyboardEvent| {
        if e.key() == "Enter" {
          e.prevent_default();
          on_command.emit(Command::Create);
        }
      }
    )
  };
  let on_submit = {
    let on_command =
      props.on_command.clone();
    Callback::from(move |_| {
      on_command.emit(Command::Create)
    })
  };

  html! {
      <section class="task-form">
          <div class="field">
              <label for="task-title">{ "Title" }</label>
              <input
                  id="task-title"
                  ref={title_ref}
                  value={props.draft.title.clone()}
                  placeholder="What needs to be done?"
                  oninput={on_title}
                  onkeydown={on_title_key}
              />
          </div>
          <div class="field">
              <label for="task-description">{ "Description (optional)" }</label>
              <textarea
                  id="task-description"
                  value={props.draft.description.clone()}
                  placeholder="Optional details"
                  oninput={on_description}
              />
          </div>
          <button class="primary" disabled={props.busy} onclick={on_submit}>
              { "Add Task" }
          </button>
      </section>
  }
}
