use tasklist_core::Command;
use tasklist_core::controller::EditDraft;
use web_sys::{
  Event,
  HtmlInputElement,
  HtmlTextAreaElement,
  InputEvent,
  KeyboardEvent
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  TargetCast,
  function_component,
  html,
  use_effect_with,
  use_node_ref
};

use super::focus_node;

#[derive(Properties, PartialEq)]
pub struct EditModalProps {
  pub edit:       EditDraft,
  pub busy:       bool,
  pub focus:      bool,
  pub on_command: Callback<Command>
}

#[function_component(EditModal)]
pub fn edit_modal(
  props: &EditModalProps
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

  let emit = |command: Command| {
    let on_command =
      props.on_command.clone();
    Callback::from(
      move |_: MouseEvent| {
        on_command.emit(command.clone())
      }
    )
  };

  let on_title = {
    let on_command =
      props.on_command.clone();
    Callback::from(move |e: InputEvent| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      on_command.emit(
        Command::SetEditTitle(
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
        Command::SetEditDescription(
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
          on_command
            .emit(Command::SaveEdit);
        }
      }
    )
  };
  let on_completed = {
    let on_command =
      props.on_command.clone();
    Callback::from(move |e: Event| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      on_command.emit(
        Command::SetEditCompleted(
          input.checked()
        )
      );
    })
  };

  html! {
      <div class="modal-backdrop" onclick={emit(Command::CloseEdit)}>
          <div class="modal" onclick={|e: MouseEvent| e.stop_propagation()}>
              <div class="header">{ "Edit Task" }</div>
              <div class="content">
                  <div class="field">
                      <label for="edit-title">{ "Title" }</label>
                      <input
                          id="edit-title"
                          ref={title_ref}
                          value={props.edit.title.clone()}
                          placeholder="Required task title"
                          oninput={on_title}
                          onkeydown={on_title_key}
                      />
                  </div>
                  <div class="field">
                      <label for="edit-description">{ "Description" }</label>
                      <textarea
                          id="edit-description"
                          value={props.edit.description.clone()}
                          oninput={on_description}
                      />
                  </div>
                  <label class="checkbox">
                      <input type="checkbox" checked={props.edit.completed} onchange={on_completed} />
                      { "Completed" }
                  </label>
              </div>
              <div class="footer">
                  <button class="secondary" onclick={emit(Command::CloseEdit)}>{ "Cancel" }</button>
                  <button class="primary" disabled={props.busy} onclick={emit(Command::SaveEdit)}>
                      { "Save" }
                  </button>
              </div>
          </div>
      </div>
  }
}
