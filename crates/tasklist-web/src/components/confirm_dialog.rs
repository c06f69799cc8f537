use tasklist_core::Command;
use tasklist_core::controller::Confirmation;
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct ConfirmDialogProps {
  pub confirm:    Confirmation,
  pub on_command: Callback<Command>
}

#[function_component(ConfirmDialog)]
pub fn confirm_dialog(
  props: &ConfirmDialogProps
) -> Html {
  let on_cancel = {
    let on_command =
      props.on_command.clone();
    Callback::from(move |_: MouseEvent| {
      on_command
        .emit(Command::CancelConfirm)
    })
  };
  let on_confirm = {
    let on_command =
      props.on_command.clone();
    Callback::from(move |_: MouseEvent| {
      on_command.emit(Command::Confirm)
    })
  };

  html! {
      <div class="modal-backdrop" onclick={on_cancel.clone()}>
          <div class="modal confirm" role="alertdialog" onclick={|e: MouseEvent| e.stop_propagation()}>
              <div class="header">{ "Confirm Action" }</div>
              <div class="content">
                  <p>{ &props.confirm.message }</p>
              </div>
              <div class="footer">
                  <button class="secondary" onclick={on_cancel}>{ "Cancel" }</button>
                  <button class="danger" onclick={on_confirm}>{ "Confirm" }</button>
              </div>
          </div>
      </div>
  }
}
