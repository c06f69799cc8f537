use std::rc::Rc;

use gloo::events::EventListener;
use tasklist_core::controller::FocusTarget;
use tasklist_core::{
  ApiClient,
  Command,
  Controller,
  ControllerSettings
};
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;
use yew::{
  Callback,
  Html,
  function_component,
  html,
  use_effect_with,
  use_force_update,
  use_memo
};

use crate::api::{
  FetchTransport,
  web_config
};
use crate::components::{
  BusyIndicator,
  ConfirmDialog,
  EditModal,
  FilterBar,
  TaskForm,
  TaskList,
  Toasts
};

pub type AppController =
  Controller<ApiClient<FetchTransport>>;

#[function_component(App)]
pub fn app() -> Html {
  let controller: Rc<AppController> =
    use_memo((), |_| {
      let cfg = web_config();
      Controller::new(
        ApiClient::new(
          cfg.api_base_url(),
          FetchTransport
        ),
        ControllerSettings::from_config(
          &cfg
        )
      )
    });
  let rerender = use_force_update();

  let dispatch = {
    let controller = controller.clone();
    Callback::from(
      move |command: Command| {
        tracing::debug!(
          command = command.name(),
          "ui command"
        );
        let controller =
          controller.clone();
        wasm_bindgen_futures::spawn_local(
          async move {
            controller
              .dispatch(command)
              .await;
          }
        );
      }
    )
  };

  {
    let controller = controller.clone();
    let dispatch = dispatch.clone();
    use_effect_with((), move |_| {
      controller.set_listener(move || {
        rerender.force_update()
      });
      tracing::info!(
        "frontend mounted; loading \
         tasks"
      );
      dispatch.emit(Command::Load);

      move || {
        controller.set_listener(|| ())
      }
    });
  }

  {
    let dispatch = dispatch.clone();
    use_effect_with((), move |_| {
      let listener =
        web_sys::window()
          .and_then(|w| w.document())
          .map(|document| {
            EventListener::new(
              &document,
              "keydown",
              move |event| {
                let is_escape = event
                  .dyn_ref::<KeyboardEvent>()
                  .is_some_and(|e| {
                    e.key() == "Escape"
                  });
                if is_escape {
                  dispatch.emit(
                    Command::Escape
                  );
                }
              }
            )
          });
      move || drop(listener)
    });
  }

  let snapshot = controller.snapshot();
  let on_filter = {
    let dispatch = dispatch.clone();
    Callback::from(move |filter| {
      dispatch
        .emit(Command::SetFilter(filter))
    })
  };
  let on_dismiss = {
    let dispatch = dispatch.clone();
    Callback::from(move |id| {
      dispatch.emit(Command::Dismiss(id))
    })
  };

  html! {
      <div class="app">
          <header class="app-header">
              <h1>{ "Task List" }</h1>
          </header>
          <main class="app-main">
              <TaskForm
                  draft={snapshot.draft.clone()}
                  busy={snapshot.busy}
                  focus={snapshot.focus == Some(FocusTarget::AddTitle)}
                  on_command={dispatch.clone()}
              />
              <FilterBar active={snapshot.view.filter} on_select={on_filter} />
              <TaskList view={snapshot.view.clone()} on_command={dispatch.clone()} />
          </main>
          {
              if let Some(edit) = snapshot.edit.clone() {
                  html! {
                      <EditModal
                          edit={edit}
                          busy={snapshot.busy}
                          focus={snapshot.focus == Some(FocusTarget::EditTitle)}
                          on_command={dispatch.clone()}
                      />
                  }
              } else {
                  html! {}
              }
          }
          {
              if let Some(confirm) = snapshot.confirm.clone() {
                  html! { <ConfirmDialog confirm={confirm} on_command={dispatch.clone()} /> }
              } else {
                  html! {}
              }
          }
          <Toasts notifications={snapshot.notifications.clone()} on_dismiss={on_dismiss} />
          <BusyIndicator busy={snapshot.busy} />
      </div>
  }
}
