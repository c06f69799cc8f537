use gloo::timers::callback::Timeout;
use tasklist_core::controller::Notification;
use yew::{
  Callback,
  Html,
  Properties,
  classes,
  function_component,
  html,
  use_effect_with
};

#[derive(Properties, PartialEq)]
pub struct ToastsProps {
  pub notifications: Vec<Notification>,
  pub on_dismiss:    Callback<u64>
}

#[function_component(Toasts)]
pub fn toasts(
  props: &ToastsProps
) -> Html {
  html! {
      <div class="toasts" aria-live="polite">
          {
              for props.notifications.iter().cloned().map(|notification| html! {
                  <Toast
                      key={notification.id.to_string()}
                      notification={notification.clone()}
                      on_dismiss={props.on_dismiss.clone()}
                  />
              })
          }
      </div>
  }
}

#[derive(Properties, PartialEq)]
struct ToastProps {
  notification: Notification,
  on_dismiss:   Callback<u64>
}

#[function_component(Toast)]
fn toast(props: &ToastProps) -> Html {
  let id = props.notification.id;

  {
    let on_dismiss =
      props.on_dismiss.clone();
    let millis = u32::try_from(
      props.notification.duration_ms
    )
    .unwrap_or(u32::MAX);
    use_effect_with(id, move |id| {
      let id = *id;
      let timeout =
        Timeout::new(millis, move || {
          on_dismiss.emit(id)
        });
      move || drop(timeout)
    });
  }

  let on_close = {
    let on_dismiss =
      props.on_dismiss.clone();
    Callback::from(move |_| {
      on_dismiss.emit(id)
    })
  };

  html! {
      <div class={classes!("toast", props.notification.kind.as_key())} role="status">
          <div class="toast-body">
              <strong>{ props.notification.title }</strong>
              <span>{ &props.notification.message }</span>
          </div>
          <button class="toast-close" aria-label="Dismiss" onclick={on_close}>{ "×" }</button>
      </div>
  }
}
