use yew::{
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct BusyIndicatorProps {
  pub busy: bool
}

#[function_component(BusyIndicator)]
pub fn busy_indicator(
  props: &BusyIndicatorProps
) -> Html {
  if !props.busy {
    return html! {};
  }

  html! {
      <div class="busy-overlay" aria-busy="true">
          <div class="spinner"></div>
      </div>
  }
}
