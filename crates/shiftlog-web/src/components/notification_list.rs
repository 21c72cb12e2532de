use shiftlog_core::notifications::{
  NotificationKind,
  read_state_class
};
use shiftlog_web_shared::NotificationDto;
use yew::{
  AttrValue,
  Html,
  Properties,
  classes,
  function_component,
  html
};

/// Where a list is mounted: the navbar
/// dropdown or the dashboard card.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum ListVariant {
  Dropdown,
  Card
}

#[derive(Properties, PartialEq, Clone)]
pub struct NotificationListProps {
  pub records:     Vec<NotificationDto>,
  #[prop_or_default]
  pub fading:      Vec<i64>,
  pub fade_ms:     u32,
  pub empty_label: AttrValue,
  pub variant:     ListVariant
}

#[function_component(NotificationList)]
pub fn notification_list(
  props: &NotificationListProps
) -> Html {
  if props.records.is_empty() {
    return match props.variant {
      | ListVariant::Dropdown => html! {
          <li><span class="dropdown-item text-muted">{ props.empty_label.clone() }</span></li>
      },
      | ListVariant::Card => html! {
          <div class="text-center py-4">
              <i class="bi bi-bell-slash text-muted" style="font-size: 2rem;"></i>
              <p class="text-muted mt-2">{ props.empty_label.clone() }</p>
          </div>
      }
    };
  }

  html! {
      <>
          {
              for props.records.iter().map(|record| {
                  let fading = props.fading.contains(&record.id);
                  match props.variant {
                      | ListVariant::Dropdown => dropdown_item(record, fading, props.fade_ms),
                      | ListVariant::Card => card_item(record, fading, props.fade_ms)
                  }
              })
          }
      </>
  }
}

fn fade_style(
  fading: bool,
  fade_ms: u32
) -> Option<String> {
  fading.then(|| {
    format!(
      "opacity:0;transition:opacity \
       {fade_ms}ms;"
    )
  })
}

fn accent_class(
  record: &NotificationDto
) -> String {
  let kind = NotificationKind::from_wire(
    record.kind.as_deref()
  );
  format!(
    "border-start border-3 ps-2 \
     border-{}",
    kind.color()
  )
}

fn dropdown_item(
  record: &NotificationDto,
  fading: bool,
  fade_ms: u32
) -> Html {
  html! {
      <li key={record.id} style={fade_style(fading, fade_ms)}>
          <a class="dropdown-item notification-item" href="#" data-notification-id={record.id.to_string()}>
              <div class={classes!(read_state_class(record), accent_class(record))}>
                  <strong>{ &record.title }</strong><br/>
                  <small class="text-muted">{ &record.message }</small>
                  if let Some(sent_at) = &record.sent_at {
                      <br/><small class="text-muted">{ sent_at }</small>
                  }
              </div>
          </a>
      </li>
  }
}

fn card_item(
  record: &NotificationDto,
  fading: bool,
  fade_ms: u32
) -> Html {
  html! {
      <div
          key={record.id}
          class="notification-item d-flex justify-content-between align-items-start border-bottom py-2"
          style={fade_style(fading, fade_ms)}
      >
          <div class={classes!(read_state_class(record), accent_class(record))}>
              <strong>{ &record.title }</strong>
              <div class="small">{ &record.message }</div>
              if let Some(sent_at) = &record.sent_at {
                  <small class="text-muted">{ sent_at }</small>
              }
          </div>
          if !record.is_read {
              <button
                  type="button"
                  class="btn btn-sm btn-outline-primary mark-read"
                  data-notification-id={record.id.to_string()}
              >
                  <i class="bi bi-check"></i>
              </button>
          }
      </div>
  }
}
