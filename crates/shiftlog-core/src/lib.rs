pub mod alerts;
pub mod api;
pub mod config;
pub mod filters;
pub mod idle;
pub mod notifications;
pub mod status;
pub mod table;
pub mod theme;
pub mod uploads;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Boxed single-threaded future, as
/// produced by the page ports.
pub type LocalFuture<'a, T> =
  Pin<Box<dyn Future<Output = T> + 'a>>;

pub trait Timer {
  fn sleep<'a>(
    &'a self,
    duration: Duration
  ) -> LocalFuture<'a, ()>;
}
