use std::cell::{
  Cell,
  RefCell
};
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::timers::callback::{
  Interval,
  Timeout
};

/// Owns every listener and timer the
/// controllers install. Dropping it
/// cancels them all.
#[derive(Default)]
pub struct PageLifecycle {
  listeners: Vec<EventListener>,
  intervals: Vec<Interval>
}

impl PageLifecycle {
  pub fn listen(
    &mut self,
    listener: EventListener
  ) {
    self.listeners.push(listener);
  }

  pub fn every(
    &mut self,
    interval: Interval
  ) {
    self.intervals.push(interval);
  }

  pub fn counts(&self) -> (usize, usize) {
    (
      self.listeners.len(),
      self.intervals.len()
    )
  }
}

/// One-shot timers held until they fire.
/// Dropping the set cancels the pending
/// ones, so an owner torn down with the
/// page leaves no callbacks behind.
#[derive(Default)]
pub struct TimerSet {
  pending: RefCell<Vec<(Rc<Cell<bool>>, Timeout)>>
}

impl TimerSet {
  pub fn schedule(
    &self,
    millis: u32,
    callback: impl FnOnce() + 'static
  ) {
    let mut pending = self.pending.borrow_mut();
    pending.retain(|(fired, _)| !fired.get());

    let fired = Rc::new(Cell::new(false));
    let flag = fired.clone();
    let timeout = Timeout::new(millis, move || {
      flag.set(true);
      callback();
    });
    pending.push((fired, timeout));
  }

  #[cfg(test)]
  pub fn pending(&self) -> usize {
    self
      .pending
      .borrow()
      .iter()
      .filter(|(fired, _)| !fired.get())
      .count()
  }
}

thread_local! {
  static PAGE: RefCell<Option<PageLifecycle>> =
    const { RefCell::new(None) };
}

pub fn install(lifecycle: PageLifecycle) {
  let (listeners, intervals) =
    lifecycle.counts();
  tracing::info!(
    listeners,
    intervals,
    "page controllers installed"
  );
  PAGE.with(|slot| {
    *slot.borrow_mut() = Some(lifecycle);
  });
}

pub fn teardown() {
  let previous =
    PAGE.with(|slot| slot.borrow_mut().take());
  if previous.is_some() {
    tracing::info!(
      "page hidden; cancelling \
       controllers"
    );
  }
  drop(previous);
}

#[cfg(test)]
mod tests {
  use wasm_bindgen_test::{
    wasm_bindgen_test,
    wasm_bindgen_test_configure
  };

  use super::*;

  wasm_bindgen_test_configure!(run_in_browser);

  #[wasm_bindgen_test]
  async fn dropped_timer_set_cancels_pending_callbacks() {
    let ran = Rc::new(Cell::new(0));
    let timers = TimerSet::default();
    for delay in [5, 10] {
      let ran = ran.clone();
      timers.schedule(delay, move || {
        ran.set(ran.get() + 1)
      });
    }
    assert_eq!(timers.pending(), 2);
    drop(timers);

    gloo::timers::future::TimeoutFuture::new(30).await;
    assert_eq!(ran.get(), 0);
  }

  #[wasm_bindgen_test]
  async fn fired_timers_are_pruned() {
    let ran = Rc::new(Cell::new(0));
    let timers = TimerSet::default();
    let first = ran.clone();
    timers.schedule(1, move || first.set(1));

    gloo::timers::future::TimeoutFuture::new(20).await;
    assert_eq!(ran.get(), 1);
    assert_eq!(timers.pending(), 0);

    timers.schedule(1_000, || {});
    assert_eq!(timers.pending(), 1);
  }
}
