use std::sync::{Arc, Mutex};

use super::Clock;

/// A clock tests move by hand. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Arc<Mutex<f64>>);

impl ManualClock {
  pub fn at(now: f64) -> Self {
    Self(Arc::new(Mutex::new(now)))
  }

  pub fn set(&self, now: f64) {
    *self.0.lock().unwrap() = now;
  }

  pub fn advance(&self, seconds: f64) {
    *self.0.lock().unwrap() += seconds;
  }
}

impl Clock for ManualClock {
  fn now(&self) -> f64 {
    *self.0.lock().unwrap()
  }
}
