/// Port and register types for module interconnection

/// A wire/signal that carries data between modules.
/// `valid` is false until a driver has set a value this cycle.
#[derive(Clone, Debug)]
pub struct Wire<T: Clone> {
  pub value: T,
  pub valid: bool,
}

impl<T: Clone> Wire<T> {
  pub fn set(&mut self, value: T) {
    self.value = value;
    self.valid = true;
  }

  pub fn clear(&mut self) {
    self.valid = false;
  }
}

impl<T: Clone + Default> Default for Wire<T> {
  fn default() -> Self {
    Self {
      value: T::default(),
      valid: false,
    }
  }
}

/// Edge-triggered register.
///
/// `q` is the value visible to readers during the cycle, `d` is the staged
/// next value. Nothing becomes visible until `commit`, so every block can
/// read last cycle's state while computing this cycle's update.
#[derive(Clone, Debug)]
pub struct Reg<T: Clone> {
  q: T,
  d: Option<T>,
  init: T,
}

impl<T: Clone> Reg<T> {
  pub fn new(init: T) -> Self {
    Self {
      q: init.clone(),
      d: None,
      init,
    }
  }

  /// Current (committed) value
  pub fn q(&self) -> &T {
    &self.q
  }

  /// Stage the value latched on the next edge
  pub fn set_next(&mut self, value: T) {
    self.d = Some(value);
  }

  /// Staged value if one exists, otherwise the committed one
  pub fn next(&self) -> &T {
    self.d.as_ref().unwrap_or(&self.q)
  }

  /// Clock edge: latch the staged value. An unstaged register holds.
  pub fn commit(&mut self) {
    if let Some(d) = self.d.take() {
      self.q = d;
    }
  }

  /// Drop any staged value without latching it
  pub fn discard(&mut self) {
    self.d = None;
  }

  pub fn reset(&mut self) {
    self.q = self.init.clone();
    self.d = None;
  }
}

impl<T: Clone + Default> Default for Reg<T> {
  fn default() -> Self {
    Self::new(T::default())
  }
}
