/// Common interface of every clocked block in the decoder
pub trait Module {
  /// Advance one clock edge
  fn run(&mut self);

  /// Return every register to its power-on value
  fn reset(&mut self);

  fn name(&self) -> &str;
}
