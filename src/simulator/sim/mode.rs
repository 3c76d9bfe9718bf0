use crate::simulator::config::SimulationSection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMode {
  Continuous,
  Step,
}

#[derive(Debug, Clone)]
pub struct SimConfig {
  pub quiet: bool,
  pub step_mode: StepMode,
  pub trace_file: Option<String>,
  pub max_cycles: Option<u64>,
}

impl SimConfig {
  pub fn from_section(section: &SimulationSection) -> Self {
    Self {
      quiet: section.quiet,
      step_mode: if section.step_mode {
        StepMode::Step
      } else {
        StepMode::Continuous
      },
      trace_file: Some(section.trace_file.clone()).filter(|f| !f.is_empty()),
      max_cycles: section.max_cycles,
    }
  }
}

impl Default for SimConfig {
  fn default() -> Self {
    Self {
      quiet: false,
      step_mode: StepMode::Continuous,
      trace_file: None,
      max_cycles: None,
    }
  }
}
