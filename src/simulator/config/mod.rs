pub mod config;

pub use self::config::{load_and_merge_configs, AppConfig, CliOverrides, SimulationSection};
