pub mod config;
pub mod sim;
pub mod simulator;
pub mod stimulus;
pub mod utils;

pub use self::simulator::Simulator;
pub use self::stimulus::Stimulus;
