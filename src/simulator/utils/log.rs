/// Global logging setup
use env_logger::{Builder, Env};

/// Initialise `env_logger` once. `quiet` lowers the default level to warn;
/// `RUST_LOG` still takes precedence. Later calls are no-ops.
pub fn init_log(quiet: bool) {
  let default_level = if quiet { "warn" } else { "info" };
  let _ = Builder::from_env(Env::default().default_filter_or(default_level))
    .format_timestamp(None)
    .try_init();
}
