use clap::Parser;
use qecdec::simulator::config::{load_and_merge_configs, CliOverrides};
use qecdec::simulator::utils::log::init_log;
use qecdec::simulator::utils::report::print_run_report;
use qecdec::simulator::{Simulator, Stimulus};
use std::path::PathBuf;
use std::process::ExitCode;

/// qecdec - cycle model of a 3-qubit repetition code decoder
#[derive(Parser, Debug)]
#[command(name = "qecdec")]
#[command(version = "0.1.0")]
#[command(about = "Replays a stimulus script against the repetition code decoder", long_about = None)]
struct Args {
  /// Stimulus script (TOML, one [[cycle]] table per clock edge group)
  #[arg(value_name = "STIMULUS")]
  stimulus: PathBuf,

  /// Custom configuration file layered over the defaults
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Enable step mode (interactive stepping)
  #[arg(short, long)]
  step: bool,

  /// Quiet mode (suppress log messages)
  #[arg(short, long)]
  quiet: bool,

  /// Output trace file path (JSON lines)
  #[arg(long, value_name = "FILE")]
  trace_file: Option<String>,

  /// Stop after N clock edges
  #[arg(long, value_name = "N")]
  max_cycles: Option<u64>,

  /// Pattern generator stepping: always or test-mode-only
  #[arg(long, value_name = "POLICY")]
  lfsr_advance: Option<String>,

  /// Diagnostic bus layout: compact or extended
  #[arg(long, value_name = "LAYOUT")]
  diag_layout: Option<String>,
}

fn run(args: Args) -> qecdec::Result<bool> {
  let cli = CliOverrides {
    quiet: args.quiet,
    step: args.step,
    trace_file: args.trace_file,
    max_cycles: args.max_cycles,
    lfsr_advance: args.lfsr_advance,
    diag_layout: args.diag_layout,
  };
  let app_config = load_and_merge_configs(args.config.as_deref(), &cli)?;
  init_log(app_config.simulation.quiet);

  let stimulus = Stimulus::load(&args.stimulus)?;
  let mut simulator = Simulator::from_app_config(&app_config)?;
  let report = simulator.run(&stimulus)?;
  print_run_report(&report);
  Ok(report.passed())
}

fn main() -> ExitCode {
  let args = Args::parse();
  match run(args) {
    Ok(true) => ExitCode::SUCCESS,
    Ok(false) => ExitCode::from(1),
    Err(e) => {
      eprintln!("qecdec: {}", e);
      ExitCode::from(2)
    },
  }
}
