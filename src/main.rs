use std::{env, process::ExitCode, time::Instant};

use log::{error, info};
use percolation::{error::PercolationResult, PercolationStats, TrialOptions};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

const DEFAULT_GRID_SIZE: usize = 200;
const DEFAULT_TRIALS: usize = 100;

fn parse_args(args: &[String]) -> Option<(usize, usize)> {
  match args {
    [] => Some((DEFAULT_GRID_SIZE, DEFAULT_TRIALS)),
    [grid_size, trials] => Some((grid_size.parse().ok()?, trials.parse().ok()?)),
    _ => None,
  }
}

fn run(grid_size: usize, trials: usize) -> PercolationResult {
  let start = Instant::now();
  let stats =
    PercolationStats::with_options(grid_size, trials, TrialOptions::default().with_parallel(true))?;
  let elapsed = start.elapsed();
  info!(
    "{trials} trials on a {grid_size}x{grid_size} grid in {elapsed:?} ({:.1} trials/sec)",
    trials as f64 / elapsed.as_secs_f64()
  );

  println!("mean                    = {:.16}", stats.mean()?);
  println!("stddev                  = {:.16}", stats.stddev()?);
  println!(
    "95% confidence interval = [{:.16}, {:.16}]",
    stats.confidence_low()?,
    stats.confidence_high()?
  );

  Ok(())
}

fn main() -> ExitCode {
  let _ = TermLogger::init(
    LevelFilter::Info,
    Config::default(),
    TerminalMode::Stderr,
    ColorChoice::Auto,
  );

  let args = env::args().skip(1).collect::<Vec<_>>();
  let Some((grid_size, trials)) = parse_args(&args) else {
    eprintln!("usage: percolate-rs [<grid size> <trials>]");
    return ExitCode::FAILURE;
  };

  match run(grid_size, trials) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      error!("percolation estimate failed: {err}");
      ExitCode::FAILURE
    }
  }
}
