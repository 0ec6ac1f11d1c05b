use rand::Rng;
use rayon::prelude::*;

use crate::{
  error::{PercolationError, PercolationResult},
  Percolation,
};

/// z-score of a 95% confidence interval under the normal approximation.
pub const CONFIDENCE_95: f64 = 1.96;

/// Knobs for a Monte Carlo estimation run.
#[derive(Clone, Copy)]
pub struct TrialOptions {
  /// Cap on random draws per trial, as a multiple of the grid's site count.
  /// A uniform source percolates well inside this budget; hitting the cap
  /// means the source is broken.
  pub attempt_factor: u32,
  /// Run trials on rayon worker threads instead of serially.
  pub parallel: bool,
}

impl TrialOptions {
  pub fn with_attempt_factor(&self, attempt_factor: u32) -> Self {
    Self {
      attempt_factor,
      ..*self
    }
  }

  pub fn with_parallel(&self, parallel: bool) -> Self {
    Self { parallel, ..*self }
  }
}

impl Default for TrialOptions {
  fn default() -> Self {
    Self {
      attempt_factor: 64,
      parallel: false,
    }
  }
}

/// Monte Carlo estimate of the percolation threshold of an n-by-n grid.
///
/// Construction runs every trial: each one opens uniformly random sites on
/// a fresh grid until it percolates and records the fraction of sites open
/// at that moment. Statistics are computed on demand from the recorded
/// thresholds.
pub struct PercolationStats {
  grid_size: usize,
  thresholds: Vec<f64>,
}

impl PercolationStats {
  /// Runs `trials` independent trials on an n-by-n grid with the
  /// thread-local random source and default options.
  pub fn new(grid_size: usize, trials: usize) -> PercolationResult<Self> {
    Self::with_options(grid_size, trials, TrialOptions::default())
  }

  /// Runs trials with the thread-local random source, serially or on rayon
  /// workers per `options`. Thresholds land in trial order either way.
  pub fn with_options(
    grid_size: usize,
    trials: usize,
    options: TrialOptions,
  ) -> PercolationResult<Self> {
    validate(grid_size, trials)?;

    let thresholds = if options.parallel {
      (0..trials)
        .into_par_iter()
        .map(|_| run_trial(grid_size, &mut rand::rng(), &options))
        .collect::<PercolationResult<Vec<_>>>()?
    } else {
      let mut rng = rand::rng();
      (0..trials)
        .map(|_| run_trial(grid_size, &mut rng, &options))
        .collect::<PercolationResult<Vec<_>>>()?
    };

    Ok(Self {
      grid_size,
      thresholds,
    })
  }

  /// Runs trials serially, drawing from the provided source. Pass a seeded
  /// rng for reproducible runs.
  pub fn with_rng<R: Rng>(
    grid_size: usize,
    trials: usize,
    rng: &mut R,
  ) -> PercolationResult<Self> {
    validate(grid_size, trials)?;

    let options = TrialOptions::default();
    let thresholds = (0..trials)
      .map(|_| run_trial(grid_size, rng, &options))
      .collect::<PercolationResult<Vec<_>>>()?;

    Ok(Self {
      grid_size,
      thresholds,
    })
  }

  pub fn grid_size(&self) -> usize {
    self.grid_size
  }

  pub fn trials(&self) -> usize {
    self.thresholds.len()
  }

  /// Per-trial threshold fractions, one entry per trial in trial order.
  pub fn thresholds(&self) -> &[f64] {
    &self.thresholds
  }

  /// Sample mean of the recorded thresholds.
  pub fn mean(&self) -> PercolationResult<f64> {
    if self.thresholds.is_empty() {
      return Err(PercolationError::NotEnoughData.into());
    }
    Ok(self.thresholds.iter().sum::<f64>() / self.trials() as f64)
  }

  /// Sample standard deviation of the recorded thresholds, over the
  /// `trials - 1` divisor. For a single trial this divides zero by zero and
  /// the result is NaN, per sample-statistics convention.
  pub fn stddev(&self) -> PercolationResult<f64> {
    let mean = self.mean()?;
    let squared_deviations: f64 = self
      .thresholds
      .iter()
      .map(|threshold| (threshold - mean) * (threshold - mean))
      .sum();
    Ok((squared_deviations / (self.trials() as f64 - 1.0)).sqrt())
  }

  /// Low endpoint of the 95% confidence interval around the mean.
  pub fn confidence_low(&self) -> PercolationResult<f64> {
    Ok(self.mean()? - self.half_interval()?)
  }

  /// High endpoint of the 95% confidence interval around the mean.
  pub fn confidence_high(&self) -> PercolationResult<f64> {
    Ok(self.mean()? + self.half_interval()?)
  }

  fn half_interval(&self) -> PercolationResult<f64> {
    Ok(CONFIDENCE_95 * self.stddev()? / (self.trials() as f64).sqrt())
  }
}

fn validate(grid_size: usize, trials: usize) -> PercolationResult {
  if grid_size == 0 || trials == 0 {
    return Err(PercolationError::InvalidParameters { grid_size, trials }.into());
  }
  Ok(())
}

/// Opens uniformly random sites on a fresh grid until it percolates,
/// returning the fraction of sites open at that moment.
///
/// Redrawing an already-open site is a harmless noop, so the draw sequence
/// is distribution-equivalent to drawing among currently-closed sites. The
/// loop is bounded by `options.attempt_factor` draws per site; a uniform
/// source needs on the order of `ln(n*n)` per site, so the cap only trips
/// on a source that stopped covering the grid.
fn run_trial<R: Rng>(
  grid_size: usize,
  rng: &mut R,
  options: &TrialOptions,
) -> PercolationResult<f64> {
  let mut percolation = Percolation::new(grid_size)?;
  let sites = grid_size * grid_size;
  let max_attempts = sites.saturating_mul(options.attempt_factor as usize);
  let mut attempts = 0;

  while !percolation.percolates()? {
    if attempts == max_attempts {
      return Err(PercolationError::StalledTrial { attempts }.into());
    }
    let row = rng.random_range(1..=grid_size);
    let col = rng.random_range(1..=grid_size);
    percolation.open(row, col)?;
    attempts += 1;
  }

  Ok(percolation.number_of_open_sites() as f64 / sites as f64)
}

#[cfg(test)]
mod tests {
  use rand::{rngs::StdRng, SeedableRng};

  use crate::{error::PercolationError, PercolationStats, TrialOptions};

  #[test]
  fn test_invalid_parameters_rejected() {
    for (grid_size, trials) in [(0, 10), (10, 0), (0, 0)] {
      let err = PercolationStats::new(grid_size, trials).unwrap_err();
      assert_eq!(
        err.downcast_ref::<PercolationError>(),
        Some(&PercolationError::InvalidParameters { grid_size, trials })
      );
    }
  }

  #[test]
  fn test_single_site_grid_statistics() {
    let mut rng = StdRng::seed_from_u64(7);
    let stats = PercolationStats::with_rng(1, 8, &mut rng).unwrap();

    // Every trial opens the single site and stops, so there is no spread.
    assert!(stats.thresholds().iter().all(|&threshold| threshold == 1.0));
    assert_eq!(stats.mean().unwrap(), 1.0);
    assert_eq!(stats.stddev().unwrap(), 0.0);
    assert_eq!(stats.confidence_low().unwrap(), 1.0);
    assert_eq!(stats.confidence_high().unwrap(), 1.0);
  }

  #[test]
  fn test_stddev_of_single_trial_is_nan() {
    let mut rng = StdRng::seed_from_u64(7);
    let stats = PercolationStats::with_rng(1, 1, &mut rng).unwrap();

    assert_eq!(stats.mean().unwrap(), 1.0);
    assert!(stats.stddev().unwrap().is_nan());
  }

  #[test]
  fn test_records_one_threshold_per_trial() {
    let mut rng = StdRng::seed_from_u64(33);
    let stats = PercolationStats::with_rng(10, 20, &mut rng).unwrap();

    assert_eq!(stats.trials(), 20);
    assert_eq!(stats.grid_size(), 10);
    assert!(stats
      .thresholds()
      .iter()
      .all(|&threshold| 0.0 < threshold && threshold <= 1.0));
  }

  #[test]
  fn test_confidence_interval_brackets_mean() {
    let mut rng = StdRng::seed_from_u64(33);
    let stats = PercolationStats::with_rng(10, 20, &mut rng).unwrap();

    let mean = stats.mean().unwrap();
    assert!(stats.confidence_low().unwrap() <= mean);
    assert!(mean <= stats.confidence_high().unwrap());
  }

  #[test]
  fn test_mean_lands_in_known_threshold_band() {
    let mut rng = StdRng::seed_from_u64(1443);
    let stats = PercolationStats::with_rng(20, 40, &mut rng).unwrap();

    // Loose band around the known site-percolation threshold; a 20x20 grid
    // has sizable per-trial variance, hence the wide margins.
    let mean = stats.mean().unwrap();
    assert!((0.5..0.7).contains(&mean), "mean = {mean}");
  }

  #[test]
  fn test_parallel_run_records_every_trial() {
    let options = TrialOptions::default().with_parallel(true);
    let stats = PercolationStats::with_options(8, 16, options).unwrap();

    assert_eq!(stats.trials(), 16);
    assert!(stats
      .thresholds()
      .iter()
      .all(|&threshold| 0.0 < threshold && threshold <= 1.0));
  }
}
