use std::{error::Error, fmt::Display};

/// Contract violations surfaced by the percolation model and the Monte
/// Carlo estimator. Every variant is a caller bug rather than an
/// environmental fault; none are retryable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PercolationError {
  /// A grid was created with zero dimension.
  InvalidSize,
  /// Site coordinates outside `1..=size` were passed to an operation.
  IndexOutOfRange { row: usize, col: usize, size: usize },
  /// The estimator was created with a zero grid size or zero trial count.
  InvalidParameters { grid_size: usize, trials: usize },
  /// A statistic was requested with no recorded trials.
  NotEnoughData,
  /// A trial exhausted its draw budget without percolating, which points at
  /// a broken random source.
  StalledTrial { attempts: usize },
}

impl Error for PercolationError {}

impl Display for PercolationError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      PercolationError::InvalidSize => {
        write!(f, "grid size must be at least 1")
      }
      PercolationError::IndexOutOfRange { row, col, size } => {
        write!(f, "site ({row}, {col}) outside {size}x{size} grid")
      }
      PercolationError::InvalidParameters { grid_size, trials } => {
        write!(
          f,
          "grid size ({grid_size}) and trial count ({trials}) must both be at least 1"
        )
      }
      PercolationError::NotEnoughData => {
        write!(f, "no percolation trials have been recorded")
      }
      PercolationError::StalledTrial { attempts } => {
        write!(f, "grid failed to percolate after {attempts} random draws")
      }
    }
  }
}

pub type PercolationResult<T = ()> = Result<T, Box<dyn Error + Send + Sync + 'static>>;
