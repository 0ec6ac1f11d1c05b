use std::{error::Error, fmt::Display};

/// Contract violations reported by `UnionFind`. Both variants are caller
/// bugs, detected before any mutation; neither is retryable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnionFindError {
  /// The structure was created over an empty universe.
  InvalidSize,
  /// An element id outside `0..capacity` was passed to an operation.
  IndexOutOfRange { id: usize, capacity: usize },
}

impl Error for UnionFindError {}

impl Display for UnionFindError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      UnionFindError::InvalidSize => {
        write!(f, "union-find universe must hold at least one element")
      }
      UnionFindError::IndexOutOfRange { id, capacity } => {
        write!(f, "element {id} outside universe of {capacity} elements")
      }
    }
  }
}

pub type UnionFindResult<T = ()> = Result<T, UnionFindError>;
