use union_find::UnionFind;

use crate::error::{PercolationError, PercolationResult};

/// Element id of the virtual top sentinel in every sentinel view.
const VIRTUAL_TOP: usize = 0;

/// Lightweight view over a `UnionFind` spanning every grid site plus the
/// virtual sentinel elements this view includes.
///
/// Fullness queries must run against a view with no bottom sentinel:
/// otherwise, once the grid percolates, every open bottom-row site is
/// connected to the top *through the virtual bottom* and falsely reports
/// full (backwash).
struct SentinelUf {
  uf: UnionFind,
  bottom: Option<usize>,
}

impl SentinelUf {
  /// View with both sentinels: element 0 is the virtual top, elements
  /// `1..=sites` are grid sites, element `sites + 1` is the virtual bottom.
  fn with_bottom(sites: usize) -> PercolationResult<Self> {
    Ok(Self {
      uf: UnionFind::new(sites + 2)?,
      bottom: Some(sites + 1),
    })
  }

  /// View with only the virtual top sentinel.
  fn top_only(sites: usize) -> PercolationResult<Self> {
    Ok(Self {
      uf: UnionFind::new(sites + 1)?,
      bottom: None,
    })
  }

  fn connect(&mut self, a: usize, b: usize) -> PercolationResult {
    self.uf.union(a, b)?;
    Ok(())
  }

  fn connect_top(&mut self, id: usize) -> PercolationResult {
    self.connect(id, VIRTUAL_TOP)
  }

  /// Noop for a view without a bottom sentinel.
  fn connect_bottom(&mut self, id: usize) -> PercolationResult {
    match self.bottom {
      Some(bottom) => self.connect(id, bottom),
      None => Ok(()),
    }
  }

  fn connected_to_top(&mut self, id: usize) -> PercolationResult<bool> {
    Ok(self.uf.connected(id, VIRTUAL_TOP)?)
  }

  /// Whether the two sentinels share a component. Always false for a view
  /// without a bottom sentinel.
  fn spans(&mut self) -> PercolationResult<bool> {
    match self.bottom {
      Some(bottom) => Ok(self.uf.connected(VIRTUAL_TOP, bottom)?),
      None => Ok(false),
    }
  }
}

/// Incremental site-percolation model over an n-by-n grid.
///
/// Sites are addressed by 1-based `(row, col)` with row 1 at the top. Sites
/// start closed and open monotonically through `open`. Two sentinel views
/// back the connectivity queries: `percolation` holds both virtual
/// sentinels and answers `percolates`, while `fullness` holds only the
/// virtual top so that `is_full` can never leak through the bottom
/// sentinel.
pub struct Percolation {
  size: usize,
  open: Vec<bool>,
  open_sites: usize,
  percolation: SentinelUf,
  fullness: SentinelUf,
}

impl Percolation {
  /// Creates an n-by-n grid with every site closed. A fresh grid never
  /// percolates, whatever its size.
  pub fn new(size: usize) -> PercolationResult<Self> {
    if size == 0 {
      return Err(PercolationError::InvalidSize.into());
    }

    let sites = size * size;
    Ok(Self {
      size,
      open: vec![false; sites],
      open_sites: 0,
      percolation: SentinelUf::with_bottom(sites)?,
      fullness: SentinelUf::top_only(sites)?,
    })
  }

  pub fn size(&self) -> usize {
    self.size
  }

  fn check_bounds(&self, row: usize, col: usize) -> PercolationResult {
    if row == 0 || row > self.size || col == 0 || col > self.size {
      return Err(
        PercolationError::IndexOutOfRange {
          row,
          col,
          size: self.size,
        }
        .into(),
      );
    }
    Ok(())
  }

  /// Index of a site in the open bitmap.
  fn grid_idx(&self, row: usize, col: usize) -> usize {
    (row - 1) * self.size + (col - 1)
  }

  /// Union-find element id of a site. Element 0 is the virtual top, so site
  /// ids start at 1.
  fn site_id(&self, row: usize, col: usize) -> usize {
    self.grid_idx(row, col) + 1
  }

  /// Opens the site, connecting it to its open orthogonal neighbors and to
  /// whichever sentinels its row touches. Opening an already-open site is a
  /// noop.
  pub fn open(&mut self, row: usize, col: usize) -> PercolationResult {
    self.check_bounds(row, col)?;
    let idx = self.grid_idx(row, col);
    if self.open[idx] {
      return Ok(());
    }

    self.open[idx] = true;
    self.open_sites += 1;

    let id = self.site_id(row, col);
    if row == 1 {
      self.percolation.connect_top(id)?;
      self.fullness.connect_top(id)?;
    }
    // Only the percolation view holds a bottom sentinel, so this skips the
    // fullness view by construction. For a 1x1 grid both sentinel branches
    // fire on the single site, which is what makes it percolate.
    if row == self.size {
      self.percolation.connect_bottom(id)?;
    }

    let neighbors = [
      (row > 1).then(|| (row - 1, col)),
      (row < self.size).then(|| (row + 1, col)),
      (col > 1).then(|| (row, col - 1)),
      (col < self.size).then(|| (row, col + 1)),
    ];
    for (neighbor_row, neighbor_col) in neighbors.into_iter().flatten() {
      if self.open[self.grid_idx(neighbor_row, neighbor_col)] {
        let neighbor_id = self.site_id(neighbor_row, neighbor_col);
        self.percolation.connect(id, neighbor_id)?;
        self.fullness.connect(id, neighbor_id)?;
      }
    }

    Ok(())
  }

  pub fn is_open(&self, row: usize, col: usize) -> PercolationResult<bool> {
    self.check_bounds(row, col)?;
    Ok(self.open[self.grid_idx(row, col)])
  }

  /// True when an open path of open sites connects this site to the top
  /// row. Consults the fullness view, never the percolation view, so a
  /// percolating grid does not make disconnected bottom-row sites full.
  pub fn is_full(&mut self, row: usize, col: usize) -> PercolationResult<bool> {
    self.check_bounds(row, col)?;
    if !self.open[self.grid_idx(row, col)] {
      return Ok(false);
    }
    // An open top-row site is always full.
    if row == 1 {
      return Ok(true);
    }

    self.fullness.connected_to_top(self.site_id(row, col))
  }

  /// Count of open sites, maintained incrementally.
  pub fn number_of_open_sites(&self) -> usize {
    self.open_sites
  }

  /// True when some open path connects the top row to the bottom row.
  pub fn percolates(&mut self) -> PercolationResult<bool> {
    self.percolation.spans()
  }
}
