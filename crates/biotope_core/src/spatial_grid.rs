use biotope_data::WorldBounds;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

/// Creatures sampled when sizing the grid.
pub const SIZING_SAMPLE: usize = 100;
/// Sampling stops once the running sight-range sum reaches this.
pub const SIGHT_SUM_LIMIT: f64 = 2e9;

/// Uniform grid over the world rectangle, stored as offset-indexed cell lists.
///
/// `cell_offsets[i]..cell_offsets[i + 1]` indexes into `entity_indices` for
/// cell `i = row * cols + col`. Inside a cell, indices keep their input order.
///
/// An object belongs to the first row (and column) whose upper edge is at or
/// beyond its mid-point, so an object exactly on a boundary lands in the
/// lower-indexed cell. Anything past the last edge, or before the first, is
/// clamped into the grid.
///
/// # Examples
/// ```
/// use biotope_core::spatial_grid::SpatialGrid;
///
/// let mut grid = SpatialGrid::new(0.0, 0.0, 10.0, 10, 10);
/// grid.build_parallel(&[(15.0, 15.0), (25.0, 25.0), (85.0, 85.0)]);
///
/// let mut nearby = Vec::new();
/// grid.for_each_in_neighborhood(1, 1, |idx| nearby.push(idx));
/// assert_eq!(nearby, vec![0, 1]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SpatialGrid {
    pub origin_x: f64,
    pub origin_y: f64,
    pub cell_size: f64,
    pub cols: usize,
    pub rows: usize,
    pub cell_offsets: Vec<usize>,
    pub entity_indices: Vec<usize>,
}

impl SpatialGrid {
    pub fn new(origin_x: f64, origin_y: f64, cell_size: f64, cols: usize, rows: usize) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            origin_x,
            origin_y,
            cell_size,
            cols,
            rows,
            cell_offsets: vec![0; cols * rows + 1],
            entity_indices: Vec::new(),
        }
    }

    /// Grid covering `bounds` with `ceil(width / cell)` columns and `ceil(height / cell)` rows.
    pub fn for_bounds(bounds: &WorldBounds, cell_size: f64) -> Self {
        let cols = (bounds.width / cell_size).ceil() as usize;
        let rows = (bounds.height / cell_size).ceil() as usize;
        Self::new(bounds.x, bounds.y, cell_size, cols, rows)
    }

    #[inline]
    fn axis_index(&self, offset: f64, count: usize) -> usize {
        let k = (offset / self.cell_size).ceil() - 1.0;
        if k > 0.0 {
            (k as usize).min(count - 1)
        } else {
            0
        }
    }

    /// `(row, col)` of the cell owning a mid-point.
    #[inline]
    #[must_use]
    pub fn cell_coords(&self, x: f64, y: f64) -> (usize, usize) {
        (
            self.axis_index(y - self.origin_y, self.rows),
            self.axis_index(x - self.origin_x, self.cols),
        )
    }

    #[inline]
    #[must_use]
    pub fn cell_idx(&self, x: f64, y: f64) -> usize {
        let (row, col) = self.cell_coords(x, y);
        row * self.cols + col
    }

    /// Rebuilds the cell lists from mid-points.
    pub fn build_parallel(&mut self, positions: &[(f64, f64)]) {
        let cell_count = self.cols * self.rows;

        let atomic_counts: Vec<AtomicUsize> =
            (0..cell_count).map(|_| AtomicUsize::new(0)).collect();
        positions.par_iter().for_each(|&(x, y)| {
            atomic_counts[self.cell_idx(x, y)].fetch_add(1, AtomicOrdering::Relaxed);
        });
        let counts: Vec<usize> = atomic_counts.into_iter().map(|a| a.into_inner()).collect();

        self.cell_offsets.resize(cell_count + 1, 0);
        let mut total = 0;
        for (i, &count) in counts.iter().enumerate() {
            self.cell_offsets[i] = total;
            total += count;
        }
        self.cell_offsets[cell_count] = total;

        self.entity_indices.clear();
        self.entity_indices.resize(positions.len(), 0);
        let mut cursor = self.cell_offsets[..cell_count].to_vec();
        for (entity_idx, &(x, y)) in positions.iter().enumerate() {
            let cell = self.cell_idx(x, y);
            self.entity_indices[cursor[cell]] = entity_idx;
            cursor[cell] += 1;
        }
    }

    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> &[usize] {
        if row >= self.rows || col >= self.cols {
            return &[];
        }
        let idx = row * self.cols + col;
        &self.entity_indices[self.cell_offsets[idx]..self.cell_offsets[idx + 1]]
    }

    /// Calls `callback` for every index in the cell and its (up to) eight neighbours.
    pub fn for_each_in_neighborhood<F>(&self, row: usize, col: usize, mut callback: F)
    where
        F: FnMut(usize),
    {
        if self.rows == 0 || self.cols == 0 {
            return;
        }
        let rows = row.saturating_sub(1)..=(row + 1).min(self.rows - 1);
        for r in rows {
            for c in col.saturating_sub(1)..=(col + 1).min(self.cols - 1) {
                for &idx in self.cell(r, c) {
                    callback(idx);
                }
            }
        }
    }

    /// Cell lists as `grid[row][col]`.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<Vec<usize>>> {
        (0..self.rows)
            .map(|r| (0..self.cols).map(|c| self.cell(r, c).to_vec()).collect())
            .collect()
    }
}

/// Partitions mid-points (relative to the origin) into a `rows × cols` grid.
#[must_use]
pub fn partition(
    positions: &[(f64, f64)],
    rows: usize,
    cols: usize,
    cell_size: f64,
) -> Vec<Vec<Vec<usize>>> {
    let mut grid = SpatialGrid::new(0.0, 0.0, cell_size, cols, rows);
    grid.build_parallel(positions);
    grid.to_rows()
}

/// Cell size from the sight ranges of the first creatures.
///
/// The larger of the sampled average and maximum; `min_cell_size` when no
/// sampled creature can see anything.
#[must_use]
pub fn cell_size_for<I>(sight_ranges: I, min_cell_size: f64) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut sum = 0.0;
    let mut count = 0usize;
    let mut max = 0.0f64;
    for range in sight_ranges.into_iter().take(SIZING_SAMPLE) {
        sum += range;
        count += 1;
        max = max.max(range);
        if sum >= SIGHT_SUM_LIMIT {
            break;
        }
    }
    if count == 0 || max <= 0.0 {
        return min_cell_size;
    }
    (sum / count as f64).max(max)
}
