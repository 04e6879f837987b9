//! Generators for synthetic flood depth and velocity data.
//!
//! All generators return plain row-major `Vec<f32>` buffers (top row first)
//! so they can be wrapped in a raster by whichever crate is under test.

/// Creates a test grid with predictable values.
///
/// Each cell value is `col * 1000 + row`, so a cell read back at
/// `(row, col)` can be checked without a reference copy.
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50);
/// assert_eq!(grid[1], 1000.0); // col=1, row=0
/// assert_eq!(grid[10], 1.0);   // col=0, row=1
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// Creates a flood depth grid in metres shaped like a basin.
///
/// Depth is `max_depth` at the centre and falls linearly to zero at the
/// corners, which spreads cells across every hazard band.
pub fn create_depth_grid(width: usize, height: usize, max_depth: f32) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    let center_x = (width as f32 - 1.0) / 2.0;
    let center_y = (height as f32 - 1.0) / 2.0;
    let max_dist = (center_x * center_x + center_y * center_y).sqrt().max(1.0);

    for row in 0..height {
        for col in 0..width {
            let dx = col as f32 - center_x;
            let dy = row as f32 - center_y;
            let dist = (dx * dx + dy * dy).sqrt();
            data.push((1.0 - dist / max_dist).max(0.0) * max_depth);
        }
    }
    data
}

/// Creates a flood velocity grid in m/s increasing west to east.
///
/// Column 0 is still water; the last column flows at `max_velocity`.
pub fn create_velocity_grid(width: usize, height: usize, max_velocity: f32) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    let span = (width.max(2) - 1) as f32;
    for _row in 0..height {
        for col in 0..width {
            data.push(col as f32 / span * max_velocity);
        }
    }
    data
}

/// Creates a deterministic pseudo-random grid with values in `[0, max)`.
///
/// The same `seed` always yields the same grid.
pub fn create_random_grid(width: usize, height: usize, max: f32, seed: u32) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let hash = simple_hash(col as u32, row as u32, seed);
            data.push((hash % 10_000) as f32 / 10_000.0 * max);
        }
    }
    data
}

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}

/// Creates a grid filled with a constant value.
pub fn create_constant_grid(width: usize, height: usize, value: f32) -> Vec<f32> {
    vec![value; width * height]
}

/// Replaces the cells at `positions` (given as `(col, row)`) with `fill`.
///
/// Out-of-range positions are ignored. Use `f32::NAN` or a nodata sentinel
/// such as `-9999.0` to punch holes in a grid.
pub fn punch_holes(
    mut data: Vec<f32>,
    width: usize,
    positions: &[(usize, usize)],
    fill: f32,
) -> Vec<f32> {
    for &(col, row) in positions {
        if col < width {
            if let Some(cell) = data.get_mut(row * width + col) {
                *cell = fill;
            }
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_grid() {
        let grid = create_test_grid(10, 5);
        assert_eq!(grid.len(), 50);
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid[1], 1000.0);
        assert_eq!(grid[10], 1.0);
        assert_eq!(grid[11], 1001.0);
    }

    #[test]
    fn test_depth_grid_peaks_in_center() {
        let grid = create_depth_grid(5, 5, 4.0);
        assert_eq!(grid[2 * 5 + 2], 4.0);
        assert_eq!(grid[0], 0.0);
        assert!(grid.iter().all(|&v| (0.0..=4.0).contains(&v)));
    }

    #[test]
    fn test_velocity_grid_spans_range() {
        let grid = create_velocity_grid(5, 2, 2.0);
        assert_eq!(&grid[..5], &[0.0, 0.5, 1.0, 1.5, 2.0]);
        assert_eq!(&grid[5..], &grid[..5]);
    }

    #[test]
    fn test_random_grid_is_deterministic() {
        let a = create_random_grid(20, 20, 3.0, 42);
        let b = create_random_grid(20, 20, 3.0, 42);
        let c = create_random_grid(20, 20, 3.0, 7);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.iter().all(|&v| (0.0..3.0).contains(&v)));
    }

    #[test]
    fn test_punch_holes() {
        let grid = punch_holes(create_constant_grid(3, 3, 1.0), 3, &[(1, 1), (5, 0)], f32::NAN);
        assert!(grid[4].is_nan());
        assert_eq!(grid.iter().filter(|v| v.is_nan()).count(), 1);
    }
}
