// Copyright (c) 2026 rezky_nightky

/// Brightest stage of a streak; a cell at this value is a head.
pub const MAX_INTENSITY: u8 = 5;

/// Row-major `rows x cols` intensity buffer. Row 0 is the spawn edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: u16,
    cols: u16,
    cells: Vec<u8>,
}

impl Grid {
    pub fn new(rows: u16, cols: u16) -> Self {
        debug_assert!(rows > 0 && cols > 0, "grid must not be empty");
        Self {
            rows,
            cols,
            cells: vec![0; rows as usize * cols as usize],
        }
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn index(&self, row: u16, col: u16) -> Option<usize> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(row as usize * self.cols as usize + col as usize)
    }

    #[allow(dead_code)]
    pub fn get(&self, row: u16, col: u16) -> Option<u8> {
        self.index(row, col).map(|i| self.cells[i])
    }

    #[cfg(test)]
    pub fn set(&mut self, row: u16, col: u16, v: u8) {
        debug_assert!(v <= MAX_INTENSITY);
        if let Some(i) = self.index(row, col) {
            self.cells[i] = v.min(MAX_INTENSITY);
        }
    }

    pub fn row(&self, row: u16) -> &[u8] {
        let w = self.cols as usize;
        let start = row as usize * w;
        self.cells.get(start..start + w).unwrap_or(&[])
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [u8] {
        &mut self.cells
    }

    pub fn lit_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v > 0).count()
    }

    pub fn same_shape(&self, other: &Grid) -> bool {
        self.rows == other.rows && self.cols == other.cols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_dark() {
        let g = Grid::new(3, 4);
        assert_eq!(g.cells().len(), 12);
        assert_eq!(g.lit_count(), 0);
    }

    #[test]
    fn out_of_bounds_access_is_ignored() {
        let mut g = Grid::new(2, 2);
        g.set(2, 0, 5);
        g.set(0, 2, 5);
        assert_eq!(g.get(2, 0), None);
        assert_eq!(g.lit_count(), 0);
    }

    #[test]
    fn row_slices_are_row_major() {
        let mut g = Grid::new(2, 3);
        g.set(1, 2, 4);
        assert_eq!(g.row(0), &[0, 0, 0]);
        assert_eq!(g.row(1), &[0, 0, 4]);
    }
}
