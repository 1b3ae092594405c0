//! Cell-grid geometry derived from the display surface.

/// A cell grid fitted to a pixel container.
///
/// Snake segments and food are stored as flat cell indices in
/// `[0, columns * rows)`, encoding `(row, column)` as
/// `row * columns + column`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Grid {
    pub(crate) columns: usize,
    pub(crate) rows: usize,
    pub(crate) cell_width: f64,
    pub(crate) cell_height: f64,
}

/// A `(row, column)` pair, the grid-independent form of a cell index.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Cell {
    pub(crate) row: usize,
    pub(crate) column: usize,
}

impl Grid {
    /// Fit a grid of at-least-`min_cell`-sized cells to a `width` × `height`
    /// pixel container.
    ///
    /// Two candidates are computed, one deriving the column count from the
    /// width and one deriving the row count from the height, and whichever
    /// yields cells closer to square wins, so that movement looks uniform
    /// along both axes.  Returns `None` when the container (or the resulting
    /// grid) is degenerate; the caller treats that as "no playable area yet".
    pub(crate) fn compute(width: f64, height: f64, min_cell: f64) -> Option<Grid> {
        if width <= 0.0 || height <= 0.0 || min_cell <= 0.0 {
            return None;
        }
        let by_columns = candidate_by_columns(width, height, min_cell);
        let by_rows = candidate_by_rows(width, height, min_cell);
        match (by_columns, by_rows) {
            (Some(c), Some(r)) => Some(if c.squareness() < r.squareness() { c } else { r }),
            (c, r) => c.or(r),
        }
    }

    /// `|cell_width - cell_height|`; smaller is closer to square
    fn squareness(&self) -> f64 {
        (self.cell_width - self.cell_height).abs()
    }

    pub(crate) fn cell_count(&self) -> usize {
        self.columns * self.rows
    }

    pub(crate) fn cell_of(&self, index: usize) -> Cell {
        Cell {
            row: index / self.columns,
            column: index % self.columns,
        }
    }

    pub(crate) fn index_of(&self, cell: Cell) -> usize {
        cell.row * self.columns + cell.column
    }

    pub(crate) fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.column < self.columns
    }
}

fn candidate_by_columns(width: f64, height: f64, min_cell: f64) -> Option<Grid> {
    let columns = (width / min_cell).floor() as usize;
    if columns == 0 {
        return None;
    }
    let cell_width = width / columns as f64;
    let rows = (height / cell_width).floor() as usize;
    if rows == 0 {
        return None;
    }
    let cell_height = height / rows as f64;
    Some(Grid {
        columns,
        rows,
        cell_width,
        cell_height,
    })
}

fn candidate_by_rows(width: f64, height: f64, min_cell: f64) -> Option<Grid> {
    let rows = (height / min_cell).floor() as usize;
    if rows == 0 {
        return None;
    }
    let cell_height = height / rows as f64;
    let columns = (width / cell_height).floor() as usize;
    if columns == 0 {
        return None;
    }
    let cell_width = width / columns as f64;
    Some(Grid {
        columns,
        rows,
        cell_width,
        cell_height,
    })
}
