use crate::config::LayoutConfig;

use super::model::Position;

/// Deterministic grid placement for newly inserted nodes.
///
/// Cell `i` sits at column `i % cols`, row `i / cols`; there is no
/// force-directed pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    margin_x: f64,
    margin_y: f64,
    cell_width: f64,
    cell_height: f64,
    min_columns: usize,
}

impl GridLayout {
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            margin_x: config.margin_x,
            margin_y: config.margin_y,
            cell_width: config.cell_width,
            cell_height: config.cell_height,
            min_columns: config.min_columns.max(1),
        }
    }

    /// Column count for a store holding `total_nodes` nodes.
    pub fn columns(&self, total_nodes: usize) -> usize {
        let root = (total_nodes.max(1) as f64).sqrt().round() as usize;
        root.max(self.min_columns)
    }

    /// Pixel position of insertion index `index`.
    pub fn position(&self, index: usize, columns: usize) -> Position {
        let columns = columns.max(1);
        self.cell(index % columns, index / columns)
    }

    /// Pixel position of a grid cell.
    pub fn cell(&self, col: usize, row: usize) -> Position {
        Position {
            x: self.margin_x + col as f64 * self.cell_width,
            y: self.margin_y + row as f64 * self.cell_height,
        }
    }

    /// Grid row a `y` coordinate falls on.
    fn row_of(&self, y: f64) -> usize {
        if self.cell_height <= 0.0 {
            return 0;
        }
        ((y - self.margin_y) / self.cell_height).round().max(0.0) as usize
    }

    /// Cursor that places new nodes below every given `y`.
    pub(crate) fn cursor_below(&self, ys: impl Iterator<Item = f64>) -> GridCursor {
        let base_row = ys.map(|y| self.row_of(y) + 1).max().unwrap_or(0);
        GridCursor {
            base_row,
            ..GridCursor::default()
        }
    }
}

/// Next free cell of the grid.
///
/// Nodes fill a block of rows starting at `base_row`. While the column count
/// stays the same, placement continues in that block; a different count
/// opens a new block on the first row below it, so cells never repeat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct GridCursor {
    columns: usize,
    base_row: usize,
    used: usize,
}

impl GridCursor {
    fn next_row(&self) -> usize {
        if self.used == 0 {
            self.base_row
        } else {
            self.base_row + (self.used - 1) / self.columns + 1
        }
    }

    /// Reserve the next cell on a grid of `columns`, as `(col, row)`.
    pub(crate) fn place(&mut self, columns: usize) -> (usize, usize) {
        let columns = columns.max(1);
        if columns != self.columns {
            self.base_row = self.next_row();
            self.columns = columns;
            self.used = 0;
        }
        let index = self.used;
        self.used += 1;
        (index % columns, self.base_row + index / columns)
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_has_floor() {
        let layout = GridLayout::default();
        assert_eq!(layout.columns(0), 4);
        assert_eq!(layout.columns(9), 4);
        assert_eq!(layout.columns(30), 5);
        assert_eq!(layout.columns(100), 10);
    }

    #[test]
    fn test_position() {
        let layout = GridLayout::default();
        assert_eq!(layout.position(0, 4), Position { x: 80.0, y: 80.0 });
        assert_eq!(layout.position(5, 4), Position { x: 260.0, y: 200.0 });
    }

    #[test]
    fn test_cursor_continues_on_same_grid() {
        let mut cursor = GridCursor::default();
        let cells: Vec<_> = (0..5).map(|_| cursor.place(4)).collect();
        assert_eq!(cells, vec![(0, 0), (1, 0), (2, 0), (3, 0), (0, 1)]);
        assert_eq!(cursor.place(4), (1, 1));
    }

    #[test]
    fn test_cursor_opens_block_when_columns_change() {
        let mut cursor = GridCursor::default();
        for _ in 0..5 {
            cursor.place(4);
        }
        // rows 0 and 1 are taken
        assert_eq!(cursor.place(5), (0, 2));
        assert_eq!(cursor.place(5), (1, 2));
    }

    #[test]
    fn test_cursor_below_existing_rows() {
        let layout = GridLayout::default();
        let mut cursor = layout.cursor_below([80.0, 200.0, 80.0].into_iter());
        assert_eq!(cursor.place(4), (0, 2));

        let mut empty = layout.cursor_below(std::iter::empty());
        assert_eq!(empty.place(4), (0, 0));
    }
}
