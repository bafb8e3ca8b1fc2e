use unitdc_core::{Key, KeyboardLayout};

/// Cursor movement on the key grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct KeyboardState {
    pub layout: KeyboardLayout,
    /// Selected key as `(column, row)`. Always points at an existing key.
    pub cursor: (usize, usize),
    pub visible: bool,
}

impl KeyboardState {
    pub fn new(visible: bool) -> Self {
        Self {
            layout: KeyboardLayout::standard(),
            cursor: (0, 0),
            visible,
        }
    }

    pub fn selected(&self) -> Option<&Key> {
        self.layout.key(self.cursor.0, self.cursor.1)
    }

    /// Moves the cursor one step, wrapping around the grid edges.
    ///
    /// Columns can be shorter than the grid height, so the row is clamped to
    /// the last key of the destination column.
    pub fn move_cursor(&mut self, direction: Direction) {
        let columns = self.layout.columns();
        if columns.is_empty() {
            return;
        }
        let (mut col, mut row) = self.cursor;
        match direction {
            Direction::Left => col = (col + columns.len() - 1) % columns.len(),
            Direction::Right => col = (col + 1) % columns.len(),
            Direction::Up => {
                let len = columns[col].len().max(1);
                row = (row + len - 1) % len;
            }
            Direction::Down => {
                let len = columns[col].len().max(1);
                row = (row + 1) % len;
            }
        }
        row = row.min(columns[col].len().saturating_sub(1));
        self.cursor = (col, row);
    }
}
