//! Cell store: the transcript and its active-cell handle.

use super::SessionError;
use super::cell::Cell;

/// Ordered, append-only transcript.
///
/// The active cell is tracked as an explicit index instead of being derived
/// from the cell list. When present it always points at the last cell, and
/// that cell is an `Input`.
#[derive(Debug, Default)]
pub struct CellStore {
    cells: Vec<Cell>,
    active: Option<usize>,
}

impl CellStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a cell. Input cells become active; any other cell leaves the
    /// store without an active cell until the next input is appended.
    pub fn append(&mut self, cell: Cell) {
        let is_input = cell.is_input();
        self.cells.push(cell);
        self.active = is_input.then(|| self.cells.len() - 1);
        self.check_invariants();
    }

    /// Replaces the text of the active input cell.
    ///
    /// # Errors
    /// Returns `SessionError::NoActiveInput` if no input cell is active.
    pub fn update_active_text(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        let index = self.active.ok_or(SessionError::NoActiveInput)?;
        match self.cells.get_mut(index) {
            Some(Cell::Input { text: current }) => {
                *current = text.into();
                Ok(())
            }
            _ => Err(SessionError::NoActiveInput),
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Text of the active input cell, if any.
    pub fn active_text(&self) -> Option<&str> {
        self.active
            .and_then(|i| self.cells.get(i))
            .and_then(Cell::text)
    }

    fn check_invariants(&self) {
        if let Some(index) = self.active {
            debug_assert_eq!(index + 1, self.cells.len(), "active cell must be last");
            debug_assert!(self.cells[index].is_input(), "active cell must be an input");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_is_empty_and_inactive() {
        let store = CellStore::new();
        assert!(store.is_empty());
        assert_eq!(store.active_index(), None);
        assert_eq!(store.active_text(), None);
    }

    #[test]
    fn test_append_input_becomes_active() {
        let mut store = CellStore::new();
        store.append(Cell::blank_input());
        assert_eq!(store.active_index(), Some(0));

        store.append(Cell::error("boom"));
        assert_eq!(store.active_index(), None);

        store.append(Cell::input("1 2 +"));
        assert_eq!(store.active_index(), Some(2));
        assert_eq!(store.active_text(), Some("1 2 +"));
    }

    #[test]
    fn test_update_active_text_only_touches_last_input() {
        let mut store = CellStore::new();
        store.append(Cell::input("first"));
        store.append(Cell::input("second"));
        store.update_active_text("edited").unwrap();

        assert_eq!(store.cells()[0], Cell::input("first"));
        assert_eq!(store.cells()[1], Cell::input("edited"));
    }

    #[test]
    fn test_update_without_active_input_is_rejected() {
        let mut store = CellStore::new();
        assert_eq!(
            store.update_active_text("x"),
            Err(SessionError::NoActiveInput)
        );

        store.append(Cell::message("hello"));
        assert_eq!(
            store.update_active_text("x"),
            Err(SessionError::NoActiveInput)
        );
        assert_eq!(store.cells()[0], Cell::message("hello"));
    }
}
