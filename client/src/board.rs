//! Grid occupancy model, a derived view of the authoritative server board.

use crate::error::GameError;
use log::warn;
use shared::{in_bounds, COLS, EMPTY_CODE, ROWS, WALL_CODE};

/// What a single board cell holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Wall,
    Tank(String),
}

impl Cell {
    fn from_code(code: &str) -> Self {
        match code {
            EMPTY_CODE => Cell::Empty,
            WALL_CODE => Cell::Wall,
            name => Cell::Tank(name.to_string()),
        }
    }
}

/// Fixed ROWS x COLS grid of cell occupancy.
///
/// The board never decides anything on its own: it is loaded wholesale
/// from a server snapshot and thereafter only mirrors registry position
/// changes applied by the reconciler.
#[derive(Debug, Clone)]
pub struct Board {
    cells: Vec<Vec<Cell>>,
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: vec![vec![Cell::Empty; COLS]; ROWS],
        }
    }

    pub fn from_codes(snapshot: &[Vec<String>]) -> Self {
        let mut board = Self::new();
        board.load(snapshot);
        board
    }

    /// Replaces the grid wholesale. Rows or columns missing from the
    /// snapshot stay empty; extra ones are ignored.
    pub fn load(&mut self, snapshot: &[Vec<String>]) {
        self.cells = vec![vec![Cell::Empty; COLS]; ROWS];
        for (y, row) in snapshot.iter().take(ROWS).enumerate() {
            for (x, code) in row.iter().take(COLS).enumerate() {
                self.cells[y][x] = Cell::from_code(code);
            }
        }
    }

    pub fn cell_at(&self, x: i32, y: i32) -> Result<&Cell, GameError> {
        if !in_bounds(x, y) {
            return Err(GameError::OutOfBounds { x, y });
        }
        Ok(&self.cells[y as usize][x as usize])
    }

    /// True iff the cell is empty. Walls and occupied cells block
    /// bullets; out-of-range coordinates are never passable.
    pub fn is_passable(&self, x: i32, y: i32) -> bool {
        matches!(self.cell_at(x, y), Ok(Cell::Empty))
    }

    /// Marks a cell as occupied by a tank. Walls are never overwritten;
    /// a snapshot desync that tries is logged and dropped.
    pub fn put_tank(&mut self, name: &str, x: i32, y: i32) -> Result<(), GameError> {
        if !in_bounds(x, y) {
            return Err(GameError::OutOfBounds { x, y });
        }
        if self.cells[y as usize][x as usize] == Cell::Wall {
            warn!("Refusing to place tank {} on wall cell ({}, {})", name, x, y);
            return Ok(());
        }
        self.cells[y as usize][x as usize] = Cell::Tank(name.to_string());
        Ok(())
    }

    /// Clears a cell only if it still holds the given tank id. A stale
    /// clear after the cell changed hands is a no-op, not an error.
    pub fn clear_if_owned(&mut self, name: &str, x: i32, y: i32) {
        if in_bounds(x, y) && self.cells[y as usize][x as usize] == Cell::Tank(name.to_string()) {
            self.cells[y as usize][x as usize] = Cell::Empty;
        }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.cells
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_snapshot() -> Vec<Vec<String>> {
        vec![vec![EMPTY_CODE.to_string(); COLS]; ROWS]
    }

    #[test]
    fn test_load_parses_codes() {
        let mut snapshot = empty_snapshot();
        snapshot[4][3] = WALL_CODE.to_string();
        snapshot[8][1] = "leo".to_string();

        let board = Board::from_codes(&snapshot);
        assert_eq!(board.cell_at(3, 4), Ok(&Cell::Wall));
        assert_eq!(board.cell_at(1, 8), Ok(&Cell::Tank("leo".to_string())));
        assert_eq!(board.cell_at(0, 0), Ok(&Cell::Empty));
    }

    #[test]
    fn test_cell_at_out_of_bounds() {
        let board = Board::new();
        assert_eq!(
            board.cell_at(-1, 0),
            Err(GameError::OutOfBounds { x: -1, y: 0 })
        );
        assert_eq!(
            board.cell_at(COLS as i32, 2),
            Err(GameError::OutOfBounds { x: COLS as i32, y: 2 })
        );
    }

    #[test]
    fn test_passable_only_when_empty() {
        let mut board = Board::new();
        board.put_tank("leo", 2, 2).unwrap();
        let mut snapshot = empty_snapshot();
        snapshot[5][5] = WALL_CODE.to_string();
        let walled = Board::from_codes(&snapshot);

        assert!(board.is_passable(0, 0));
        assert!(!board.is_passable(2, 2));
        assert!(!walled.is_passable(5, 5));
        assert!(!board.is_passable(-1, 3));
    }

    #[test]
    fn test_put_tank_refuses_wall() {
        let mut snapshot = empty_snapshot();
        snapshot[4][3] = WALL_CODE.to_string();
        let mut board = Board::from_codes(&snapshot);

        board.put_tank("leo", 3, 4).unwrap();
        assert_eq!(board.cell_at(3, 4), Ok(&Cell::Wall));
    }

    #[test]
    fn test_clear_if_owned_ignores_stale_clear() {
        let mut board = Board::new();
        board.put_tank("leo", 2, 2).unwrap();
        board.put_tank("mia", 2, 2).unwrap();

        // leo no longer owns the cell, so the clear must not fire
        board.clear_if_owned("leo", 2, 2);
        assert_eq!(board.cell_at(2, 2), Ok(&Cell::Tank("mia".to_string())));

        board.clear_if_owned("mia", 2, 2);
        assert_eq!(board.cell_at(2, 2), Ok(&Cell::Empty));
    }

    #[test]
    fn test_partial_snapshot_stays_in_shape() {
        let snapshot = vec![vec![WALL_CODE.to_string(); 2]; 2];
        let board = Board::from_codes(&snapshot);
        assert_eq!(board.cell_at(1, 1), Ok(&Cell::Wall));
        assert_eq!(board.cell_at(COLS as i32 - 1, ROWS as i32 - 1), Ok(&Cell::Empty));
    }
}
