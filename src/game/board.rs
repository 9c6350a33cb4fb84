use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A cell index into the 3×3 grid, row-major (0..=8).
pub type CellIndex = usize;

/// Number of cells on the board.
pub const BOARD_CELLS: usize = 9;

/// The eight winning triples: rows, then columns, then the two diagonals.
/// Terminal checks scan these in order and report the first match.
pub const WIN_PATTERNS: [[CellIndex; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A player symbol.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::O => "O",
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mark {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "X" => Ok(Mark::X),
            "O" | "0" => Ok(Mark::O),
            _ => Err(()),
        }
    }
}

/// Result of a terminal check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Outcome {
    Ongoing,
    Win {
        mark: Mark,
        pattern: [CellIndex; 3],
    },
    Draw,
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }
}

/// The 3×3 grid. `Copy`, so search code branches on snapshots and never
/// aliases the board a caller holds.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Mark>; BOARD_CELLS],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[Option<Mark>; BOARD_CELLS] {
        &self.cells
    }

    pub fn get(&self, index: CellIndex) -> Option<Mark> {
        self.cells.get(index).copied().flatten()
    }

    pub fn is_empty_cell(&self, index: CellIndex) -> bool {
        index < BOARD_CELLS && self.cells[index].is_none()
    }

    /// Writes a mark without validation. Callers check range and occupancy
    /// first; the rule layer does so via `GameState::apply_move`.
    pub(crate) fn set(&mut self, index: CellIndex, mark: Mark) {
        self.cells[index] = Some(mark);
    }

    pub fn clear(&mut self) {
        self.cells = [None; BOARD_CELLS];
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    /// Empty cell indices in ascending order.
    pub fn empty_cells(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(index, _)| index)
    }

    /// First satisfied win pattern in the fixed scan order, if any.
    pub fn winner(&self) -> Option<(Mark, [CellIndex; 3])> {
        for pattern in WIN_PATTERNS {
            let [a, b, c] = pattern;
            if let Some(mark) = self.cells[a] {
                if self.cells[b] == Some(mark) && self.cells[c] == Some(mark) {
                    return Some((mark, pattern));
                }
            }
        }
        None
    }

    pub fn outcome(&self) -> Outcome {
        if let Some((mark, pattern)) = self.winner() {
            Outcome::Win { mark, pattern }
        } else if self.is_full() {
            Outcome::Draw
        } else {
            Outcome::Ongoing
        }
    }
}

#[cfg(test)]
pub(crate) fn board_from(layout: [&str; BOARD_CELLS]) -> Board {
    let mut board = Board::new();
    for (index, cell) in layout.iter().enumerate() {
        if let Ok(mark) = cell.parse::<Mark>() {
            board.set(index, mark);
        }
    }
    board
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_board_is_ongoing() {
        assert_eq!(Board::new().outcome(), Outcome::Ongoing);
    }

    #[test]
    fn detects_each_pattern() {
        for pattern in WIN_PATTERNS {
            let mut board = Board::new();
            for index in pattern {
                board.set(index, Mark::O);
            }
            assert_eq!(board.winner(), Some((Mark::O, pattern)));
        }
    }

    #[test]
    fn win_requires_uniform_marks() {
        let board = board_from(["X", "X", "O", "", "", "", "", "", ""]);
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn first_pattern_in_scan_order_wins_on_malformed_boards() {
        // Both row0 and col0 are complete; row0 comes first in the scan.
        let board = board_from(["X", "X", "X", "X", "", "", "X", "", ""]);
        assert_eq!(board.winner(), Some((Mark::X, [0, 1, 2])));
    }

    #[test]
    fn full_board_without_win_is_draw() {
        let board = board_from(["X", "O", "X", "X", "O", "O", "O", "X", "X"]);
        assert_eq!(board.outcome(), Outcome::Draw);
    }

    #[test]
    fn empty_cells_ascend() {
        let board = board_from(["X", "", "O", "", "", "X", "", "O", ""]);
        let empties: Vec<_> = board.empty_cells().collect();
        assert_eq!(empties, vec![1, 3, 4, 6, 8]);
    }
}
