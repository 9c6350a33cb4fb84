use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::board::{Board, CellIndex, Mark, Outcome};
use super::rules::RuleError;
use super::score::{score_key, ScoreStore, SCORE_KEY_O, SCORE_KEY_X};

/// Play mode chosen on the menu screen. Wire names are the ones the front
/// end sends: `"two"` for a local two-player game, `"ai"` against the
/// computer. The computer always plays O.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Mode {
    #[serde(rename = "two")]
    HumanVsHuman,
    #[serde(rename = "ai")]
    HumanVsComputer,
}

impl Mode {
    /// The symbol the engine moves for, if any.
    pub fn computer_mark(self) -> Option<Mark> {
        match self {
            Mode::HumanVsHuman => None,
            Mode::HumanVsComputer => Some(Mark::O),
        }
    }
}

impl FromStr for Mode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "two" | "pvp" | "local" => Ok(Mode::HumanVsHuman),
            "ai" | "computer" | "single" => Ok(Mode::HumanVsComputer),
            _ => Err(()),
        }
    }
}

/// Per-symbol win counters. Draws award nothing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scoreboard {
    #[serde(rename = "X")]
    pub x: u32,
    #[serde(rename = "O")]
    pub o: u32,
}

impl Scoreboard {
    /// Loads both counters from the store; absent or unreadable entries
    /// count as zero.
    pub fn load(store: &dyn ScoreStore) -> Self {
        Self {
            x: store.load(SCORE_KEY_X).unwrap_or(0),
            o: store.load(SCORE_KEY_O).unwrap_or(0),
        }
    }

    pub fn get(&self, mark: Mark) -> u32 {
        match mark {
            Mark::X => self.x,
            Mark::O => self.o,
        }
    }

    fn bump(&mut self, mark: Mark) -> u32 {
        let counter = match mark {
            Mark::X => &mut self.x,
            Mark::O => &mut self.o,
        };
        *counter += 1;
        *counter
    }
}

/// What happened during a rule resolution, in order. The front end renders
/// these (sounds, win line, status text); the core only reports them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum GameEvent {
    MoveApplied {
        index: CellIndex,
        mark: Mark,
    },
    TurnChanged {
        turn: Mark,
    },
    /// The computer owes a reply; human input stays rejected until the
    /// front end calls back for it.
    ComputerPending {
        mark: Mark,
    },
    GameWon {
        winner: Mark,
        pattern: [CellIndex; 3],
        score: u32,
    },
    GameDrawn,
    GameReset {
        mode: Mode,
    },
    ScoresReset,
}

/// The whole session state: one live board plus the scores that survive
/// resets. Constructed explicitly per session so hosts can run any number
/// of independent games.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub turn: Mark,
    /// `None` until the player picks a mode on the menu screen.
    #[serde(default)]
    pub mode: Option<Mode>,
    pub active: bool,
    pub score: Scoreboard,
}

impl GameState {
    /// A fresh session: empty inactive board, scores read from the store.
    pub fn new(store: &dyn ScoreStore) -> Self {
        Self {
            board: Board::new(),
            turn: Mark::X,
            mode: None,
            active: false,
            score: Scoreboard::load(store),
        }
    }

    pub fn computer_mark(&self) -> Option<Mark> {
        self.mode.and_then(Mode::computer_mark)
    }

    /// True while the game waits for the computer's reply.
    pub fn computer_pending(&self) -> bool {
        !self.active
            && self.computer_mark() == Some(self.turn)
            && !self.board.outcome().is_terminal()
    }

    /// Places `mark` on an empty cell of the live board. Rejects the move,
    /// leaving the state untouched, when the game is inactive, the index is
    /// out of range, or the cell is occupied. Turn switching and terminal
    /// checks are the caller's sequence.
    pub fn apply_move(&mut self, index: CellIndex, mark: Mark) -> Result<(), RuleError> {
        if !self.active {
            return Err(RuleError::GameInactive);
        }
        self.place(index, mark)
    }

    /// The unguarded placement shared with the computer-reply path, which
    /// runs while `active` is false.
    pub(crate) fn place(&mut self, index: CellIndex, mark: Mark) -> Result<(), RuleError> {
        if index >= super::board::BOARD_CELLS {
            return Err(RuleError::IndexOutOfRange { index });
        }
        if !self.board.is_empty_cell(index) {
            return Err(RuleError::CellOccupied { index });
        }
        self.board.set(index, mark);
        Ok(())
    }

    pub fn check_terminal(&self) -> Outcome {
        self.board.outcome()
    }

    pub fn switch_turn(&mut self) {
        self.turn = self.turn.opponent();
    }

    /// Credits a win and persists the updated counter.
    pub fn record_win(&mut self, mark: Mark, store: &mut dyn ScoreStore) -> u32 {
        let value = self.score.bump(mark);
        store.save(score_key(mark), value);
        value
    }

    /// New round: clears the board, X opens, play is live. Scores keep.
    pub fn reset(&mut self) {
        self.board.clear();
        self.turn = Mark::X;
        self.active = true;
    }

    /// Zeroes both counters and drops the persisted entries.
    pub fn reset_scores(&mut self, store: &mut dyn ScoreStore) {
        self.score = Scoreboard::default();
        store.remove(SCORE_KEY_X);
        store.remove(SCORE_KEY_O);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::score::MemoryStore;

    fn live_state() -> GameState {
        let store = MemoryStore::new();
        let mut state = GameState::new(&store);
        state.mode = Some(Mode::HumanVsHuman);
        state.reset();
        state
    }

    #[test]
    fn new_state_starts_inactive_with_persisted_scores() {
        let mut store = MemoryStore::new();
        store.save(SCORE_KEY_X, 3);
        let state = GameState::new(&store);
        assert!(!state.active);
        assert_eq!(state.mode, None);
        assert_eq!(state.score, Scoreboard { x: 3, o: 0 });
    }

    #[test]
    fn apply_move_fills_exactly_the_target_cell() {
        let mut state = live_state();
        state.apply_move(4, Mark::X).unwrap();
        assert_eq!(state.board.get(4), Some(Mark::X));
        assert_eq!(state.board.empty_cells().count(), 8);
    }

    #[test]
    fn apply_move_rejects_without_mutation() {
        let mut state = live_state();
        state.apply_move(4, Mark::X).unwrap();
        let before = state.clone();

        assert_eq!(
            state.apply_move(4, Mark::O),
            Err(RuleError::CellOccupied { index: 4 })
        );
        assert_eq!(
            state.apply_move(9, Mark::O),
            Err(RuleError::IndexOutOfRange { index: 9 })
        );
        state.active = false;
        assert_eq!(state.apply_move(0, Mark::O), Err(RuleError::GameInactive));
        state.active = true;

        assert_eq!(state, before);
    }

    #[test]
    fn record_win_persists_and_reset_scores_clears() {
        let mut store = MemoryStore::new();
        let mut state = live_state();
        state.score = Scoreboard { x: 3, o: 2 };

        state.record_win(Mark::X, &mut store);
        assert_eq!(state.score.x, 4);
        assert_eq!(store.load(SCORE_KEY_X), Some(4));

        state.reset_scores(&mut store);
        assert_eq!(state.score, Scoreboard::default());
        assert_eq!(store.load(SCORE_KEY_X), None);
        assert_eq!(store.load(SCORE_KEY_O), None);
    }

    #[test]
    fn reset_keeps_scores_and_reopens_play() {
        let mut state = live_state();
        state.score = Scoreboard { x: 1, o: 1 };
        state.apply_move(0, Mark::X).unwrap();
        state.switch_turn();
        state.active = false;

        state.reset();
        assert!(state.active);
        assert_eq!(state.turn, Mark::X);
        assert_eq!(state.board, Board::new());
        assert_eq!(state.score, Scoreboard { x: 1, o: 1 });
    }

    #[test]
    fn mode_parses_front_end_names() {
        assert_eq!("ai".parse(), Ok(Mode::HumanVsComputer));
        assert_eq!("two".parse(), Ok(Mode::HumanVsHuman));
        assert!("zen".parse::<Mode>().is_err());
    }
}
