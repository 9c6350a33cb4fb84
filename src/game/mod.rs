//! Core game logic: board, state, rule orchestration, score persistence.

pub mod board;
pub mod rules;
pub mod score;
pub mod state;

pub use board::{Board, CellIndex, Mark, Outcome, BOARD_CELLS, WIN_PATTERNS};
pub use rules::{RuleEngine, RuleError, RuleResolution};
pub use score::{score_key, MemoryStore, ScoreStore, SCORE_KEY_O, SCORE_KEY_X};
pub use state::{GameEvent, GameState, Mode, Scoreboard};
