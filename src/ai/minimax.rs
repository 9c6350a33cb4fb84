use serde::{Deserialize, Serialize};

use crate::game::board::{Board, CellIndex, Mark};
use crate::game::rules::RuleError;

/// Terminal score for a computer win; a loss scores the negation, a draw
/// zero. Scores are not depth-adjusted: every line of a 3×3 game is short
/// enough that a flat score already yields optimal play.
const WIN_SCORE: i32 = 10;

/// The solver's choice plus search statistics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AiDecision {
    pub index: CellIndex,
    pub score: i32,
    pub nodes: u64,
}

/// Exhaustive minimax over the remaining empty cells, with `computer` as
/// the maximizing player. Children are visited in ascending cell index and
/// only a strictly better score displaces the incumbent, so ties resolve to
/// the lowest index and the result is deterministic. Each branch explores a
/// copy of the board; the caller's board is never touched.
///
/// Errs with [`RuleError::NoLegalMove`] on a full board — callers run the
/// terminal check first.
pub fn best_move(board: &Board, computer: Mark) -> Result<AiDecision, RuleError> {
    let mut nodes = 0u64;
    let mut best: Option<(CellIndex, i32)> = None;

    for index in board.empty_cells() {
        let mut child = *board;
        child.set(index, computer);
        let score = search(&child, computer.opponent(), computer, &mut nodes);
        match best {
            Some((_, incumbent)) if score <= incumbent => {}
            _ => best = Some((index, score)),
        }
    }

    best.map(|(index, score)| AiDecision {
        index,
        score,
        nodes,
    })
    .ok_or(RuleError::NoLegalMove)
}

/// Inner nodes return only the score; the concrete cell matters only at the
/// top level where a move must be emitted.
fn search(board: &Board, mover: Mark, computer: Mark, nodes: &mut u64) -> i32 {
    *nodes += 1;

    if let Some((winner, _)) = board.winner() {
        return if winner == computer {
            WIN_SCORE
        } else {
            -WIN_SCORE
        };
    }
    if board.is_full() {
        return 0;
    }

    let maximizing = mover == computer;
    let mut value = if maximizing { i32::MIN } else { i32::MAX };

    for index in board.empty_cells() {
        let mut child = *board;
        child.set(index, mover);
        let score = search(&child, mover.opponent(), computer, nodes);
        value = if maximizing {
            value.max(score)
        } else {
            value.min(score)
        };
    }

    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::{board_from, Outcome};

    #[test]
    fn full_board_is_a_contract_violation() {
        let board = board_from(["X", "O", "X", "X", "O", "O", "O", "X", "X"]);
        assert_eq!(best_move(&board, Mark::O), Err(RuleError::NoLegalMove));
    }

    #[test]
    fn takes_an_immediate_win() {
        // O completes col1 at index 7.
        let board = board_from(["X", "O", "X", "", "O", "X", "", "", ""]);
        let decision = best_move(&board, Mark::O).unwrap();
        assert_eq!(decision.index, 7);
        assert_eq!(decision.score, WIN_SCORE);
    }

    #[test]
    fn prefers_winning_over_blocking() {
        // Both sides threaten a row; X finishes its own at 2 rather than
        // blocking O at 5.
        let board = board_from(["X", "X", "", "O", "O", "", "", "", ""]);
        let decision = best_move(&board, Mark::X).unwrap();
        assert_eq!(decision.index, 2);
        assert_eq!(decision.score, WIN_SCORE);
    }

    #[test]
    fn blocks_the_opponents_completion() {
        // X threatens row0 at 2 and O has no win of its own.
        let board = board_from(["X", "X", "", "", "O", "", "", "", ""]);
        assert_eq!(best_move(&board, Mark::O).unwrap().index, 2);
    }

    #[test]
    fn solver_never_mutates_the_callers_board() {
        let board = board_from(["X", "", "", "", "", "", "", "", ""]);
        let snapshot = board;
        best_move(&board, Mark::O).unwrap();
        assert_eq!(board, snapshot);
    }

    #[test]
    fn deterministic_lowest_index_tie_break() {
        let board = Board::new();
        let first = best_move(&board, Mark::X).unwrap();
        for _ in 0..3 {
            assert_eq!(best_move(&board, Mark::X).unwrap().index, first.index);
        }
        // Every opening draws under optimal play, so the tie-break picks
        // the first empty cell.
        assert_eq!(first.index, 0);
        assert_eq!(first.score, 0);
    }

    #[test]
    fn self_play_from_empty_board_always_draws() {
        let mut board = Board::new();
        let mut mover = Mark::X;
        while board.outcome() == Outcome::Ongoing {
            let decision = best_move(&board, mover).unwrap();
            board.set(decision.index, mover);
            mover = mover.opponent();
        }
        assert_eq!(board.outcome(), Outcome::Draw);
    }

    #[test]
    fn perfect_against_every_first_reply() {
        // The computer opens; whatever legal reply the opponent makes, a
        // solver-vs-solver continuation never loses the game for X.
        let mut opening = Board::new();
        let first = best_move(&opening, Mark::X).unwrap();
        opening.set(first.index, Mark::X);

        for reply in opening.empty_cells().collect::<Vec<_>>() {
            let mut board = opening;
            board.set(reply, Mark::O);
            let mut mover = Mark::X;
            while board.outcome() == Outcome::Ongoing {
                let decision = best_move(&board, mover).unwrap();
                board.set(decision.index, mover);
                mover = mover.opponent();
            }
            match board.outcome() {
                Outcome::Win { mark, .. } => assert_eq!(mark, Mark::X),
                Outcome::Draw => {}
                Outcome::Ongoing => unreachable!(),
            }
        }
    }
}
