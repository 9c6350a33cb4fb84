use serde::{Deserialize, Serialize};

use crate::ai::minimax;

use super::{
    board::{CellIndex, Outcome},
    score::ScoreStore,
    state::{GameEvent, GameState, Mode},
};

/// Rejected inputs and contract violations, serialized as tagged JSON so the
/// front end can match on them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum RuleError {
    /// No round is live: before mode selection, after a terminal state, or
    /// while the computer's reply is pending.
    GameInactive,
    IndexOutOfRange { index: CellIndex },
    CellOccupied { index: CellIndex },
    /// `computer_move` called when no computer reply is owed.
    NotComputerTurn,
    /// The solver was asked for a move on a full board. Callers check the
    /// terminal state first; reaching this is an orchestration bug.
    NoLegalMove,
}

/// Snapshot handed back after every accepted input: the updated state, the
/// events that occurred, and the terminal outcome if one was reached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleResolution {
    pub state: GameState,
    pub events: Vec<GameEvent>,
    pub outcome: Outcome,
}

impl RuleResolution {
    pub fn new(state: GameState, events: Vec<GameEvent>) -> Self {
        let outcome = state.check_terminal();
        Self {
            state,
            events,
            outcome,
        }
    }
}

/// Sequences the rules around [`GameState`]: apply a move, check the
/// terminal state, hand the turn over, and settle scores. The state and the
/// score store stay owned by the caller.
#[derive(Debug, Default)]
pub struct RuleEngine;

impl RuleEngine {
    pub fn new() -> Self {
        Self
    }

    /// Menu selection: fixes the mode and opens a fresh round.
    pub fn select_mode(&self, state: &mut GameState, mode: Mode) -> Vec<GameEvent> {
        state.mode = Some(mode);
        state.reset();
        vec![GameEvent::GameReset { mode }]
    }

    /// New-game request within the current mode.
    pub fn reset(&self, state: &mut GameState) -> Result<Vec<GameEvent>, RuleError> {
        let mode = state.mode.ok_or(RuleError::GameInactive)?;
        state.reset();
        Ok(vec![GameEvent::GameReset { mode }])
    }

    pub fn reset_scores(
        &self,
        state: &mut GameState,
        store: &mut dyn ScoreStore,
    ) -> Vec<GameEvent> {
        state.reset_scores(store);
        vec![GameEvent::ScoresReset]
    }

    /// A human move for whichever symbol holds the turn: apply, check the
    /// terminal state, then hand the turn over. In computer mode a handover
    /// onto O parks the game until [`RuleEngine::computer_move`] delivers
    /// the reply.
    pub fn submit_move(
        &self,
        state: &mut GameState,
        store: &mut dyn ScoreStore,
        index: CellIndex,
    ) -> Result<Vec<GameEvent>, RuleError> {
        let mark = state.turn;
        state.apply_move(index, mark)?;

        let mut events = vec![GameEvent::MoveApplied { index, mark }];
        if self.settle_outcome(state, store, &mut events) {
            return Ok(events);
        }

        state.switch_turn();
        events.push(GameEvent::TurnChanged { turn: state.turn });

        if state.computer_mark() == Some(state.turn) {
            state.active = false;
            events.push(GameEvent::ComputerPending { mark: state.turn });
        }

        Ok(events)
    }

    /// Delivers the owed computer reply: asks the solver, places the move,
    /// re-checks the terminal state, and reopens the board for the human.
    pub fn computer_move(
        &self,
        state: &mut GameState,
        store: &mut dyn ScoreStore,
    ) -> Result<Vec<GameEvent>, RuleError> {
        if !state.computer_pending() {
            return Err(RuleError::NotComputerTurn);
        }
        let mark = state.turn;

        let decision = minimax::best_move(&state.board, mark)?;
        state.place(decision.index, mark)?;

        let mut events = vec![GameEvent::MoveApplied {
            index: decision.index,
            mark,
        }];
        if self.settle_outcome(state, store, &mut events) {
            return Ok(events);
        }

        state.active = true;
        state.switch_turn();
        events.push(GameEvent::TurnChanged { turn: state.turn });
        Ok(events)
    }

    /// Closes the round on a win or draw. Returns whether the round ended.
    fn settle_outcome(
        &self,
        state: &mut GameState,
        store: &mut dyn ScoreStore,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        match state.check_terminal() {
            Outcome::Win { mark, pattern } => {
                state.active = false;
                let score = state.record_win(mark, store);
                events.push(GameEvent::GameWon {
                    winner: mark,
                    pattern,
                    score,
                });
                true
            }
            Outcome::Draw => {
                state.active = false;
                events.push(GameEvent::GameDrawn);
                true
            }
            Outcome::Ongoing => false,
        }
    }
}
