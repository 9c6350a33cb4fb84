pub mod ai;
pub mod game;

use std::str::FromStr;

use gloo_timers::future::TimeoutFuture;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::js_sys::Promise;

pub use ai::{best_move, AiDecision};
pub use game::{
    Board, CellIndex, GameEvent, GameState, Mark, MemoryStore, Mode, Outcome, RuleEngine,
    RuleError, RuleResolution, Scoreboard, ScoreStore, BOARD_CELLS, WIN_PATTERNS,
};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    set_panic_hook();
}

fn to_js_error(error: RuleError) -> JsValue {
    to_value(&error).unwrap_or_else(|serialize_err| JsValue::from_str(&serialize_err.to_string()))
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn make_resolution_json(resolution: RuleResolution) -> Result<String, JsValue> {
    serde_json::to_string(&resolution).map_err(serde_to_js_error)
}

fn parse_mode(mode: &str) -> Result<Mode, JsValue> {
    Mode::from_str(mode).map_err(|_| JsValue::from_str(&format!("unknown mode: {mode}")))
}

fn parse_mark(mark: &str) -> Result<Mark, JsValue> {
    Mark::from_str(mark).map_err(|_| JsValue::from_str(&format!("unknown mark: {mark}")))
}

/// Win counters in browser `localStorage`. When storage is unavailable
/// (blocked, private mode) reads come back empty and writes are dropped;
/// scores then simply do not survive the session.
#[derive(Default)]
pub struct BrowserStore {
    storage: Option<web_sys::Storage>,
}

impl BrowserStore {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|window| window.local_storage().ok().flatten());
        Self { storage }
    }
}

impl ScoreStore for BrowserStore {
    fn load(&self, key: &str) -> Option<u32> {
        let value = self.storage.as_ref()?.get_item(key).ok().flatten()?;
        value.parse().ok()
    }

    fn save(&mut self, key: &str, value: u32) {
        if let Some(storage) = &self.storage {
            let _ = storage.set_item(key, &value.to_string());
        }
    }

    fn remove(&mut self, key: &str) {
        if let Some(storage) = &self.storage {
            let _ = storage.remove_item(key);
        }
    }
}

/// The front end's handle on one game session. Owns the state and the
/// browser-backed score store; every accepted input returns a
/// [`RuleResolution`] as JSON for the renderer.
#[wasm_bindgen]
pub struct GameEngine {
    state: GameState,
    engine: RuleEngine,
    store: BrowserStore,
}

#[wasm_bindgen]
impl GameEngine {
    /// A fresh session with scores read from `localStorage`, or a session
    /// restored from a serialized state.
    #[wasm_bindgen(constructor)]
    pub fn new(initial_state_json: Option<String>) -> Result<GameEngine, JsValue> {
        let store = BrowserStore::new();
        let state = if let Some(json) = initial_state_json {
            serde_json::from_str(&json).map_err(serde_to_js_error)?
        } else {
            GameState::new(&store)
        };
        Ok(GameEngine {
            state,
            engine: RuleEngine::new(),
            store,
        })
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state).map_err(serde_to_js_error)
    }

    pub fn set_state_json(&mut self, json: &str) -> Result<(), JsValue> {
        let state: GameState = serde_json::from_str(json).map_err(serde_to_js_error)?;
        self.state = state;
        Ok(())
    }

    pub fn scores_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.score).map_err(serde_to_js_error)
    }

    pub fn current_turn(&self) -> String {
        self.state.turn.to_string()
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn computer_pending(&self) -> bool {
        self.state.computer_pending()
    }

    /// Menu selection (`"two"` or `"ai"`); starts a fresh round.
    pub fn select_mode(&mut self, mode: &str) -> Result<String, JsValue> {
        let mode = parse_mode(mode)?;
        let events = self.engine.select_mode(&mut self.state, mode);
        make_resolution_json(RuleResolution::new(self.state.clone(), events))
    }

    /// A human move on the given cell for whichever symbol holds the turn.
    pub fn submit_move(&mut self, index: usize) -> Result<String, JsValue> {
        let events = self
            .engine
            .submit_move(&mut self.state, &mut self.store, index)
            .map_err(to_js_error)?;
        make_resolution_json(RuleResolution::new(self.state.clone(), events))
    }

    /// Applies the owed computer reply.
    pub fn computer_move(&mut self) -> Result<String, JsValue> {
        let events = self
            .engine
            .computer_move(&mut self.state, &mut self.store)
            .map_err(to_js_error)?;
        make_resolution_json(RuleResolution::new(self.state.clone(), events))
    }

    /// Computes the pending computer reply after a pacing delay (the front
    /// end's usual 400 ms "thinking" pause) without applying it. Resolves
    /// to an [`AiDecision`] as JSON; apply with [`GameEngine::computer_move`].
    pub fn think_move(&self, delay_ms: Option<u32>) -> Promise {
        let pending = self.state.computer_pending();
        let board = self.state.board;
        let mark = self.state.turn;
        let delay = delay_ms.unwrap_or(0);

        future_to_promise(async move {
            if delay > 0 {
                TimeoutFuture::new(delay).await;
            }
            if !pending {
                return Err(to_js_error(RuleError::NotComputerTurn));
            }
            let decision = best_move(&board, mark).map_err(to_js_error)?;
            let json = serde_json::to_string(&decision).map_err(serde_to_js_error)?;
            Ok(JsValue::from_str(&json))
        })
    }

    /// New-game request; keeps mode and scores.
    pub fn reset(&mut self) -> Result<String, JsValue> {
        let events = self.engine.reset(&mut self.state).map_err(to_js_error)?;
        make_resolution_json(RuleResolution::new(self.state.clone(), events))
    }

    pub fn reset_scores(&mut self) -> Result<String, JsValue> {
        let events = self.engine.reset_scores(&mut self.state, &mut self.store);
        make_resolution_json(RuleResolution::new(self.state.clone(), events))
    }
}

/// Returns a blank session state for front-end bootstrapping or debugging.
#[wasm_bindgen(js_name = "createGameState")]
pub fn create_game_state() -> Result<JsValue, JsValue> {
    to_value(&GameState::new(&MemoryStore::new())).map_err(JsValue::from)
}

/// Stateless terminal check over a serialized state.
#[wasm_bindgen(js_name = "checkTerminal")]
pub fn check_terminal(state: JsValue) -> Result<JsValue, JsValue> {
    let state: GameState = from_value(state).map_err(JsValue::from)?;
    to_value(&state.check_terminal()).map_err(JsValue::from)
}

/// Stateless move application: returns the updated state or a rule error.
#[wasm_bindgen(js_name = "applyMove")]
pub fn apply_move(state: JsValue, index: usize, mark: &str) -> Result<JsValue, JsValue> {
    let mut state: GameState = from_value(state).map_err(JsValue::from)?;
    let mark = parse_mark(mark)?;
    match state.apply_move(index, mark) {
        Ok(()) => to_value(&state).map_err(JsValue::from),
        Err(error) => Err(to_js_error(error)),
    }
}

/// Stateless solver call over a serialized board.
#[wasm_bindgen(js_name = "bestMove")]
pub fn best_move_js(board: JsValue, mark: &str) -> Result<JsValue, JsValue> {
    let board: Board = from_value(board).map_err(JsValue::from)?;
    let mark = parse_mark(mark)?;
    match best_move(&board, mark) {
        Ok(decision) => to_value(&decision).map_err(JsValue::from),
        Err(error) => Err(to_js_error(error)),
    }
}

#[cfg(feature = "console_error_panic_hook")]
fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
fn set_panic_hook() {}
