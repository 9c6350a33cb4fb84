//! Adversarial search for the computer opponent.

pub mod minimax;

pub use minimax::{best_move, AiDecision};
