use crate::logic::rules::Rules;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config;
pub mod eval;
pub mod level;
pub mod search;

pub use level::StrengthLevel;

/// A root candidate with its pre-noise score (mover's perspective) and the
/// score it was ranked by.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMove<M> {
    pub mv: M,
    pub score: i32,
    pub noisy_score: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub depth: u8,
    pub nodes: u32,
    pub time_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The side to move has no legal moves; the game is over.
    #[error("no legal moves available")]
    NoLegalMoves,
    /// The rules collaborator contradicted itself (a live position without
    /// moves, or an undo with nothing to undo).
    #[error("rules oracle inconsistency at depth {depth}")]
    OracleInconsistency { depth: u8 },
}

pub trait Evaluator<G: Rules> {
    /// Static score of `game`, positive when good for the side to move.
    fn evaluate(&self, game: &G) -> i32;
}

pub trait Searcher<G: Rules> {
    fn select_move(
        &mut self,
        game: &mut G,
        level: StrengthLevel,
    ) -> Result<(ScoredMove<G::Move>, SearchStats), SearchError>;
}
