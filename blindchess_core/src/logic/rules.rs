use crate::logic::board::{Color, Piece};
use std::fmt::Debug;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid FEN: {0}")]
    InvalidFen(String),
    #[error("illegal position: {0}")]
    IllegalPosition(String),
    #[error("illegal move: {0}")]
    IllegalMove(String),
}

/// The rules collaborator the engine searches against.
///
/// Implementors own the position. The engine only borrows it mutably for the
/// length of a search and relies on `apply_move`/`undo_move` nesting like a
/// stack: every `undo_move` reverts the most recent `apply_move` that has not
/// been undone yet.
pub trait Rules {
    type Move: Clone + Debug;

    /// All legal moves for the side to move, in the collaborator's order.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Plays a move taken from `legal_moves` without re-validating it.
    fn apply_move(&mut self, mv: &Self::Move);

    /// Reverts the last applied move. Returns `false` if nothing was applied.
    fn undo_move(&mut self) -> bool;

    fn is_checkmate(&self) -> bool;

    /// Stalemate, insufficient material, repetition or the fifty-move rule.
    fn is_draw(&self) -> bool;

    fn is_game_over(&self) -> bool {
        self.is_checkmate() || self.is_draw()
    }

    fn side_to_move(&self) -> Color;

    fn in_check(&self) -> bool;

    /// Every piece currently on the board.
    fn pieces(&self) -> Vec<Piece>;
}
