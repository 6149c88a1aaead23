pub mod board;
pub mod game;
pub mod rules;

pub use board::{Color, Piece, PieceKind};
pub use game::{ChessGame, ChessMove, DrawReason, GameStatus, Snapshot};
pub use rules::{GameError, Rules};
