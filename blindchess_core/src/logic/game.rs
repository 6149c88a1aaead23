use crate::logic::board::{Color, Piece, PieceKind};
use crate::logic::rules::{GameError, Rules};
use serde::{Deserialize, Serialize};
use shakmaty::fen::Fen;
use shakmaty::san::{San, SanPlus};
use shakmaty::{Bitboard, CastlingMode, Chess, EnPassantMode, File, Position, Rank, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawReason {
    Stalemate,
    InsufficientMaterial,
    FiftyMoveRule,
    ThreefoldRepetition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Checkmate { winner: Color },
    Draw(DrawReason),
}

/// A legal move as handed out by [`ChessGame::legal_moves`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChessMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
    pub piece: PieceKind,
    pub color: Color,
    /// Coordinate notation, e.g. `e2e4`, `e7e8q`, `e1g1`.
    pub notation: String,
    raw: shakmaty::Move,
}

impl ChessMove {
    fn new(raw: shakmaty::Move, color: Color) -> Option<Self> {
        let from = raw.from()?;
        // Castling is stored king-takes-rook; show the king's landing square.
        let to = match &raw {
            shakmaty::Move::Castle { king, rook } => {
                let file = if rook < king { File::C } else { File::G };
                Square::from_coords(file, king.rank())
            }
            _ => raw.to(),
        };
        let promotion = raw.promotion().map(PieceKind::from);
        let mut notation = format!("{from}{to}");
        if let Some(kind) = promotion {
            notation.push(kind.letter());
        }

        Some(Self {
            from,
            to,
            promotion,
            piece: raw.role().into(),
            color,
            notation,
            raw,
        })
    }
}

#[derive(Debug, Clone)]
struct MoveRecord {
    mv: ChessMove,
    previous: Chess,
}

/// Everything that makes two positions the same for repetition purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PositionKey {
    board: shakmaty::Board,
    turn: Color,
    castling: Bitboard,
    ep_square: Option<Square>,
}

impl PositionKey {
    fn of(position: &Chess) -> Self {
        Self {
            board: position.board().clone(),
            turn: position.turn().into(),
            castling: position.castles().castling_rights(),
            ep_square: position.ep_square(EnPassantMode::Legal),
        }
    }
}

/// Structural fingerprint of a game, used to check that a search left the
/// position exactly as it found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub board: shakmaty::Board,
    pub turn: Color,
    pub castling: Bitboard,
    pub ep_square: Option<Square>,
    pub halfmoves: u32,
    pub fullmoves: u32,
    pub plies_recorded: usize,
}

/// Chess rules backed by `shakmaty`, with an undo stack of prior positions.
#[derive(Debug, Clone)]
pub struct ChessGame {
    position: Chess,
    history: Vec<MoveRecord>,
}

impl Default for ChessGame {
    fn default() -> Self {
        Self::new()
    }
}

impl ChessGame {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Chess::default(),
            history: Vec::new(),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        let parsed: Fen = fen
            .trim()
            .parse()
            .map_err(|err| GameError::InvalidFen(format!("{err}")))?;
        let position: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|err| GameError::IllegalPosition(format!("{err}")))?;

        Ok(Self {
            position,
            history: Vec::new(),
        })
    }

    /// Plays a move typed by a person: standard algebraic notation first
    /// (`e4`, `Nf3`, `O-O`, `e8=Q`), then coordinate notation as a fallback.
    pub fn play_input(&mut self, input: &str) -> Result<ChessMove, GameError> {
        match self.find_san(input.trim()) {
            Some(mv) => {
                self.apply_move(&mv);
                Ok(mv)
            }
            None => self.play_uci(input),
        }
    }

    fn find_san(&self, input: &str) -> Option<ChessMove> {
        let san: SanPlus = input.parse().ok()?;
        let raw = san.san.to_move(&self.position).ok()?;
        self.legal_moves().into_iter().find(|mv| mv.raw == raw)
    }

    /// Plays a move given in coordinate notation, e.g. `g1f3` or `a7a8q`.
    pub fn play_uci(&mut self, input: &str) -> Result<ChessMove, GameError> {
        let wanted = input.trim().to_ascii_lowercase();
        let mv = self
            .legal_moves()
            .into_iter()
            .find(|mv| mv.notation == wanted)
            .ok_or_else(|| GameError::IllegalMove(input.trim().to_string()))?;
        self.apply_move(&mv);
        Ok(mv)
    }

    pub fn status(&self) -> GameStatus {
        if self.position.is_checkmate() {
            return GameStatus::Checkmate {
                winner: self.side_to_move().opposite(),
            };
        }
        self.draw_reason().map_or(GameStatus::Playing, GameStatus::Draw)
    }

    pub fn draw_reason(&self) -> Option<DrawReason> {
        if self.position.is_stalemate() {
            Some(DrawReason::Stalemate)
        } else if self.position.is_insufficient_material() {
            Some(DrawReason::InsufficientMaterial)
        } else if self.position.halfmoves() >= 100 {
            Some(DrawReason::FiftyMoveRule)
        } else if self.repetitions() >= 3 {
            Some(DrawReason::ThreefoldRepetition)
        } else {
            None
        }
    }

    /// How many times the current position has occurred, counting itself.
    fn repetitions(&self) -> usize {
        let current = PositionKey::of(&self.position);
        1 + self
            .history
            .iter()
            .filter(|record| PositionKey::of(&record.previous) == current)
            .count()
    }

    /// Moves played so far, oldest first.
    pub fn moves_played(&self) -> impl Iterator<Item = &ChessMove> {
        self.history.iter().map(|record| &record.mv)
    }

    /// Moves played so far in standard algebraic notation, with `+`/`#`.
    pub fn san_history(&self) -> Vec<String> {
        self.history
            .iter()
            .enumerate()
            .map(|(ply, record)| {
                let after = self
                    .history
                    .get(ply + 1)
                    .map_or(&self.position, |next| &next.previous);
                let san = San::from_move(&record.previous, record.mv.raw.clone());
                let suffix = if after.is_checkmate() {
                    "#"
                } else if after.is_check() {
                    "+"
                } else {
                    ""
                };
                format!("{san}{suffix}")
            })
            .collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.position.board().clone(),
            turn: self.side_to_move(),
            castling: self.position.castles().castling_rights(),
            ep_square: self.position.ep_square(EnPassantMode::Legal),
            halfmoves: self.position.halfmoves(),
            fullmoves: self.position.fullmoves().get(),
            plies_recorded: self.history.len(),
        }
    }

    /// Piece placement plus side to move, e.g. `rnbqkbnr/... w`.
    pub fn board_text(&self) -> String {
        let side = match self.side_to_move() {
            Color::White => 'w',
            Color::Black => 'b',
        };
        format!("{} {side}", self.position.board())
    }

    /// The board as an 8x8 grid, rank 8 at the top, `.` for empty squares.
    pub fn board_grid(&self) -> Vec<String> {
        let board = self.position.board();
        let mut rows: Vec<String> = (0..8u32)
            .rev()
            .map(|rank| {
                let cells: Vec<String> = (0..8u32)
                    .map(|file| {
                        let square = Square::from_coords(File::new(file), Rank::new(rank));
                        board.piece_at(square).map_or_else(
                            || ".".to_string(),
                            |piece| {
                                let piece = Piece::from(piece);
                                match piece.color {
                                    Color::White => piece.kind.letter().to_ascii_uppercase(),
                                    Color::Black => piece.kind.letter(),
                                }
                                .to_string()
                            },
                        )
                    })
                    .collect();
                format!("{} {}", rank + 1, cells.join(" "))
            })
            .collect();
        rows.push("  a b c d e f g h".to_string());
        rows
    }

    /// Spoken form of a move, e.g. "White knight to f3".
    pub fn describe(mv: &ChessMove) -> String {
        format!("{} {} to {}", mv.color, mv.piece.name(), mv.to)
    }
}

impl Rules for ChessGame {
    type Move = ChessMove;

    fn legal_moves(&self) -> Vec<ChessMove> {
        let color = self.side_to_move();
        self.position
            .legal_moves()
            .into_iter()
            .filter_map(|raw| ChessMove::new(raw, color))
            .collect()
    }

    fn apply_move(&mut self, mv: &ChessMove) {
        let previous = self.position.clone();
        self.position.play_unchecked(mv.raw.clone());
        self.history.push(MoveRecord {
            mv: mv.clone(),
            previous,
        });
    }

    fn undo_move(&mut self) -> bool {
        match self.history.pop() {
            Some(record) => {
                self.position = record.previous;
                true
            }
            None => false,
        }
    }

    fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    fn is_draw(&self) -> bool {
        self.draw_reason().is_some()
    }

    fn side_to_move(&self) -> Color {
        self.position.turn().into()
    }

    fn in_check(&self) -> bool {
        self.position.is_check()
    }

    fn pieces(&self) -> Vec<Piece> {
        let board = self.position.board();
        board
            .occupied()
            .into_iter()
            .filter_map(|square| board.piece_at(square))
            .map(Piece::from)
            .collect()
    }
}
