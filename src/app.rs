use anyhow::Result;
use blindchess_core::engine::config::EngineConfig;
use blindchess_core::engine::eval::MaterialEvaluator;
use blindchess_core::engine::search::NegamaxEngine;
use blindchess_core::engine::{SearchError, Searcher, StrengthLevel};
use blindchess_core::logic::{ChessGame, ChessMove, Color, GameStatus, Rules};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

pub const HELP: &str = "Commands: <move> (e.g. e4, Nf3, O-O, e7e8q), board, moves, history, \
undo, level <1-20>, config <file>, new, help, quit";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Move(String),
    Board,
    Moves,
    History,
    Undo,
    Level(String),
    Config(String),
    New,
    Help,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let head = words.next()?;
        let command = match head.to_ascii_lowercase().as_str() {
            "board" => Self::Board,
            "moves" => Self::Moves,
            "history" => Self::History,
            "undo" => Self::Undo,
            "level" => Self::Level(words.next().unwrap_or_default().to_string()),
            "config" => Self::Config(words.next().unwrap_or_default().to_string()),
            "new" => Self::New,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => Self::Move(head.to_string()),
        };
        Some(command)
    }
}

/// What the shell should print after a line of input.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Reply {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Reply {
    fn say(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

/// Terminal blindfold trainer: the human types moves, the engine answers.
pub struct Trainer<R: Rng = StdRng> {
    game: ChessGame,
    start_fen: Option<String>,
    engine: NegamaxEngine<MaterialEvaluator, R>,
    level: StrengthLevel,
    player: Color,
}

impl Trainer {
    pub fn new(
        config: EngineConfig,
        level: StrengthLevel,
        player: Color,
        start_fen: Option<String>,
    ) -> Result<Self> {
        Self::with_rng(config, level, player, start_fen, StdRng::from_entropy())
    }
}

impl<R: Rng> Trainer<R> {
    pub fn with_rng(
        config: EngineConfig,
        level: StrengthLevel,
        player: Color,
        start_fen: Option<String>,
        rng: R,
    ) -> Result<Self> {
        let game = Self::fresh_game(start_fen.as_deref())?;
        Ok(Self {
            game,
            start_fen,
            engine: NegamaxEngine::with_rng(Arc::new(config), rng),
            level,
            player,
        })
    }

    fn fresh_game(start_fen: Option<&str>) -> Result<ChessGame> {
        Ok(match start_fen {
            Some(fen) => ChessGame::from_fen(fen)?,
            None => ChessGame::new(),
        })
    }

    pub const fn game(&self) -> &ChessGame {
        &self.game
    }

    pub const fn level(&self) -> StrengthLevel {
        self.level
    }

    /// Greeting, plus the engine's first move when it has the move.
    pub fn start(&mut self) -> Reply {
        let mut reply = Reply::default();
        reply.say(format!(
            "You play {} against the engine at level {}.",
            self.player, self.level
        ));
        reply.say(HELP);
        self.engine_turn(&mut reply);
        reply
    }

    pub fn handle(&mut self, line: &str) -> Reply {
        let mut reply = Reply::default();
        let Some(command) = Command::parse(line) else {
            return reply;
        };

        match command {
            Command::Move(input) => self.player_move(&input, &mut reply),
            Command::Board => {
                for row in self.game.board_grid() {
                    reply.say(row);
                }
                reply.say(format!("{} to move", self.game.side_to_move()));
            }
            Command::Moves => {
                let moves: Vec<String> = self
                    .game
                    .legal_moves()
                    .into_iter()
                    .map(|mv| mv.notation)
                    .collect();
                reply.say(moves.join(" "));
            }
            Command::History => {
                let turns: Vec<String> = self
                    .game
                    .san_history()
                    .chunks(2)
                    .enumerate()
                    .map(|(turn, pair)| format!("{}. {}", turn + 1, pair.join(" ")))
                    .collect();
                reply.say(turns.join(" "));
            }
            Command::Undo => self.take_back(&mut reply),
            Command::Level(value) => match value.parse::<i64>() {
                Ok(n) => {
                    self.level = StrengthLevel::clamped(n);
                    reply.say(format!("Engine level set to {}.", self.level));
                }
                Err(_) => reply.say("Usage: level <1-20>"),
            },
            Command::Config(path) if path.is_empty() => reply.say("Usage: config <file>"),
            Command::Config(path) => match EngineConfig::load_from_path(&path) {
                Ok(config) => {
                    self.engine.update_config(Arc::new(config));
                    log::info!("engine config reloaded from {path}");
                    reply.say(format!("Engine config loaded from {path}."));
                }
                Err(err) => reply.say(format!("Could not load config: {err}")),
            },
            Command::New => match Self::fresh_game(self.start_fen.as_deref()) {
                Ok(game) => {
                    self.game = game;
                    reply.say("New game.");
                    self.engine_turn(&mut reply);
                }
                Err(err) => reply.say(format!("Could not start a new game: {err}")),
            },
            Command::Help => reply.say(HELP),
            Command::Quit => reply.quit = true,
        }

        reply
    }

    fn player_move(&mut self, input: &str, reply: &mut Reply) {
        if self.game.is_game_over() {
            reply.say("The game is over. Type 'new' to play again.");
            return;
        }
        if self.game.side_to_move() != self.player {
            reply.say("It's not your turn!");
            return;
        }

        match self.game.play_input(input) {
            Ok(mv) => {
                self.announce(&mv, reply);
                self.engine_turn(reply);
            }
            Err(err) => {
                log::debug!("rejected input {input:?}: {err}");
                reply.say("Invalid move! Try again.");
            }
        }
    }

    /// Takes back the engine's reply and the player's last move.
    fn take_back(&mut self, reply: &mut Reply) {
        let player = self.player;
        if !self.game.moves_played().any(|mv| mv.color == player) {
            reply.say("Nothing to undo.");
            return;
        }
        while let Some(color) = self.game.moves_played().last().map(|mv| mv.color) {
            if !self.game.undo_move() || color == player {
                break;
            }
        }
        reply.say("Move undone");
    }

    fn engine_turn(&mut self, reply: &mut Reply) {
        if self.game.is_game_over() || self.game.side_to_move() == self.player {
            return;
        }

        match self.engine.select_move(&mut self.game, self.level) {
            Ok((best, stats)) => {
                log::debug!(
                    "engine: {} score {} depth {} nodes {}",
                    best.mv.notation,
                    best.score,
                    stats.depth,
                    stats.nodes
                );
                self.game.apply_move(&best.mv);
                self.announce(&best.mv, reply);
            }
            Err(SearchError::NoLegalMoves) => {}
            Err(err) => {
                log::error!("engine failed: {err}");
                reply.say(format!("Engine error: {err}"));
            }
        }
    }

    fn announce(&self, mv: &ChessMove, reply: &mut Reply) {
        let san = self
            .game
            .san_history()
            .pop()
            .unwrap_or_else(|| mv.notation.clone());
        reply.say(format!("{san}: {}", ChessGame::describe(mv)));
        match self.game.status() {
            GameStatus::Checkmate { winner } => reply.say(format!("Checkmate! {winner} wins!")),
            GameStatus::Draw(reason) => reply.say(format!("Game drawn! ({reason:?})")),
            GameStatus::Playing if self.game.in_check() => reply.say("Check!"),
            GameStatus::Playing => {}
        }
    }
}
