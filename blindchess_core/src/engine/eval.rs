use crate::engine::config::EngineConfig;
use crate::engine::Evaluator;
use crate::logic::board::Color;
use crate::logic::rules::Rules;
use std::sync::Arc;

pub struct MaterialEvaluator {
    config: Arc<EngineConfig>,
}

impl MaterialEvaluator {
    pub const fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }

    /// Score from White's point of view, before the side-to-move flip.
    pub fn absolute_score<G: Rules>(&self, game: &G) -> i32 {
        let turn = game.side_to_move();

        // 1. Terminal positions
        if game.is_checkmate() {
            return match turn {
                Color::White => -self.config.mate_score,
                Color::Black => self.config.mate_score,
            };
        }
        if game.is_draw() {
            return 0;
        }

        // 2. Material
        let mut score: i32 = game
            .pieces()
            .into_iter()
            .map(|piece| {
                let value = self.config.piece_value(piece.kind);
                match piece.color {
                    Color::White => value,
                    Color::Black => -value,
                }
            })
            .sum();

        // 3. Side in check is exposed
        if game.in_check() {
            score += match turn {
                Color::White => -self.config.check_penalty,
                Color::Black => self.config.check_penalty,
            };
        }

        score
    }
}

impl<G: Rules> Evaluator<G> for MaterialEvaluator {
    fn evaluate(&self, game: &G) -> i32 {
        let score = self.absolute_score(game);
        match game.side_to_move() {
            Color::White => score,
            Color::Black => -score,
        }
    }
}
