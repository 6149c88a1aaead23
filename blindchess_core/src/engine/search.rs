use crate::engine::config::EngineConfig;
use crate::engine::eval::MaterialEvaluator;
use crate::engine::{Evaluator, ScoredMove, SearchError, SearchStats, Searcher, StrengthLevel};
use crate::logic::rules::Rules;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Instant;

/// Window bound. Kept at `i32::MAX` so negating it never overflows.
pub const INFINITY: i32 = i32::MAX;

/// Fixed-depth negamax with alpha-beta pruning.
///
/// Difficulty comes from [`StrengthLevel`]: it caps the depth and sets how
/// much uniform noise is added to each root score before the argmax. The
/// noise is applied only at the root, so [`NegamaxEngine::negamax`] and
/// [`NegamaxEngine::root_scores`] stay deterministic.
pub struct NegamaxEngine<E = MaterialEvaluator, R = StdRng> {
    config: Arc<EngineConfig>,
    evaluator: E,
    rng: R,
    noise: bool,
    nodes_searched: u32,
}

impl NegamaxEngine {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> NegamaxEngine<MaterialEvaluator, R> {
    pub fn with_rng(config: Arc<EngineConfig>, rng: R) -> Self {
        let evaluator = MaterialEvaluator::new(config.clone());
        Self::with_parts(config, evaluator, rng)
    }

    pub fn update_config(&mut self, config: Arc<EngineConfig>) {
        self.evaluator = MaterialEvaluator::new(config.clone());
        self.config = config;
    }
}

impl<E, R: Rng> NegamaxEngine<E, R> {
    pub fn with_parts(config: Arc<EngineConfig>, evaluator: E, rng: R) -> Self {
        Self {
            config,
            evaluator,
            rng,
            noise: true,
            nodes_searched: 0,
        }
    }

    /// Ranks root moves by their exact scores only.
    #[must_use]
    pub fn without_noise(mut self) -> Self {
        self.noise = false;
        self
    }

    /// Nodes visited by the last `select_move`/`root_scores` call, plus any
    /// direct `negamax` calls since.
    pub const fn nodes_searched(&self) -> u32 {
        self.nodes_searched
    }

    /// Search depth for `level`, bounded by the configured cap.
    pub fn depth_for(&self, level: StrengthLevel) -> u8 {
        level.depth().min(self.config.depth_cap).max(1)
    }

    /// Negamax score of `game` for the side to move.
    ///
    /// Leaves are scored by the evaluator at `depth == 0` or when the game is
    /// over. Every applied move is undone before the next sibling is tried, and
    /// before returning, on error paths too.
    pub fn negamax<G>(
        &mut self,
        game: &mut G,
        depth: u8,
        mut alpha: i32,
        beta: i32,
    ) -> Result<i32, SearchError>
    where
        G: Rules,
        E: Evaluator<G>,
    {
        self.nodes_searched = self.nodes_searched.saturating_add(1);

        if depth == 0 || game.is_game_over() {
            return Ok(self.evaluator.evaluate(game));
        }

        let moves = game.legal_moves();
        if moves.is_empty() {
            return Err(SearchError::OracleInconsistency { depth });
        }

        let mut best_score = -INFINITY;
        for mv in &moves {
            game.apply_move(mv);
            let result = self.negamax(game, depth - 1, -beta, -alpha);
            if !game.undo_move() {
                return Err(SearchError::OracleInconsistency { depth });
            }
            let score = -result?;

            best_score = best_score.max(score);
            alpha = alpha.max(score);
            if self.config.alpha_beta && alpha >= beta {
                break;
            }
        }

        Ok(best_score)
    }

    /// Exact score of every root move at `depth`, in the oracle's move order.
    pub fn root_scores<G>(
        &mut self,
        game: &mut G,
        depth: u8,
    ) -> Result<Vec<(G::Move, i32)>, SearchError>
    where
        G: Rules,
        E: Evaluator<G>,
    {
        let moves = game.legal_moves();
        if moves.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }

        let depth = depth.max(1);
        let mut scored = Vec::with_capacity(moves.len());
        for mv in moves {
            game.apply_move(&mv);
            let result = self.negamax(game, depth - 1, -INFINITY, INFINITY);
            if !game.undo_move() {
                return Err(SearchError::OracleInconsistency { depth });
            }
            scored.push((mv, -result?));
        }

        Ok(scored)
    }

    fn noise(&mut self, level: StrengthLevel) -> f64 {
        if !self.noise {
            return 0.0;
        }
        self.rng.gen_range(0.0..f64::from(level.noise_range()))
    }
}

impl<G, E, R> Searcher<G> for NegamaxEngine<E, R>
where
    G: Rules,
    E: Evaluator<G>,
    R: Rng,
{
    fn select_move(
        &mut self,
        game: &mut G,
        level: StrengthLevel,
    ) -> Result<(ScoredMove<G::Move>, SearchStats), SearchError> {
        let start = Instant::now();
        self.nodes_searched = 0;

        let depth = self.depth_for(level);
        let scored = self.root_scores(game, depth)?;

        let mut best: Option<ScoredMove<G::Move>> = None;
        for (mv, score) in scored {
            let noisy_score = f64::from(score) + self.noise(level);
            log::debug!("candidate {mv:?}: score {score}, ranked at {noisy_score:.2}");

            // Strictly greater: the earliest candidate keeps ties.
            if best
                .as_ref()
                .map_or(true, |current| noisy_score > current.noisy_score)
            {
                best = Some(ScoredMove {
                    mv,
                    score,
                    noisy_score,
                });
            }
        }
        let best = best.ok_or(SearchError::NoLegalMoves)?;

        let stats = SearchStats {
            depth,
            nodes: self.nodes_searched,
            time_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        log::info!(
            "level {level}: chose {:?} (score {}) at depth {}, {} nodes in {} ms",
            best.mv,
            best.score,
            stats.depth,
            stats.nodes,
            stats.time_ms
        );

        Ok((best, stats))
    }
}
