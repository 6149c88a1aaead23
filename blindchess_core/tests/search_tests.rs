use blindchess_core::engine::config::EngineConfig;
use blindchess_core::engine::search::{NegamaxEngine, INFINITY};
use blindchess_core::engine::{SearchError, Searcher, StrengthLevel};
use blindchess_core::logic::{ChessGame, Rules};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

fn seeded_engine(seed: u64) -> NegamaxEngine {
    NegamaxEngine::with_rng(Arc::new(EngineConfig::default()), StdRng::seed_from_u64(seed))
}

fn level(n: i64) -> StrengthLevel {
    StrengthLevel::new(n).unwrap()
}

#[test]
fn start_position_strongest_level_returns_opening_move() {
    let mut game = ChessGame::new();
    let before = game.snapshot();
    let legal: Vec<String> = game.legal_moves().into_iter().map(|mv| mv.notation).collect();
    assert_eq!(legal.len(), 20);

    let mut engine = seeded_engine(1);
    let (best, stats) = engine.select_move(&mut game, level(20)).unwrap();

    assert!(legal.contains(&best.mv.notation));
    assert_eq!(stats.depth, 3);
    assert!(stats.nodes > 20);
    assert_eq!(game.snapshot(), before);
}

#[test]
fn selected_move_is_always_legal_and_position_restored() {
    let fens = [
        "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3",
        "4k3/7p/8/3q4/8/2N5/7P/4K3 w - - 0 1",
        "8/P6k/8/8/8/8/8/K7 w - - 0 1",
        "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
    ];
    for fen in fens {
        for n in [1, 5, 10] {
            let mut game = ChessGame::from_fen(fen).unwrap();
            let before = game.snapshot();
            let legal: Vec<String> =
                game.legal_moves().into_iter().map(|mv| mv.notation).collect();

            let mut engine = seeded_engine(42);
            let (best, _) = engine.select_move(&mut game, level(n)).unwrap();

            assert!(legal.contains(&best.mv.notation), "{fen} at level {n}");
            assert_eq!(game.snapshot(), before, "{fen} at level {n}");
        }
    }
}

#[test]
fn single_legal_move_is_played_at_any_level() {
    // Black king is boxed in by the queen; only a7a6 is legal.
    let fen = "7k/p4Q2/8/P7/8/8/8/K7 b - - 0 1";
    let game = ChessGame::from_fen(fen).unwrap();
    assert_eq!(game.legal_moves().len(), 1);

    for n in 1..=20 {
        let mut game = ChessGame::from_fen(fen).unwrap();
        let mut engine = seeded_engine(u64::try_from(n).unwrap());
        let (best, _) = engine.select_move(&mut game, level(n)).unwrap();
        assert_eq!(best.mv.notation, "a7a6");
    }
}

#[test]
fn checkmated_side_reports_no_legal_moves() {
    let mut game = ChessGame::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
    let before = game.snapshot();
    assert!(game.legal_moves().is_empty());

    let mut engine = seeded_engine(5);
    let result = engine.select_move(&mut game, level(10));
    assert_eq!(result.map(|(best, _)| best.mv), Err(SearchError::NoLegalMoves));
    assert_eq!(game.snapshot(), before);
}

#[test]
fn stalemate_reports_no_legal_moves() {
    let mut game = ChessGame::from_fen("7k/5Q2/8/8/8/8/8/K7 b - - 0 1").unwrap();
    let mut engine = seeded_engine(5);
    assert!(matches!(
        engine.select_move(&mut game, level(3)),
        Err(SearchError::NoLegalMoves)
    ));
}

#[test]
fn finds_back_rank_mate() {
    for seed in 0..5 {
        let mut game = ChessGame::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let mut engine = seeded_engine(seed);
        let (best, _) = engine.select_move(&mut game, level(20)).unwrap();
        assert_eq!(best.mv.notation, "a1a8");
        assert_eq!(best.score, 10_000);
    }
}

#[test]
fn depth_one_grabs_hanging_queen() {
    // Knight on c3 can take the undefended queen on d5.
    let mut game = ChessGame::from_fen("4k3/7p/8/3q4/8/2N5/7P/4K3 w - - 0 1").unwrap();
    let mut engine = seeded_engine(0).without_noise();
    let (best, stats) = engine.select_move(&mut game, level(1)).unwrap();
    assert_eq!(stats.depth, 1);
    assert_eq!(best.mv.notation, "c3d5");
    assert_eq!(best.score, 320);
}

#[test]
fn pruning_matches_full_width_on_real_positions() {
    let fens = [
        "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3",
        "4k3/7p/8/3q4/8/2N5/7P/4K3 w - - 0 1",
        "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1",
    ];
    for fen in fens {
        for depth in 1..=2 {
            let mut game = ChessGame::from_fen(fen).unwrap();
            let before = game.snapshot();

            let mut pruned = seeded_engine(0);
            let full_config = EngineConfig {
                alpha_beta: false,
                ..EngineConfig::default()
            };
            let mut full = NegamaxEngine::with_rng(Arc::new(full_config), StdRng::seed_from_u64(0));

            let a = pruned.negamax(&mut game, depth, -INFINITY, INFINITY).unwrap();
            let b = full.negamax(&mut game, depth, -INFINITY, INFINITY).unwrap();
            assert_eq!(a, b, "{fen} at depth {depth}");
            assert!(pruned.nodes_searched() <= full.nodes_searched());
            assert_eq!(game.snapshot(), before);
        }
    }
}

#[test]
fn noise_free_root_scores_are_reproducible() {
    let mut game = ChessGame::new();
    let mut first = seeded_engine(1);
    let mut second = seeded_engine(2);
    let a: Vec<(String, i32)> = first
        .root_scores(&mut game, 2)
        .unwrap()
        .into_iter()
        .map(|(mv, score)| (mv.notation, score))
        .collect();
    let b: Vec<(String, i32)> = second
        .root_scores(&mut game, 2)
        .unwrap()
        .into_iter()
        .map(|(mv, score)| (mv.notation, score))
        .collect();
    assert_eq!(a, b);
    assert!(a.iter().all(|(_, score)| *score == 0));
}
