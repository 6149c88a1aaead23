use anyhow::{Context, Result};
use blindchess_core::engine::config::EngineConfig;
use blindchess_core::engine::StrengthLevel;
use blindchess_core::logic::Color;
use clap::{Parser, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

mod app;

use app::{Reply, Trainer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Side {
    White,
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Self::White,
            Side::Black => Self::Black,
        }
    }
}

/// Blindfold chess trainer: play by typing moves against an engine of
/// adjustable strength.
#[derive(Debug, Parser)]
#[command(name = "blindchess", version)]
struct Args {
    /// Engine strength, 1 (beginner) to 20 (strongest); clamped to that range.
    #[arg(short, long, default_value_t = 5, allow_negative_numbers = true)]
    level: i64,

    /// The colour you play.
    #[arg(short, long, value_enum, default_value_t = Side::White)]
    color: Side,

    /// JSON tuning file for the engine.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start from this FEN instead of the initial position.
    #[arg(long)]
    fen: Option<String>,
}

fn print_reply(out: &mut impl Write, reply: &Reply) -> io::Result<()> {
    for line in &reply.lines {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load_from_path(path)
            .with_context(|| format!("loading engine config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let level = StrengthLevel::clamped(args.level);
    if i64::from(level.get()) != args.level {
        log::warn!("level {} is out of range, using {level}", args.level);
    }

    let mut trainer = Trainer::new(config, level, args.color.into(), args.fen)?;
    let mut out = io::stdout().lock();
    print_reply(&mut out, &trainer.start())?;

    for line in io::stdin().lock().lines() {
        let reply = trainer.handle(&line?);
        print_reply(&mut out, &reply)?;
        if reply.quit {
            break;
        }
    }

    log::info!(
        "leaving at level {} with position {}",
        trainer.level(),
        trainer.game().board_text()
    );
    Ok(())
}
