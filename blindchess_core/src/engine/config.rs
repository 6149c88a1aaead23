use crate::logic::board::PieceKind;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const VAL_PAWN: i32 = 100;
pub const VAL_KNIGHT: i32 = 320;
pub const VAL_BISHOP: i32 = 330;
pub const VAL_ROOK: i32 = 500;
pub const VAL_QUEEN: i32 = 900;
pub const VAL_KING: i32 = 20_000;

pub const CHECK_PENALTY: i32 = 50;
pub const MATE_SCORE: i32 = 10_000;
pub const MAX_SEARCH_DEPTH: u8 = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Evaluation Parameters
    pub val_pawn: i32,
    pub val_knight: i32,
    pub val_bishop: i32,
    pub val_rook: i32,
    pub val_queen: i32,
    pub val_king: i32,
    pub check_penalty: i32,
    pub mate_score: i32,

    // Search Parameters
    pub depth_cap: u8,
    pub alpha_beta: bool, // false: full-width negamax, same scores
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            val_pawn: VAL_PAWN,
            val_knight: VAL_KNIGHT,
            val_bishop: VAL_BISHOP,
            val_rook: VAL_ROOK,
            val_queen: VAL_QUEEN,
            val_king: VAL_KING,
            check_penalty: CHECK_PENALTY,
            mate_score: MATE_SCORE,

            depth_cap: MAX_SEARCH_DEPTH,
            alpha_beta: true,
        }
    }
}

/// Tuning file format: piece values and the check penalty are scale factors
/// applied to the defaults, everything else is absolute.
#[derive(Deserialize)]
struct EngineConfigJson {
    val_pawn: Option<f32>,
    val_knight: Option<f32>,
    val_bishop: Option<f32>,
    val_rook: Option<f32>,
    val_queen: Option<f32>,
    val_king: Option<f32>,
    check_penalty: Option<f32>,

    mate_score: Option<i32>,
    depth_cap: Option<u8>,
    alpha_beta: Option<bool>,
}

impl EngineConfig {
    pub fn load_from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        let json_config: EngineConfigJson = serde_json::from_str(json_str)?;
        let default = Self::default();

        Ok(Self {
            val_pawn: apply_scale(default.val_pawn, json_config.val_pawn),
            val_knight: apply_scale(default.val_knight, json_config.val_knight),
            val_bishop: apply_scale(default.val_bishop, json_config.val_bishop),
            val_rook: apply_scale(default.val_rook, json_config.val_rook),
            val_queen: apply_scale(default.val_queen, json_config.val_queen),
            val_king: apply_scale(default.val_king, json_config.val_king),
            check_penalty: apply_scale(default.check_penalty, json_config.check_penalty),
            mate_score: json_config.mate_score.unwrap_or(default.mate_score),

            depth_cap: json_config
                .depth_cap
                .map_or(default.depth_cap, |d| d.clamp(1, MAX_SEARCH_DEPTH)),
            alpha_beta: json_config.alpha_beta.unwrap_or(default.alpha_beta),
        })
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::load_from_json(&contents)?)
    }

    pub const fn piece_value(&self, kind: PieceKind) -> i32 {
        match kind {
            PieceKind::Pawn => self.val_pawn,
            PieceKind::Knight => self.val_knight,
            PieceKind::Bishop => self.val_bishop,
            PieceKind::Rook => self.val_rook,
            PieceKind::Queen => self.val_queen,
            PieceKind::King => self.val_king,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn apply_scale(default_val: i32, scale: Option<f32>) -> i32 {
    scale.map_or(default_val, |s| (default_val as f32 * s) as i32)
}
