use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("strength level {0} is outside {min}..={max}", min = StrengthLevel::MIN, max = StrengthLevel::MAX)]
    OutOfRange(i64),
}

/// Playing strength from 1 (beginner) to 20 (strongest).
///
/// One dial drives both knobs: deeper search and less noise as it rises.
///
/// | Level  | Depth | Noise range |
/// |--------|-------|-------------|
/// | 1..=4  | 1     | 20..=17     |
/// | 5..=9  | 2     | 16..=12     |
/// | 10..=20| 3     | 11..=1      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct StrengthLevel(u8);

impl StrengthLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 20;

    pub fn new(level: i64) -> Result<Self, LevelError> {
        u8::try_from(level)
            .ok()
            .filter(|l| (Self::MIN..=Self::MAX).contains(l))
            .map(Self)
            .ok_or(LevelError::OutOfRange(level))
    }

    /// Like [`StrengthLevel::new`] but pulls out-of-range input to the nearest bound.
    #[must_use]
    pub fn clamped(level: i64) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let level = level.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u8;
        Self(level)
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// `min(3, level / 5 + 1)` plies.
    pub const fn depth(self) -> u8 {
        let depth = self.0 / 5 + 1;
        if depth > 3 {
            3
        } else {
            depth
        }
    }

    /// Width of the uniform noise added to each root score: `21 - level`.
    pub const fn noise_range(self) -> u8 {
        Self::MAX + 1 - self.0
    }
}

impl Default for StrengthLevel {
    fn default() -> Self {
        Self(5)
    }
}

impl TryFrom<i64> for StrengthLevel {
    type Error = LevelError;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<StrengthLevel> for u8 {
    fn from(level: StrengthLevel) -> Self {
        level.0
    }
}

impl fmt::Display for StrengthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
