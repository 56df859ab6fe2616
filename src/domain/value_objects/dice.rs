//! D20 rolls and the outcome bands described to the narrator
//!
//! Bands are advisory text handed to the language model. Nothing in the
//! engine branches on them; they only shape how the narration should read.

use serde::{Deserialize, Serialize};

pub const D20_MIN: u8 = 1;
pub const D20_MAX: u8 = 20;

/// A single face of a twenty-sided die
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct D20Roll(u8);

impl D20Roll {
    /// Returns `None` for values outside 1..=20
    pub fn new(value: u8) -> Option<Self> {
        (D20_MIN..=D20_MAX).contains(&value).then_some(Self(value))
    }

    /// Clamp an arbitrary value onto the die
    pub fn saturating(value: u8) -> Self {
        Self(value.clamp(D20_MIN, D20_MAX))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn is_critical(&self) -> bool {
        self.0 == D20_MAX
    }
}

impl TryFrom<u8> for D20Roll {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("D20 roll must be between 1 and 20, got {}", value))
    }
}

impl From<D20Roll> for u8 {
    fn from(roll: D20Roll) -> u8 {
        roll.0
    }
}

impl std::fmt::Display for D20Roll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An inclusive range of roll values and how outcomes in it should read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollBand {
    pub min: u8,
    pub max: u8,
    pub outcome: String,
}

impl RollBand {
    pub fn new(min: u8, max: u8, outcome: impl Into<String>) -> Self {
        Self {
            min,
            max,
            outcome: outcome.into(),
        }
    }

    pub fn contains(&self, roll: D20Roll) -> bool {
        (self.min..=self.max).contains(&roll.value())
    }

    /// Range label as shown in prompts, e.g. "1-5" or "20"
    pub fn label(&self) -> String {
        if self.min == self.max {
            self.min.to_string()
        } else {
            format!("{}-{}", self.min, self.max)
        }
    }
}

/// The standard five bands used unless a scenario words its own
pub fn default_roll_bands() -> Vec<RollBand> {
    vec![
        RollBand::new(1, 5, "Failure with consequences"),
        RollBand::new(6, 10, "Partial success with complications"),
        RollBand::new(11, 15, "Success with minor drawbacks"),
        RollBand::new(16, 19, "Complete success"),
        RollBand::new(20, 20, "Critical success with additional benefits"),
    ]
}

pub fn band_for_roll(bands: &[RollBand], roll: D20Roll) -> Option<&RollBand> {
    bands.iter().find(|band| band.contains(roll))
}
