//! Value objects - Immutable objects defined by their attributes

mod dice;
mod ids;

pub use dice::{band_for_roll, default_roll_bands, D20Roll, RollBand, D20_MAX, D20_MIN};
pub use ids::*;
