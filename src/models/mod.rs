//! Core data models.

mod ids;
mod rank;
mod stats;
mod tier;
mod window;

pub use ids::*;
pub use rank::*;
pub use stats::*;
pub use tier::*;
pub use window::*;
