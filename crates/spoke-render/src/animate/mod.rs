//! Time-driven animation: a generic tween scheduler and the two-sweep reveal built on it.

pub mod scheduler;
pub mod sweep;

pub use scheduler::{Timeline, TweenId};
pub use sweep::{SweepAnimator, SweepPhase};
