mod phase;
mod session;

pub use phase::BreathPhase;
pub use session::{format_elapsed, BreathingSession};
