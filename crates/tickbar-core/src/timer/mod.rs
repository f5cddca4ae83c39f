mod duration;
mod engine;
mod render;
mod state;

pub use duration::{format_clock, parse_duration};
pub use engine::{Poll, TimerEngine, TimerSnapshot};
pub use render::render;
pub use state::{TimerKind, TimerMode, TimerState};
