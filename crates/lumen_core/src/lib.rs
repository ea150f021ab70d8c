//! lumen_core: frame timing, input state and logger setup shared by the
//! other lumen crates.

pub mod logging;
pub mod time;

#[cfg(feature = "input")]
pub mod input;

pub use time::{Time, TimeClock};

#[cfg(feature = "input")]
pub use input::{Action, InputState, KeyCode, KeyInput, Modifiers};
