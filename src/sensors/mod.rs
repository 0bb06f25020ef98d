//! Signal acquisition for Weft
//!
//! The core never touches hardware registers; it polls a [`SignalSource`]
//! for analog and capacitive readings. The replay source scripts frames for
//! tests, monitoring, and hardware-less runs.

mod replay;
mod source;

pub use replay::ReplaySource;
pub use source::{Frame, SignalSource};
