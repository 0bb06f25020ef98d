//! Weft - MIDI events from wearable fabric sensors
//!
//! Turns readings from a fabric controller into musical control events.
//! Resistive bend and stretch sensors become modulation and drum triggers,
//! capacitive key pads become notes with pressure-derived velocity.

pub mod calibrate;
pub mod config;
pub mod engine;
pub mod mapping;
pub mod notes;
pub mod sensors;

pub use config::WeftConfig;
pub use engine::Engine;

/// Number of resistive bend channels.
pub const NUM_BEND: usize = 3;

/// Number of capacitive key pads.
pub const NUM_KEYS: usize = 12;

/// Analog channel index of the stretch sensor (after the bend channels).
pub const STRETCH_CHANNEL: usize = NUM_BEND;
