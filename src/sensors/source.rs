//! SignalSource trait and Frame definition

use serde::{Deserialize, Serialize};

use crate::{NUM_BEND, NUM_KEYS};

/// Trait for signal acquisition backends
///
/// Analog channels are indexed bend-first with the stretch sensor last;
/// capacitive keys are indexed 0..[`NUM_KEYS`]. Implementations own any
/// hardware access; the core only consumes readings.
pub trait SignalSource {
    /// Raw ADC reading for an analog channel
    fn read_raw(&mut self, channel: usize) -> u16;

    /// Bitmask of currently touched keys (bit `i` set = key `i` touched)
    fn touched(&mut self) -> u16;

    /// Filtered capacitance for a key
    fn filtered(&mut self, key: usize) -> u16;

    /// Baseline capacitance for a key
    fn key_baseline(&mut self, key: usize) -> u16;
}

/// One complete scripted acquisition frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    /// Raw analog readings, bend channels then stretch
    #[serde(default = "default_analog")]
    pub analog: [u16; NUM_BEND + 1],
    /// Touched-key bitmask
    #[serde(default)]
    pub touched: u16,
    /// Filtered capacitance per key
    #[serde(default)]
    pub filtered: [u16; NUM_KEYS],
    /// Baseline capacitance per key
    #[serde(default)]
    pub baseline: [u16; NUM_KEYS],
}

fn default_analog() -> [u16; NUM_BEND + 1] {
    [1023; NUM_BEND + 1]
}

impl Frame {
    /// Create a resting frame: all analog channels at full scale (flat
    /// sensors) and no keys touched.
    pub fn new() -> Self {
        Self {
            analog: [1023; NUM_BEND + 1],
            touched: 0,
            filtered: [0; NUM_KEYS],
            baseline: [0; NUM_KEYS],
        }
    }

    /// Set one analog channel's raw reading
    pub fn with_analog(mut self, channel: usize, raw: u16) -> Self {
        self.analog[channel] = raw;
        self
    }

    /// Mark a key as touched with the given capacitance readings
    pub fn with_touch(mut self, key: usize, filtered: u16, baseline: u16) -> Self {
        self.touched |= 1 << key;
        self.filtered[key] = filtered;
        self.baseline[key] = baseline;
        self
    }

    /// Set a key's baseline without touching it
    pub fn with_key_baseline(mut self, key: usize, baseline: u16) -> Self {
        self.baseline[key] = baseline;
        self
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_builder() {
        let frame = Frame::new()
            .with_analog(0, 341)
            .with_touch(3, 70, 100)
            .with_touch(5, 65, 98);

        assert_eq!(frame.analog[0], 341);
        assert_eq!(frame.analog[1], 1023);
        assert_eq!(frame.touched, (1 << 3) | (1 << 5));
        assert_eq!(frame.filtered[3], 70);
        assert_eq!(frame.baseline[5], 98);
    }
}
