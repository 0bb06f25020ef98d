//! Resistive channel calibration
//!
//! Converts raw divider readings into sensor resistance and tracks each
//! channel's adaptive baseline. The baseline follows the resting value
//! while the sensor is flat and freezes while it is bent, so an active bend
//! cannot drag the detection threshold down with it.

use crate::config::{CalibrationConfig, FilterConfig, SensorConfig};

/// One converted reading from a resistive channel
#[derive(Debug, Clone, Copy)]
pub struct BendSample {
    /// Raw ADC value
    pub raw: u16,
    /// Voltage across the sensor
    pub vout: f32,
    /// Derived sensor resistance, clamped to the configured maximum
    pub resistance: f32,
}

/// Calibration state for one bend or stretch channel
pub struct BendChannel {
    vin: f32,
    r0: f32,
    resolution: f32,
    max_resistance: f32,
    alpha: f32,
    bend_ratio: f32,
    filter: FilterConfig,

    baseline: f32,
    frozen: bool,
    min_seen: f32,
    max_seen: f32,
    output: f32,
}

impl BendChannel {
    /// Create a channel seeded from its first raw reading.
    ///
    /// The device may boot with the sensor already bent, so a low first
    /// reading falls back to the configured initial baseline instead of
    /// locking in a bent value.
    pub fn new(sensor: &SensorConfig, calibration: &CalibrationConfig, first_raw: u16) -> Self {
        let mut channel = Self {
            vin: sensor.input_voltage,
            r0: sensor.reference_resistance,
            resolution: sensor.analog_resolution as f32,
            max_resistance: calibration.max_resistance,
            alpha: calibration.alpha,
            bend_ratio: calibration.bend_threshold_ratio,
            filter: calibration.filter.clone(),
            baseline: 0.0,
            frozen: false,
            min_seen: calibration.max_resistance,
            max_seen: calibration.init_baseline,
            output: 0.0,
        };

        let first = channel.convert(first_raw);
        channel.baseline = if first.resistance > calibration.init_baseline {
            first.resistance
        } else {
            calibration.init_baseline
        };
        channel.output = first.resistance;

        channel
    }

    /// Convert a raw reading without touching channel state.
    ///
    /// The sensor sits on the low side of the divider, so `vout` rises with
    /// resistance; a reading at the input voltage clamps to the maximum
    /// representable resistance (flat sensor).
    fn convert(&self, raw: u16) -> BendSample {
        let vout = self.vin * raw as f32 / self.resolution;
        let resistance = if self.vin - vout < f32::EPSILON {
            self.max_resistance
        } else {
            (self.r0 * vout / (self.vin - vout)).min(self.max_resistance)
        };
        BendSample {
            raw,
            vout,
            resistance,
        }
    }

    /// Process one tick: convert, widen the session bounds, filter, and
    /// update the baseline.
    pub fn sample(&mut self, raw: u16) -> BendSample {
        let sample = self.convert(raw);

        if sample.resistance < self.min_seen {
            self.min_seen = sample.resistance;
        }
        if sample.resistance > self.max_seen {
            self.max_seen = sample.resistance;
        }

        self.output = if self.filter.enabled {
            apply_filter(&self.filter, sample.resistance, self.output)
        } else {
            sample.resistance
        };

        self.update_baseline();

        sample
    }

    fn update_baseline(&mut self) {
        if !self.is_bent() {
            // Only a flat sensor is trusted to reflect the resting value
            self.baseline = (1.0 - self.alpha) * self.baseline + self.alpha * self.output;
            self.frozen = false;
        } else if !self.frozen {
            self.frozen = true;
        }
    }

    /// Whether the channel currently reads as bent
    pub fn is_bent(&self) -> bool {
        self.output < self.bend_ratio * self.baseline
    }

    /// Whether baseline updates are currently suspended
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Learned resting resistance
    pub fn baseline(&self) -> f32 {
        self.baseline
    }

    /// Smoothed output resistance (raw resistance when the filter is off)
    pub fn output(&self) -> f32 {
        self.output
    }

    /// Lowest resistance observed this session
    pub fn min_seen(&self) -> f32 {
        self.min_seen
    }

    /// Highest resistance observed this session
    pub fn max_seen(&self) -> f32 {
        self.max_seen
    }
}

/// Spike rejection, dead zone, and first-order smoothing.
///
/// Deltas at or above the spike threshold are discarded outright, deltas
/// inside the dead zone are ignored, anything between is smoothed in.
fn apply_filter(filter: &FilterConfig, resistance: f32, prev: f32) -> f32 {
    let delta = (resistance - prev).abs();
    if delta >= filter.spike_threshold || delta <= filter.dead_zone {
        return prev;
    }
    filter.smoothing_alpha * resistance + (1.0 - filter.smoothing_alpha) * prev
}
