//! Configuration schema definitions

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::notes::DEFAULT_KEY_NOTES;
use crate::NUM_KEYS;

/// Main configuration for Weft
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeftConfig {
    /// Analog acquisition settings
    #[serde(default)]
    pub sensor: SensorConfig,

    /// Resistive channel calibration settings
    #[serde(default)]
    pub calibration: CalibrationConfig,

    /// Capacitive key settings
    #[serde(default)]
    pub touch: TouchConfig,

    /// Event decision and MIDI settings
    #[serde(default)]
    pub events: EventConfig,
}

impl WeftConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.sensor.input_voltage <= 0.0 {
            bail!("Input voltage must be positive");
        }
        if self.sensor.reference_resistance <= 0.0 {
            bail!("Reference resistance must be positive");
        }
        if self.sensor.analog_resolution == 0 {
            bail!("Analog resolution must be positive");
        }

        if self.calibration.alpha <= 0.0 || self.calibration.alpha >= 1.0 {
            bail!("Calibration alpha must be between 0 and 1 exclusive");
        }
        if self.calibration.bend_threshold_ratio <= 0.0 || self.calibration.bend_threshold_ratio >= 1.0 {
            bail!("Bend threshold ratio must be between 0 and 1 exclusive");
        }
        if self.calibration.init_baseline > self.calibration.max_resistance {
            bail!("Initial baseline cannot exceed maximum resistance");
        }
        let filter = &self.calibration.filter;
        if filter.smoothing_alpha <= 0.0 || filter.smoothing_alpha > 1.0 {
            bail!("Filter smoothing alpha must be between 0 exclusive and 1 inclusive");
        }
        if filter.dead_zone >= filter.spike_threshold {
            bail!("Filter dead zone must be below the spike threshold");
        }

        if self.events.midi_channel > 15 {
            bail!("MIDI channel must be between 0 and 15");
        }
        if self.events.trigger_level >= self.events.latch_level {
            bail!("Trigger level must be below the stretch latch level");
        }
        if self.events.key_notes.len() != NUM_KEYS {
            bail!(
                "Expected {} key notes, got {}",
                NUM_KEYS,
                self.events.key_notes.len()
            );
        }
        for &note in &self.events.key_notes {
            if note > 127 {
                bail!("Key note {} is outside the MIDI range", note);
            }
        }

        Ok(())
    }
}

/// Analog acquisition configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Voltage applied to the sensor dividers (default: 3.3)
    #[serde(default = "default_input_voltage")]
    pub input_voltage: f32,

    /// Known divider resistance used to derive sensor resistance (default: 1000)
    #[serde(default = "default_reference_resistance")]
    pub reference_resistance: f32,

    /// Full-scale ADC reading (default: 1023)
    #[serde(default = "default_analog_resolution")]
    pub analog_resolution: u16,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            input_voltage: default_input_voltage(),
            reference_resistance: default_reference_resistance(),
            analog_resolution: default_analog_resolution(),
        }
    }
}

fn default_input_voltage() -> f32 { 3.3 }
fn default_reference_resistance() -> f32 { 1000.0 }
fn default_analog_resolution() -> u16 { 1023 }

/// Resistive channel calibration configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Baseline drift rate while the channel is flat (default: 0.01)
    #[serde(default = "default_alpha")]
    pub alpha: f32,

    /// A channel counts as bent below this fraction of its baseline (default: 0.85)
    #[serde(default = "default_bend_threshold_ratio")]
    pub bend_threshold_ratio: f32,

    /// Baseline assumed when the device boots with a bent sensor (default: 500)
    #[serde(default = "default_init_baseline")]
    pub init_baseline: f32,

    /// Highest representable resistance, reported for a flat sensor (default: 1000)
    #[serde(default = "default_max_resistance")]
    pub max_resistance: f32,

    /// Optional smoothing filter on raw resistance
    #[serde(default)]
    pub filter: FilterConfig,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            bend_threshold_ratio: default_bend_threshold_ratio(),
            init_baseline: default_init_baseline(),
            max_resistance: default_max_resistance(),
            filter: FilterConfig::default(),
        }
    }
}

fn default_alpha() -> f32 { 0.01 }
fn default_bend_threshold_ratio() -> f32 { 0.85 }
fn default_init_baseline() -> f32 { 500.0 }
fn default_max_resistance() -> f32 { 1000.0 }

/// Smoothing filter configuration for resistive channels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Apply the filter at all (default: false, pass readings through)
    #[serde(default)]
    pub enabled: bool,

    /// First-order smoothing factor (default: 0.3)
    #[serde(default = "default_smoothing_alpha")]
    pub smoothing_alpha: f32,

    /// Deltas at or above this are discarded as spikes (default: 100)
    #[serde(default = "default_spike_threshold")]
    pub spike_threshold: f32,

    /// Deltas at or below this are ignored (default: 5)
    #[serde(default = "default_dead_zone")]
    pub dead_zone: f32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smoothing_alpha: default_smoothing_alpha(),
            spike_threshold: default_spike_threshold(),
            dead_zone: default_dead_zone(),
        }
    }
}

fn default_smoothing_alpha() -> f32 { 0.3 }
fn default_spike_threshold() -> f32 { 100.0 }
fn default_dead_zone() -> f32 { 5.0 }

/// Capacitive key configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TouchConfig {
    /// Minimum capacitance assumed for keys with no stored record (default: 80)
    #[serde(default = "default_min_capacitance")]
    pub default_min_capacitance: u16,

    /// Where learned minimums are persisted
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            default_min_capacitance: default_min_capacitance(),
            store_path: default_store_path(),
        }
    }
}

fn default_min_capacitance() -> u16 { 80 }
fn default_store_path() -> PathBuf { PathBuf::from("weft-calibration.json") }

/// Event decision and MIDI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    /// MIDI channel events are sent on, 0-15 (default: 0)
    #[serde(default)]
    pub midi_channel: u8,

    /// Controller number for bend modulation (default: 1, mod wheel)
    #[serde(default = "default_bend_controller")]
    pub bend_controller: u8,

    /// Minimum change in mapped CC value before an event is sent (default: 2)
    #[serde(default = "default_cc_significance")]
    pub cc_significance_threshold: u8,

    /// Note triggered by the drum and stretch channels (default: 36, C2)
    #[serde(default = "default_drum_note")]
    pub drum_note: u8,

    /// Resistance below which the drum channels trigger (default: 100)
    #[serde(default = "default_trigger_level")]
    pub trigger_level: f32,

    /// Resistance below which the stretch channel counts as stretched (default: 250)
    #[serde(default = "default_latch_level")]
    pub latch_level: f32,

    /// Resistance mapped to the softest drum velocity (default: 70)
    #[serde(default = "default_velocity_floor")]
    pub velocity_floor: f32,

    /// Cooldown after a drum trigger in milliseconds (default: 50)
    #[serde(default = "default_retrigger_delay_ms")]
    pub retrigger_delay_ms: u64,

    /// Cooldown after a key note in milliseconds (default: 100)
    #[serde(default = "default_key_retrigger_delay_ms")]
    pub key_retrigger_delay_ms: u64,

    /// Note assignment per key pad
    #[serde(default = "default_key_notes")]
    pub key_notes: Vec<u8>,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            midi_channel: 0,
            bend_controller: default_bend_controller(),
            cc_significance_threshold: default_cc_significance(),
            drum_note: default_drum_note(),
            trigger_level: default_trigger_level(),
            latch_level: default_latch_level(),
            velocity_floor: default_velocity_floor(),
            retrigger_delay_ms: default_retrigger_delay_ms(),
            key_retrigger_delay_ms: default_key_retrigger_delay_ms(),
            key_notes: default_key_notes(),
        }
    }
}

fn default_bend_controller() -> u8 { 1 }
fn default_cc_significance() -> u8 { 2 }
fn default_drum_note() -> u8 { 36 }
fn default_trigger_level() -> f32 { 100.0 }
fn default_latch_level() -> f32 { 250.0 }
fn default_velocity_floor() -> f32 { 70.0 }
fn default_retrigger_delay_ms() -> u64 { 50 }
fn default_key_retrigger_delay_ms() -> u64 { 100 }
fn default_key_notes() -> Vec<u8> { DEFAULT_KEY_NOTES.to_vec() }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(WeftConfig::default().validate().is_ok());
    }

    #[test]
    fn test_sensor_defaults() {
        let yaml = "input_voltage: 5.0";
        let config: SensorConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.input_voltage, 5.0);
        assert_eq!(config.analog_resolution, 1023); // default
    }

    #[test]
    fn test_invalid_input_voltage() {
        let mut config = WeftConfig::default();
        config.sensor.input_voltage = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_alpha() {
        let mut config = WeftConfig::default();
        config.calibration.alpha = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_midi_channel() {
        let mut config = WeftConfig::default();
        config.events.midi_channel = 16;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_key_note_count() {
        let mut config = WeftConfig::default();
        config.events.key_notes.pop();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_trigger_above_latch_level() {
        let mut config = WeftConfig::default();
        config.events.trigger_level = 300.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_event_config_from_yaml() {
        let yaml = r#"
midi_channel: 3
drum_note: 35
key_notes: [50, 54, 59, 62, 53, 57, 61, 65, 48, 52, 56, 60]
"#;
        let config: EventConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.midi_channel, 3);
        assert_eq!(config.drum_note, 35);
        assert_eq!(config.key_notes.len(), 12);
        assert_eq!(config.bend_controller, 1); // default
    }
}
