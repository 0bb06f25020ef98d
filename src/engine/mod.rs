//! Event decision engine for Weft
//!
//! Owns every channel's calibration and decision state and turns one
//! acquisition frame per tick into zero or more outbound events. Channels
//! are processed in a fixed order each tick: bend channels by index, then
//! the stretch sensor, then the key pads.

mod events;
mod midi;

pub use events::{CollectSink, Event, EventSink};
pub use midi::{list_ports, MidiOut};

use std::time::{Duration, Instant};

use anyhow::Result;

use crate::calibrate::{BendChannel, CalibrationStore, TouchChannel};
use crate::config::{EventConfig, WeftConfig};
use crate::mapping::midi_value;
use crate::sensors::SignalSource;
use crate::{NUM_BEND, NUM_KEYS, STRETCH_CHANNEL};

/// Bend channel worn on the right hand
pub const RIGHT: usize = 0;
/// Bend channel worn on the left hand
pub const LEFT: usize = 1;
/// Middle bend channel, doubling as a drum pad
pub const MIDDLE: usize = 2;

/// Jitter gate for continuous-controller emissions
///
/// Tracks the last value actually sent and only lets a new one through
/// when it differs by more than the significance threshold. The first
/// offered value always passes.
#[derive(Debug, Default)]
struct CcState {
    last_sent: Option<u8>,
}

impl CcState {
    fn offer(&mut self, value: u8, threshold: u8) -> Option<u8> {
        let significant = match self.last_sent {
            None => true,
            Some(last) => (value as i16 - last as i16).abs() > threshold as i16,
        };

        if significant {
            self.last_sent = Some(value);
            Some(value)
        } else {
            None
        }
    }
}

/// Latch plus cooldown for the drum-style channels
///
/// The cooldown is a deadline checked each tick rather than a blocking
/// sleep, so one channel's retrigger guard never stalls the others.
#[derive(Debug, Default)]
struct TriggerState {
    latched: bool,
    cooldown_until: Option<Instant>,
}

impl TriggerState {
    fn ready(&self, now: Instant) -> bool {
        !self.latched && self.cooldown_until.map_or(true, |deadline| now >= deadline)
    }

    fn fire(&mut self, now: Instant, cooldown: Duration) {
        self.latched = true;
        self.cooldown_until = Some(now + cooldown);
    }

    /// Clear the latch, reporting whether it was set
    fn release(&mut self) -> bool {
        std::mem::take(&mut self.latched)
    }
}

/// Per-key note state
#[derive(Debug, Default)]
struct KeyState {
    sounding: bool,
    cooldown_until: Option<Instant>,
}

/// The decision engine
pub struct Engine {
    config: WeftConfig,
    bend: Vec<BendChannel>,
    stretch: BendChannel,
    keys: Vec<TouchChannel>,
    store: Box<dyn CalibrationStore>,

    cc: Vec<CcState>,
    drum: TriggerState,
    stretch_trigger: TriggerState,
    stretched: bool,
    key_state: Vec<KeyState>,
}

impl Engine {
    /// Create an engine, seeding resistive baselines from first readings
    /// and loading key calibration from the store (healing unset entries).
    pub fn new(
        config: WeftConfig,
        source: &mut dyn SignalSource,
        mut store: Box<dyn CalibrationStore>,
    ) -> Result<Self> {
        let bend: Vec<BendChannel> = (0..NUM_BEND)
            .map(|i| BendChannel::new(&config.sensor, &config.calibration, source.read_raw(i)))
            .collect();
        let stretch = BendChannel::new(
            &config.sensor,
            &config.calibration,
            source.read_raw(STRETCH_CHANNEL),
        );

        let mut keys = Vec::with_capacity(NUM_KEYS);
        for i in 0..NUM_KEYS {
            keys.push(TouchChannel::load(
                i,
                store.as_mut(),
                config.touch.default_min_capacitance,
            )?);
        }

        Ok(Self {
            config,
            bend,
            stretch,
            keys,
            store,
            cc: (0..NUM_BEND).map(|_| CcState::default()).collect(),
            drum: TriggerState::default(),
            stretch_trigger: TriggerState::default(),
            stretched: false,
            key_state: (0..NUM_KEYS).map(|_| KeyState::default()).collect(),
        })
    }

    /// Process one sample tick.
    ///
    /// Reads every channel in the fixed order and emits whatever events the
    /// per-channel gates let through. Sink failures propagate immediately.
    pub fn tick(
        &mut self,
        source: &mut dyn SignalSource,
        sink: &mut dyn EventSink,
        now: Instant,
    ) -> Result<()> {
        for i in 0..NUM_BEND {
            let sample = self.bend[i].sample(source.read_raw(i));

            if i == MIDDLE {
                // The middle bend doubles as a drum pad, silenced while the
                // fabric is stretched
                Self::drum_tick(
                    &mut self.drum,
                    &self.config.events,
                    sample.resistance,
                    self.bend[i].min_seen(),
                    self.stretched,
                    sink,
                    now,
                )?;
            } else {
                // Flat (high resistance) maps to 0, fully bent to 127.
                // Ranges are oriented so an unexplored channel reads 0.
                let value = midi_value(
                    sample.resistance,
                    self.bend[i].max_seen(),
                    self.bend[i].min_seen(),
                    0,
                    127,
                );
                if let Some(value) = self.cc[i].offer(value, self.config.events.cc_significance_threshold)
                {
                    sink.send(Event::ControlChange {
                        controller: self.config.events.bend_controller,
                        value,
                    })?;
                }
            }
        }

        // Stretch latches first, then runs its own drum trigger
        let sample = self.stretch.sample(source.read_raw(STRETCH_CHANNEL));
        self.stretched = sample.resistance < self.config.events.latch_level;
        Self::drum_tick(
            &mut self.stretch_trigger,
            &self.config.events,
            sample.resistance,
            self.stretch.min_seen(),
            false,
            sink,
            now,
        )?;

        let touched = source.touched();
        for key in 0..NUM_KEYS {
            let active = touched & (1 << key) != 0;
            let filtered = source.filtered(key);
            let baseline = source.key_baseline(key);
            self.keys[key].update(active, filtered, baseline, self.store.as_mut())?;
            self.key_tick(key, sink, now)?;
        }

        Ok(())
    }

    fn drum_tick(
        trigger: &mut TriggerState,
        events: &EventConfig,
        resistance: f32,
        min_seen: f32,
        suppressed: bool,
        sink: &mut dyn EventSink,
        now: Instant,
    ) -> Result<()> {
        if resistance < events.trigger_level && !suppressed {
            if trigger.ready(now) {
                let velocity = midi_value(resistance, events.velocity_floor, min_seen, 1, 127);
                sink.send(Event::NoteOn {
                    pitch: events.drum_note,
                    velocity,
                })?;
                trigger.fire(now, Duration::from_millis(events.retrigger_delay_ms));
            }
        } else if resistance >= events.trigger_level && trigger.release() {
            sink.send(Event::NoteOff {
                pitch: events.drum_note,
            })?;
        }
        Ok(())
    }

    fn key_tick(&mut self, key: usize, sink: &mut dyn EventSink, now: Instant) -> Result<()> {
        let channel = &self.keys[key];
        let state = &mut self.key_state[key];
        let pitch = self.config.events.key_notes[key];

        if channel.is_active() {
            let cooled = state.cooldown_until.map_or(true, |deadline| now >= deadline);
            if !state.sounding && cooled {
                // Capacitance drop below baseline scales the velocity; the
                // deepest recorded touch is the loudest
                let velocity = midi_value(
                    channel.filtered() as f32,
                    channel.baseline() as f32,
                    channel.min_cap() as f32,
                    1,
                    127,
                );
                sink.send(Event::NoteOn { pitch, velocity })?;
                state.sounding = true;
                state.cooldown_until =
                    Some(now + Duration::from_millis(self.config.events.key_retrigger_delay_ms));
            }
        } else if state.sounding {
            sink.send(Event::NoteOff { pitch })?;
            state.sounding = false;
        }

        Ok(())
    }

    /// Calibration state of a bend channel
    pub fn bend_channel(&self, index: usize) -> &BendChannel {
        &self.bend[index]
    }

    /// Calibration state of the stretch channel
    pub fn stretch_channel(&self) -> &BendChannel {
        &self.stretch
    }

    /// Calibration state of a key pad
    pub fn key_channel(&self, index: usize) -> &TouchChannel {
        &self.keys[index]
    }

    /// Whether the fabric currently reads as stretched
    pub fn is_stretched(&self) -> bool {
        self.stretched
    }
}
