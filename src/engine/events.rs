//! Outbound events and the sink boundary

use anyhow::Result;

/// Musical control events emitted by the decision engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Start a note: pitch (0-127), velocity (0-127)
    NoteOn { pitch: u8, velocity: u8 },
    /// Stop a note: pitch (0-127)
    NoteOff { pitch: u8 },
    /// Continuous controller change: controller (0-127), value (0-127)
    ControlChange { controller: u8, value: u8 },
}

impl Event {
    /// Encode as raw MIDI bytes on the given channel (0-15).
    pub fn to_bytes(&self, channel: u8) -> [u8; 3] {
        match *self {
            Event::NoteOn { pitch, velocity } => {
                [0x90 | (channel & 0x0F), pitch & 0x7F, velocity & 0x7F]
            }
            Event::NoteOff { pitch } => [0x80 | (channel & 0x0F), pitch & 0x7F, 0],
            Event::ControlChange { controller, value } => {
                [0xB0 | (channel & 0x0F), controller & 0x7F, value & 0x7F]
            }
        }
    }
}

/// Trait for event consumers
///
/// Sinks deliver events in submission order. A send failure is terminal:
/// the engine propagates it out of the tick for the harness to handle
/// rather than dropping events silently.
pub trait EventSink {
    /// Deliver one event
    fn send(&mut self, event: Event) -> Result<()>;
}

/// Sink that records events, for tests and dry runs
#[derive(Debug, Default)]
pub struct CollectSink {
    /// Events in submission order
    pub events: Vec<Event>,
}

impl EventSink for CollectSink {
    fn send(&mut self, event: Event) -> Result<()> {
        self.events.push(event);
        Ok(())
    }
}
