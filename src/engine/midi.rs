//! MIDI output for Weft
//!
//! Delivers engine events to a MIDI port.

use std::sync::mpsc::{self, Sender};
use std::thread;

use anyhow::{anyhow, Result};
use midir::MidiOutput;

use super::events::{Event, EventSink};

enum MidiOutCommand {
    Send([u8; 3]),
    Stop,
}

/// Event sink backed by a MIDI output port
pub struct MidiOut {
    sender: Sender<MidiOutCommand>,
    channel: u8,
}

impl MidiOut {
    /// Connect to a MIDI output port and send on the given channel.
    ///
    /// Picks the first port whose name contains `port_name`, or the first
    /// available port when no name is given. Fails when no ports exist:
    /// without a sink there is nowhere for events to go, and the harness
    /// must know that rather than play into the void.
    pub fn connect(port_name: Option<&str>, channel: u8) -> Result<Self> {
        let midi_out = MidiOutput::new("Weft MIDI Output").map_err(|e| anyhow!("{e}"))?;
        let ports = midi_out.ports();

        if ports.is_empty() {
            return Err(anyhow!("No MIDI output ports available"));
        }

        let port = if let Some(name) = port_name {
            ports
                .iter()
                .find(|p| {
                    midi_out
                        .port_name(p)
                        .map(|n| n.contains(name))
                        .unwrap_or(false)
                })
                .ok_or_else(|| anyhow!("MIDI port '{}' not found", name))?
                .clone()
        } else {
            ports[0].clone()
        };

        let port_name_actual = midi_out.port_name(&port)?;
        let conn = midi_out
            .connect(&port, "weft-output")
            .map_err(|e| anyhow!("{e}"))?;

        let (sender, receiver) = mpsc::channel::<MidiOutCommand>();

        // Sender thread keeps port I/O off the tick loop
        thread::spawn(move || {
            let mut conn = conn;
            while let Ok(cmd) = receiver.recv() {
                match cmd {
                    MidiOutCommand::Send(bytes) => {
                        let _ = conn.send(&bytes);
                    }
                    MidiOutCommand::Stop => break,
                }
            }
        });

        eprintln!("MIDI output connected to: {}", port_name_actual);

        Ok(Self { sender, channel })
    }

    /// Stop the sender thread.
    pub fn stop(&self) {
        let _ = self.sender.send(MidiOutCommand::Stop);
    }
}

impl EventSink for MidiOut {
    fn send(&mut self, event: Event) -> Result<()> {
        self.sender
            .send(MidiOutCommand::Send(event.to_bytes(self.channel)))?;
        Ok(())
    }
}

impl Drop for MidiOut {
    fn drop(&mut self) {
        self.stop();
    }
}

/// List available MIDI output ports.
pub fn list_ports() -> Result<Vec<String>> {
    let midi_out = MidiOutput::new("Weft MIDI List").map_err(|e| anyhow!("{e}"))?;
    let ports = midi_out.ports();

    let names: Vec<String> = ports
        .iter()
        .filter_map(|p| midi_out.port_name(p).ok())
        .collect();

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_ports() {
        // Just verify it doesn't panic
        let result = list_ports();
        assert!(result.is_ok());
    }
}
