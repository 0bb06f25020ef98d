//! Scripted signal source
//!
//! Plays back a sequence of frames, one per tick. Once the script runs out
//! the last frame repeats, which reads as the performer holding still.

use std::path::Path;

use anyhow::Result;

use super::source::{Frame, SignalSource};

/// Source that replays scripted frames
pub struct ReplaySource {
    frames: Vec<Frame>,
    cursor: usize,
}

impl ReplaySource {
    /// Create a replay source from a frame script.
    ///
    /// An empty script behaves like a single resting frame.
    pub fn new(frames: Vec<Frame>) -> Self {
        let frames = if frames.is_empty() {
            vec![Frame::new()]
        } else {
            frames
        };
        Self { frames, cursor: 0 }
    }

    /// Load a frame script from a YAML file (a list of frames; omitted
    /// fields fall back to resting values).
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let frames: Vec<Frame> = serde_yaml::from_str(&contents)?;
        Ok(Self::new(frames))
    }

    /// Step to the next scripted frame (call once per tick)
    pub fn advance(&mut self) {
        if self.cursor + 1 < self.frames.len() {
            self.cursor += 1;
        }
    }

    /// Whether the script has frames left after the current one
    pub fn is_exhausted(&self) -> bool {
        self.cursor + 1 >= self.frames.len()
    }

    fn current(&self) -> &Frame {
        &self.frames[self.cursor]
    }
}

impl SignalSource for ReplaySource {
    fn read_raw(&mut self, channel: usize) -> u16 {
        self.current().analog[channel]
    }

    fn touched(&mut self) -> u16 {
        self.current().touched
    }

    fn filtered(&mut self, key: usize) -> u16 {
        self.current().filtered[key]
    }

    fn key_baseline(&mut self, key: usize) -> u16 {
        self.current().baseline[key]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_advances_and_holds_last() {
        let mut source = ReplaySource::new(vec![
            Frame::new().with_analog(0, 100),
            Frame::new().with_analog(0, 200),
        ]);

        assert_eq!(source.read_raw(0), 100);
        source.advance();
        assert_eq!(source.read_raw(0), 200);
        assert!(source.is_exhausted());

        // Holds the final frame once exhausted
        source.advance();
        assert_eq!(source.read_raw(0), 200);
    }

    #[test]
    fn test_empty_script_is_resting() {
        let mut source = ReplaySource::new(vec![]);
        assert_eq!(source.read_raw(0), 1023);
        assert_eq!(source.touched(), 0);
    }
}
