//! MIDI note numbers
//!
//! Constant lookup table for the octaves the fabric can reach. Names follow
//! scientific pitch notation with a `B` suffix for flats (`D4B` = D♭4).

pub const C2: u8 = 36;
pub const D2B: u8 = 37;
pub const D2: u8 = 38;
pub const E2B: u8 = 39;
pub const E2: u8 = 40;
pub const F2: u8 = 41;
pub const G2B: u8 = 42;
pub const G2: u8 = 43;
pub const A2B: u8 = 44;
pub const A2: u8 = 45;
pub const B2B: u8 = 46;
pub const B2: u8 = 47;

pub const C3: u8 = 48;
pub const D3B: u8 = 49;
pub const D3: u8 = 50;
pub const E3B: u8 = 51;
pub const E3: u8 = 52;
pub const F3: u8 = 53;
pub const G3B: u8 = 54;
pub const G3: u8 = 55;
pub const A3B: u8 = 56;
pub const A3: u8 = 57;
pub const B3B: u8 = 58;
pub const B3: u8 = 59;

pub const C4: u8 = 60;
pub const D4B: u8 = 61;
pub const D4: u8 = 62;
pub const E4B: u8 = 63;
pub const E4: u8 = 64;
pub const F4: u8 = 65;
pub const G4B: u8 = 66;
pub const G4: u8 = 67;
pub const A4B: u8 = 68;
pub const A4: u8 = 69;
pub const B4B: u8 = 70;
pub const B4: u8 = 71;

pub const C5: u8 = 72;

/// Default key pad to note assignment.
///
/// Physical index map (hex numbering):
///     0  1  2  3
///   4  5  6  7
///     8  9  A  B
pub const DEFAULT_KEY_NOTES: [u8; 12] = [
    D3, G3B, B3, D4,
    F3, A3, D4B, F4,
    C3, E3, A3B, C4,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_notes_in_midi_range() {
        for &note in DEFAULT_KEY_NOTES.iter() {
            assert!(note <= 127);
        }
    }

    #[test]
    fn test_octave_spacing() {
        assert_eq!(C3 - C2, 12);
        assert_eq!(C4 - C3, 12);
        assert_eq!(C5 - C4, 12);
    }
}
