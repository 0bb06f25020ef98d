//! Clamped linear interpolation

/// Map `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// Either range may be inverted; the output is always clamped to the output
/// range, including for inputs outside the input range. A degenerate input
/// range (`in_min == in_max`) returns `out_min`.
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let in_range = in_max - in_min;
    if in_range.abs() < f32::EPSILON {
        return out_min;
    }

    let normalized = (value - in_min) / in_range;
    let output = out_min + normalized * (out_max - out_min);

    output.clamp(out_min.min(out_max), out_min.max(out_max))
}

/// Map `value` onto an integer MIDI data range.
pub fn midi_value(value: f32, in_min: f32, in_max: f32, out_min: u8, out_max: u8) -> u8 {
    map_range(value, in_min, in_max, out_min as f32, out_max as f32).floor() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_range_basic() {
        assert_eq!(map_range(0.0, 0.0, 100.0, 0.0, 1.0), 0.0);
        assert_eq!(map_range(50.0, 0.0, 100.0, 0.0, 1.0), 0.5);
        assert_eq!(map_range(100.0, 0.0, 100.0, 0.0, 1.0), 1.0);
    }

    #[test]
    fn test_map_range_inverted_output() {
        // Resistance to CC: flat (high resistance) is 0, bent is 127
        assert_eq!(map_range(200.0, 200.0, 1000.0, 127.0, 0.0), 127.0);
        assert_eq!(map_range(1000.0, 200.0, 1000.0, 127.0, 0.0), 0.0);
    }

    #[test]
    fn test_map_range_inverted_input() {
        // Capacitance to velocity: baseline (high) is 1, learned minimum is 127
        assert_eq!(map_range(100.0, 100.0, 60.0, 1.0, 127.0), 1.0);
        assert_eq!(map_range(60.0, 100.0, 60.0, 1.0, 127.0), 127.0);
    }

    #[test]
    fn test_map_range_clamps_out_of_range_input() {
        assert_eq!(map_range(-50.0, 0.0, 100.0, 0.0, 1.0), 0.0);
        assert_eq!(map_range(150.0, 0.0, 100.0, 0.0, 1.0), 1.0);
        // Inverted output range still clamps to both bounds
        assert_eq!(map_range(2000.0, 200.0, 1000.0, 127.0, 0.0), 0.0);
        assert_eq!(map_range(0.0, 200.0, 1000.0, 127.0, 0.0), 127.0);
    }

    #[test]
    fn test_map_range_degenerate_input_returns_out_min() {
        assert_eq!(map_range(42.0, 10.0, 10.0, 1.0, 127.0), 1.0);
        assert_eq!(map_range(42.0, 10.0, 10.0, 127.0, 0.0), 127.0);
    }

    #[test]
    fn test_midi_value_rounds_down() {
        assert_eq!(midi_value(50.0, 0.0, 100.0, 0, 127), 63);
        assert_eq!(midi_value(70.0, 100.0, 60.0, 1, 127), 95);
    }

    #[test]
    fn test_midi_value_bounds() {
        assert_eq!(midi_value(0.0, 0.0, 100.0, 1, 127), 1);
        assert_eq!(midi_value(100.0, 0.0, 100.0, 1, 127), 127);
        assert_eq!(midi_value(500.0, 0.0, 100.0, 1, 127), 127);
    }
}
