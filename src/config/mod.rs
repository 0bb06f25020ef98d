//! Configuration loading and validation

mod schema;

pub use schema::*;

use anyhow::Result;
use std::path::Path;

/// Load configuration from a YAML file
pub fn load_config(path: &Path) -> Result<WeftConfig> {
    let contents = std::fs::read_to_string(path)?;
    let config: WeftConfig = serde_yaml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_minimal_config() {
        let yaml = r#"
sensor:
  input_voltage: 5.0
  reference_resistance: 10000.0

events:
  midi_channel: 2
"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.sensor.input_voltage, 5.0);
        assert_eq!(config.events.midi_channel, 2);
        // Unspecified sections fall back to defaults
        assert_eq!(config.calibration.alpha, 0.01);
        assert_eq!(config.touch.default_min_capacitance, 80);
    }

    #[test]
    fn test_load_empty_config() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{}").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.sensor.input_voltage, 3.3);
        assert_eq!(config.events.cc_significance_threshold, 2);
    }
}
