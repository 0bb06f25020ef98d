//! Capacitive key calibration
//!
//! Each key tracks whether it is touched and how hard. Touch depth shows up
//! as a capacitance drop below the pad's baseline; the deepest drop ever
//! seen is recorded per key and persisted immediately, so velocity scaling
//! keeps improving across sessions.

use super::store::{CalibrationStore, StoreError, SENTINEL};

/// Calibration state for one capacitive key pad
pub struct TouchChannel {
    index: usize,
    active: bool,
    filtered: u16,
    baseline: u16,
    min_cap: u16,
}

impl TouchChannel {
    /// Load a channel, substituting and persisting the default minimum when
    /// the stored entry is unset.
    ///
    /// Writing the default back makes the store self-healing: a second load
    /// sees a real value and never has to special-case the sentinel again.
    pub fn load(
        index: usize,
        store: &mut dyn CalibrationStore,
        default_min: u16,
    ) -> Result<Self, StoreError> {
        let mut min_cap = store.get(index)?;
        if min_cap == SENTINEL {
            min_cap = default_min;
            store.put(index, min_cap)?;
        }

        Ok(Self {
            index,
            active: false,
            filtered: 0,
            baseline: 0,
            min_cap,
        })
    }

    /// Fold one acquisition frame into the channel.
    ///
    /// While touched, a filtered reading below the recorded minimum lowers
    /// the record and persists it at once. While untouched the filtered
    /// reading carries no signal and is held at zero.
    pub fn update(
        &mut self,
        touched: bool,
        filtered: u16,
        baseline: u16,
        store: &mut dyn CalibrationStore,
    ) -> Result<(), StoreError> {
        self.active = touched;
        self.baseline = baseline;

        if touched {
            self.filtered = filtered;
            if filtered < self.min_cap {
                self.min_cap = filtered;
                store.put(self.index, filtered)?;
            }
        } else {
            self.filtered = 0;
        }

        Ok(())
    }

    /// Whether the key is currently touched
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Filtered capacitance, zero while untouched
    pub fn filtered(&self) -> u16 {
        self.filtered
    }

    /// Baseline capacitance reported by the sensor
    pub fn baseline(&self) -> u16 {
        self.baseline
    }

    /// Deepest touch recorded for this key
    pub fn min_cap(&self) -> u16 {
        self.min_cap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibrate::MemoryStore;

    const DEFAULT_MIN: u16 = 80;

    #[test]
    fn test_load_heals_unset_entry() {
        let mut store = MemoryStore::new(12);

        let channel = TouchChannel::load(0, &mut store, DEFAULT_MIN).unwrap();
        assert_eq!(channel.min_cap(), DEFAULT_MIN);
        // Default was written back, not just returned
        assert_eq!(store.get(0).unwrap(), DEFAULT_MIN);
    }

    #[test]
    fn test_second_load_reads_stored_value() {
        let mut store = MemoryStore::new(12);
        store.put(0, 65).unwrap();

        let channel = TouchChannel::load(0, &mut store, DEFAULT_MIN).unwrap();
        assert_eq!(channel.min_cap(), 65);
        assert_eq!(store.get(0).unwrap(), 65);
    }

    #[test]
    fn test_deeper_touch_lowers_and_persists_minimum() {
        let mut store = MemoryStore::new(12);
        let mut channel = TouchChannel::load(0, &mut store, DEFAULT_MIN).unwrap();

        channel.update(true, 70, 100, &mut store).unwrap();
        assert_eq!(channel.min_cap(), 70);
        assert_eq!(store.get(0).unwrap(), 70);

        // Shallower touches leave the record alone
        channel.update(true, 75, 100, &mut store).unwrap();
        assert_eq!(channel.min_cap(), 70);
        assert_eq!(store.get(0).unwrap(), 70);
    }

    #[test]
    fn test_minimum_is_non_increasing() {
        let mut store = MemoryStore::new(12);
        let mut channel = TouchChannel::load(0, &mut store, DEFAULT_MIN).unwrap();

        let mut prev = channel.min_cap();
        for filtered in [78, 82, 60, 90, 55, 55, 70] {
            channel.update(true, filtered, 100, &mut store).unwrap();
            assert!(channel.min_cap() <= prev);
            prev = channel.min_cap();
        }
        assert_eq!(channel.min_cap(), 55);
    }

    #[test]
    fn test_untouched_reading_is_zeroed() {
        let mut store = MemoryStore::new(12);
        let mut channel = TouchChannel::load(0, &mut store, DEFAULT_MIN).unwrap();

        channel.update(true, 70, 100, &mut store).unwrap();
        assert_eq!(channel.filtered(), 70);

        channel.update(false, 70, 100, &mut store).unwrap();
        assert!(!channel.is_active());
        assert_eq!(channel.filtered(), 0);
        // The learned minimum is untouched by release
        assert_eq!(channel.min_cap(), 70);
    }

    #[test]
    fn test_wipe_then_reload_restores_default() {
        let mut store = MemoryStore::new(12);
        let mut channel = TouchChannel::load(0, &mut store, DEFAULT_MIN).unwrap();
        channel.update(true, 60, 100, &mut store).unwrap();

        store.wipe().unwrap();
        let channel = TouchChannel::load(0, &mut store, DEFAULT_MIN).unwrap();
        assert_eq!(channel.min_cap(), DEFAULT_MIN);
    }
}
