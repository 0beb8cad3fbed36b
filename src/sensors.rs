//! Live sensor values reported by the board.

/// Number of general sensor slots (A0..A19).
pub const SENSOR_SLOTS: usize = 20;

/// Number of AIDesk value slots (AD0..AD5).
pub const DESK_SLOTS: usize = 6;

/// The most recent values reported by the board.
///
/// Slots follow the firmware's fixed layout: A0..A3 are the local bank's
/// digital inputs, A4..A7 its analog inputs, A8..A11 and A12..A15 the same
/// for the remote bank; A16..A19 are reserved and never written. AD0..AD5
/// hold signed values published by AIDesk functions.
///
/// The report decoder is the only writer; reporters read through shared
/// borrows. Every slot is zero until the first status report arrives and
/// drops back to zero when the session disconnects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorTable {
    sensors: [i32; SENSOR_SLOTS],
    desk: [i32; DESK_SLOTS],
}

impl SensorTable {
    /// Create a table with every slot zeroed.
    pub fn new() -> Self {
        Self {
            sensors: [0; SENSOR_SLOTS],
            desk: [0; DESK_SLOTS],
        }
    }

    /// Read a general sensor slot; out-of-range slots read as zero.
    #[inline]
    pub fn sensor(&self, slot: usize) -> i32 {
        self.sensors.get(slot).copied().unwrap_or(0)
    }

    /// Read an AIDesk slot; out-of-range slots read as zero.
    #[inline]
    pub fn desk(&self, slot: usize) -> i32 {
        self.desk.get(slot).copied().unwrap_or(0)
    }

    pub(crate) fn set_sensor(&mut self, slot: usize, value: i32) {
        if let Some(entry) = self.sensors.get_mut(slot) {
            *entry = value;
        }
    }

    pub(crate) fn set_desk(&mut self, slot: usize, value: i32) {
        if let Some(entry) = self.desk.get_mut(slot) {
            *entry = value;
        }
    }

    /// Drop every slot back to zero.
    pub(crate) fn reset(&mut self) {
        self.sensors = [0; SENSOR_SLOTS];
        self.desk = [0; DESK_SLOTS];
    }
}

impl Default for SensorTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_zeroed() {
        let table = SensorTable::new();
        for slot in 0..SENSOR_SLOTS {
            assert_eq!(table.sensor(slot), 0);
        }
        for slot in 0..DESK_SLOTS {
            assert_eq!(table.desk(slot), 0);
        }
    }

    #[test]
    fn test_set_and_read() {
        let mut table = SensorTable::new();
        table.set_sensor(4, 512);
        table.set_desk(2, -150);

        assert_eq!(table.sensor(4), 512);
        assert_eq!(table.desk(2), -150);
    }

    #[test]
    fn test_out_of_range_slots_are_inert() {
        let mut table = SensorTable::new();
        table.set_sensor(SENSOR_SLOTS, 99);
        table.set_desk(DESK_SLOTS, 99);

        assert_eq!(table.sensor(SENSOR_SLOTS), 0);
        assert_eq!(table.desk(DESK_SLOTS), 0);
    }

    #[test]
    fn test_reset_zeroes_everything() {
        let mut table = SensorTable::new();
        table.set_sensor(0, 1);
        table.set_sensor(19, 7);
        table.set_desk(5, -3);

        table.reset();

        assert_eq!(table, SensorTable::new());
    }
}
