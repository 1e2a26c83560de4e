use crate::math::EciPosn;
use chrono::{DateTime, Utc};

/// Emitted by [`Sensor::update`] when a capture could not fit in the
/// buffer. Carries cumulative lost data in megabytes, matching the
/// `buffer-overflow-sat-<id>` analytics stream in the external interfaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorOverflow {
    pub sat_id: u32,
    pub total_lost_mb: f64,
}

/// Per-satellite data buffer with capped capacity and overflow accounting.
///
/// Overflow is charged against the whole attempted capture
/// (`bits_per_sense`), not the overflowing remainder: any step whose
/// capture could not land is fully lost, which gives a clean "missed
/// frame" interpretation to `total_bits_lost`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sensor {
    sat_id: u32,
    bits_per_sense: u64,
    bits_buffered: u64,
    max_buffer_capacity: u64,
    total_bits_lost: u64,
    sense_trigger: bool,
    prev_sense_posn: EciPosn,
    prev_sense_datetime: DateTime<Utc>,
}

impl Sensor {
    pub fn new(
        sat_id: u32,
        bits_per_sense: u64,
        max_buffer_capacity: u64,
        init_posn: EciPosn,
        init_time: DateTime<Utc>,
    ) -> Self {
        Self {
            sat_id,
            bits_per_sense,
            bits_buffered: 0,
            max_buffer_capacity,
            total_bits_lost: 0,
            sense_trigger: false,
            prev_sense_posn: init_posn,
            prev_sense_datetime: init_time,
        }
    }

    pub fn sat_id(&self) -> u32 {
        self.sat_id
    }

    pub fn bits_buffered(&self) -> u64 {
        self.bits_buffered
    }

    pub fn max_buffer_capacity(&self) -> u64 {
        self.max_buffer_capacity
    }

    pub fn total_bits_lost(&self) -> u64 {
        self.total_bits_lost
    }

    pub fn sense_trigger(&self) -> bool {
        self.sense_trigger
    }

    pub fn prev_sense_posn(&self) -> EciPosn {
        self.prev_sense_posn
    }

    pub fn prev_sense_datetime(&self) -> DateTime<Utc> {
        self.prev_sense_datetime
    }

    /// Used only by spacing strategies that march the reference point
    /// forward without a successful capture (frame-spaced's lead-satellite
    /// bookkeeping on non-triggering steps).
    pub fn set_prev_sense(&mut self, posn: EciPosn, t: DateTime<Utc>) {
        self.prev_sense_posn = posn;
        self.prev_sense_datetime = t;
    }

    /// Latches a capture request. Idempotent within a step: calling this
    /// twice before the next `update` has no additional effect.
    pub fn trigger_sense(&mut self) {
        self.sense_trigger = true;
    }

    /// Removes up to `bits` from the buffer, returning the amount actually
    /// removed.
    pub fn drain_buffer(&mut self, bits: u64) -> u64 {
        let drained = bits.min(self.bits_buffered);
        self.bits_buffered -= drained;
        drained
    }

    /// Consumes a pending `sense_trigger`, applying overflow accounting if
    /// the capture does not fit.
    pub fn update(&mut self, now: DateTime<Utc>, curr_posn: EciPosn) -> Option<SensorOverflow> {
        if !self.sense_trigger {
            return None;
        }
        let overflow = {
            let new_total = self.bits_buffered.saturating_add(self.bits_per_sense);
            if new_total > self.max_buffer_capacity {
                self.bits_buffered = self.max_buffer_capacity;
                self.total_bits_lost = self.total_bits_lost.saturating_add(self.bits_per_sense);
                Some(SensorOverflow {
                    sat_id: self.sat_id,
                    total_lost_mb: self.total_bits_lost as f64 / (8.0 * 1024.0 * 1024.0),
                })
            } else {
                self.bits_buffered = new_total;
                None
            }
        };
        self.prev_sense_posn = curr_posn;
        self.prev_sense_datetime = now;
        self.sense_trigger = false;
        overflow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z").unwrap().with_timezone(&Utc)
    }

    const MB: u64 = 8 * 1024 * 1024;

    #[test]
    fn overflow_scenario_from_spec() {
        // bits_per_sense = 8 Mb, max_buffer_capacity = 20 Mb, bits_buffered = 16 Mb.
        let mut s = Sensor::new(1, 8 * MB, 20 * MB, (0.0, 0.0, 0.0), t0());
        s.bits_buffered = 16 * MB;
        s.trigger_sense();
        let overflow = s.update(t0(), (1.0, 1.0, 1.0)).expect("overflow expected");
        assert_eq!(s.bits_buffered(), 20 * MB);
        assert_eq!(s.total_bits_lost(), 8 * MB);
        assert_eq!(overflow.sat_id, 1);
        assert!(!s.sense_trigger());
    }

    #[test]
    fn drain_scenario_from_spec() {
        // bits_buffered = 10 Mb, drain request 12 Mb: returns 10 Mb drained, leaves 0.
        let mut s = Sensor::new(1, MB, u64::MAX, (0.0, 0.0, 0.0), t0());
        s.bits_buffered = 10 * MB;
        let drained = s.drain_buffer(12 * MB);
        assert_eq!(drained, 10 * MB);
        assert_eq!(s.bits_buffered(), 0);
    }

    #[test]
    fn update_without_trigger_is_noop() {
        let mut s = Sensor::new(1, MB, u64::MAX, (0.0, 0.0, 0.0), t0());
        assert!(s.update(t0(), (1.0, 0.0, 0.0)).is_none());
        assert_eq!(s.bits_buffered(), 0);
    }

    #[test]
    fn update_within_capacity_grows_buffer_and_clears_trigger() {
        let mut s = Sensor::new(1, MB, 10 * MB, (0.0, 0.0, 0.0), t0());
        s.trigger_sense();
        assert!(s.update(t0(), (1.0, 0.0, 0.0)).is_none());
        assert_eq!(s.bits_buffered(), MB);
        assert!(!s.sense_trigger());
    }

    #[test]
    fn loss_is_monotone_across_repeated_overflow() {
        let mut s = Sensor::new(1, MB, 0, (0.0, 0.0, 0.0), t0());
        let mut last_lost = 0;
        for _ in 0..5 {
            s.trigger_sense();
            s.update(t0(), (0.0, 0.0, 0.0));
            assert!(s.total_bits_lost() >= last_lost);
            last_lost = s.total_bits_lost();
        }
        assert_eq!(last_lost, 5 * MB);
    }

    #[test]
    fn trigger_sense_is_idempotent_within_a_step() {
        let mut s = Sensor::new(1, MB, 10 * MB, (0.0, 0.0, 0.0), t0());
        s.trigger_sense();
        s.trigger_sense();
        s.update(t0(), (0.0, 0.0, 0.0));
        assert_eq!(s.bits_buffered(), MB);
    }
}
