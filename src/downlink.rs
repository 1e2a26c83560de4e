use crate::sensor::Sensor;
use std::collections::HashMap;

/// One ground station's downlink result for a step: `gnd_id` drained
/// `bits_drained` bits from `sat_id`'s sensor. Emitted only when the
/// station's policy picked a satellite this step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownlinkRecord {
    pub gnd_id: u32,
    pub sat_id: u32,
    pub bits_drained: u64,
}

/// Drains the picked sensor's buffer by `link_rate * step_duration` bits,
/// the fixed per-step capacity of a ground-to-satellite link. Returns
/// `None` when the station has no current selection; nothing is drained
/// in that case.
pub fn drain(
    gnd_id: u32,
    current_sat: Option<u32>,
    sensors: &mut HashMap<u32, Sensor>,
    link_rate_bps: f64,
    step_duration_secs: f64,
) -> Option<DownlinkRecord> {
    let sat_id = current_sat?;
    let sensor = sensors.get_mut(&sat_id)?;
    let capacity = (link_rate_bps * step_duration_secs).max(0.0) as u64;
    let bits_drained = sensor.drain_buffer(capacity);
    Some(DownlinkRecord { gnd_id, sat_id, bits_drained })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z").unwrap().with_timezone(&Utc)
    }

    #[test]
    fn drains_at_most_the_link_capacity_this_step() {
        let mut sensors = HashMap::new();
        let mut sensor = Sensor::new(3, 1_000, u64::MAX, (0.0, 0.0, 0.0), t0());
        sensor.trigger_sense();
        sensor.update(t0(), (0.0, 0.0, 0.0));
        sensors.insert(3, sensor);

        let record = drain(7, Some(3), &mut sensors, 100.0, 1.0).unwrap();
        assert_eq!(record.gnd_id, 7);
        assert_eq!(record.sat_id, 3);
        assert_eq!(record.bits_drained, 100);
        assert_eq!(sensors[&3].bits_buffered(), 900);
    }

    #[test]
    fn drains_only_what_is_buffered_when_capacity_exceeds_it() {
        let mut sensors = HashMap::new();
        let mut sensor = Sensor::new(3, 50, u64::MAX, (0.0, 0.0, 0.0), t0());
        sensor.trigger_sense();
        sensor.update(t0(), (0.0, 0.0, 0.0));
        sensors.insert(3, sensor);

        let record = drain(7, Some(3), &mut sensors, 100.0, 1.0).unwrap();
        assert_eq!(record.bits_drained, 50);
        assert_eq!(sensors[&3].bits_buffered(), 0);
    }

    #[test]
    fn returns_none_when_station_has_no_current_selection() {
        let mut sensors = HashMap::new();
        assert!(drain(7, None, &mut sensors, 100.0, 1.0).is_none());
    }
}
