use super::MIN_CONNECTION_STEPS;
use crate::sensor::Sensor;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default)]
struct StationState {
    connection_start_step: u64,
}

/// Shortest-remaining-time-first: preemptive. Like `sjf`, the current
/// satellite is held for at least [`MIN_CONNECTION_STEPS`], but once that
/// timer expires the station re-evaluates the *whole* eligible set,
/// including the current satellite, and may switch away even though the
/// current connection is still visible and non-empty.
#[derive(Debug, Clone, Default)]
pub struct SrtfPolicy {
    stations: HashMap<u32, StationState>,
}

impl SrtfPolicy {
    pub fn decide(
        &mut self,
        visible_sats: &[u32],
        sensors: &HashMap<u32, Sensor>,
        gnd_id: u32,
        current_sat: Option<u32>,
        step: u64,
    ) -> Option<u32> {
        let station = self.stations.entry(gnd_id).or_default();
        let bits_of = |id: u32| sensors.get(&id).map_or(0, Sensor::bits_buffered);
        let buffered = |id: u32| bits_of(id) > 0;

        if let Some(cur) = current_sat {
            let within_slice = step.saturating_sub(station.connection_start_step) < MIN_CONNECTION_STEPS;
            if within_slice && visible_sats.contains(&cur) && buffered(cur) {
                return Some(cur);
            }
        }

        let mut best: Option<(u32, u64)> = None;
        for &id in visible_sats {
            if !buffered(id) {
                continue;
            }
            let bits = bits_of(id);
            if best.is_none_or(|(_, best_bits)| bits < best_bits) {
                best = Some((id, bits));
            }
        }
        let choice = best.map(|(id, _)| id);
        if choice != current_sat {
            station.connection_start_step = step;
        }
        choice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn sensor(id: u32, bits: u64) -> Sensor {
        let now = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
        let mut s = Sensor::new(id, bits, u64::MAX, (0.0, 0.0, 0.0), now);
        if bits > 0 {
            s.trigger_sense();
            s.update(now, (0.0, 0.0, 0.0));
        }
        s
    }

    #[test]
    fn preempts_current_for_shorter_job_once_timer_expires() {
        let mut policy = SrtfPolicy::default();
        let mut sensors: HashMap<u32, Sensor> = [(0, sensor(0, 9))].into_iter().collect();
        let initial = policy.decide(&[0], &sensors, 4, None, 0);
        assert_eq!(initial, Some(0));

        sensors.insert(1, sensor(1, 1));
        let held = policy.decide(&[0, 1], &sensors, 4, Some(0), 10);
        assert_eq!(held, Some(0), "timer has not expired yet, no preemption");

        let preempted = policy.decide(&[0, 1], &sensors, 4, Some(0), 30);
        assert_eq!(preempted, Some(1));
    }

    #[test]
    fn keeps_current_at_expiry_if_still_shortest() {
        let mut policy = SrtfPolicy::default();
        let sensors: HashMap<u32, Sensor> =
            [(0, sensor(0, 1)), (1, sensor(1, 9))].into_iter().collect();
        policy.decide(&[0, 1], &sensors, 4, None, 0);
        let choice = policy.decide(&[0, 1], &sensors, 4, Some(0), 30);
        assert_eq!(choice, Some(0));
    }

    #[test]
    fn ties_break_toward_visible_order() {
        let mut policy = SrtfPolicy::default();
        let sensors: HashMap<u32, Sensor> = [(0, sensor(0, 3)), (1, sensor(1, 3))].into_iter().collect();
        let choice = policy.decide(&[1, 0], &sensors, 4, None, 0);
        assert_eq!(choice, Some(1));
    }
}
