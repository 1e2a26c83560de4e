use crate::sensor::Sensor;
use std::collections::HashMap;

/// Shortest-job-first: non-preemptive. Holds the current satellite for as
/// long as it stays visible and buffered, regardless of how long the
/// connection has run — a working connection is never interrupted by a
/// shorter job appearing elsewhere. Only at a genuine switch moment
/// (no current satellite, or the current one went invisible or drained)
/// does it dispatch the eligible satellite with the *smallest* buffered
/// backlog, ties broken by order in `visible_sats`. Because a voluntary
/// switch never happens, the minimum-connection timer is honored
/// trivially: every dispatched connection runs until it ends on its own,
/// well past the floor, except the documented invisible/drained exception.
#[derive(Debug, Clone, Copy, Default)]
pub struct SjfPolicy;

impl SjfPolicy {
    pub fn decide(
        &mut self,
        visible_sats: &[u32],
        sensors: &HashMap<u32, Sensor>,
        current_sat: Option<u32>,
    ) -> Option<u32> {
        let bits_of = |id: u32| sensors.get(&id).map_or(0, Sensor::bits_buffered);
        let buffered = |id: u32| bits_of(id) > 0;

        if let Some(cur) = current_sat {
            if visible_sats.contains(&cur) && buffered(cur) {
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
        best.map(|(id, _)| id)
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
    fn picks_smallest_buffer_on_switch() {
        let mut policy = SjfPolicy;
        let sensors: HashMap<u32, Sensor> =
            [(0, sensor(0, 9)), (1, sensor(1, 2)), (2, sensor(2, 5))].into_iter().collect();
        let choice = policy.decide(&[0, 1, 2], &sensors, None);
        assert_eq!(choice, Some(1));
    }

    #[test]
    fn never_interrupts_a_working_connection_for_a_shorter_job() {
        let mut policy = SjfPolicy;
        let mut sensors: HashMap<u32, Sensor> = [(0, sensor(0, 9))].into_iter().collect();
        let initial = policy.decide(&[0], &sensors, None);
        assert_eq!(initial, Some(0));
        sensors.insert(1, sensor(1, 1));
        let held = policy.decide(&[0, 1], &sensors, Some(0));
        assert_eq!(held, Some(0));
    }

    #[test]
    fn switches_once_current_drains_to_empty() {
        let mut policy = SjfPolicy;
        let mut sensors: HashMap<u32, Sensor> = [(0, sensor(0, 9)), (1, sensor(1, 2))].into_iter().collect();
        policy.decide(&[0, 1], &sensors, None);
        sensors.get_mut(&0).unwrap().drain_buffer(9);
        let switched = policy.decide(&[0, 1], &sensors, Some(0));
        assert_eq!(switched, Some(1));
    }

    #[test]
    fn switches_once_current_goes_invisible() {
        let mut policy = SjfPolicy;
        let sensors: HashMap<u32, Sensor> = [(0, sensor(0, 9)), (1, sensor(1, 2))].into_iter().collect();
        let switched = policy.decide(&[1], &sensors, Some(0));
        assert_eq!(switched, Some(1));
    }

    #[test]
    fn ties_break_toward_visible_order() {
        let mut policy = SjfPolicy;
        let sensors: HashMap<u32, Sensor> = [(0, sensor(0, 3)), (1, sensor(1, 3))].into_iter().collect();
        let choice = policy.decide(&[1, 0], &sensors, None);
        assert_eq!(choice, Some(1));
    }
}
