use super::queue_state::QueueState;
use crate::sensor::Sensor;
use std::collections::HashMap;

/// Per-station FIFO ordered by first-visibility. Non-preemptive and
/// completion-driven: no minimum-connection timer, the station simply
/// holds the current satellite until it goes invisible or drains to
/// zero, then serves the next eligible queue entry.
#[derive(Debug, Clone, Default)]
pub struct FifoPolicy {
    stations: HashMap<u32, QueueState>,
}

impl FifoPolicy {
    pub fn decide(
        &mut self,
        visible_sats: &[u32],
        sensors: &HashMap<u32, Sensor>,
        gnd_id: u32,
        current_sat: Option<u32>,
    ) -> Option<u32> {
        let station = self.stations.entry(gnd_id).or_default();
        station.sync_visibility(visible_sats);

        let buffered = |id: u32| sensors.get(&id).is_some_and(|s| s.bits_buffered() > 0);

        if let Some(cur) = current_sat {
            if visible_sats.contains(&cur) && buffered(cur) {
                return Some(cur);
            }
        }
        station.next_eligible(|id| visible_sats.contains(&id) && buffered(id))
    }
}
