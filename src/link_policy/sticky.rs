use crate::sensor::Sensor;
use std::collections::HashMap;

/// Greedy, no minimum-connection timer. Holds the current satellite while
/// it stays visible; otherwise picks the visible, non-occupied satellite
/// with the largest buffered backlog, ties broken by visible-set order.
/// The only variant that consults the `occupied` flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct StickyPolicy;

impl StickyPolicy {
    pub fn decide(
        &mut self,
        visible_sats: &[u32],
        sensors: &HashMap<u32, Sensor>,
        occupied: &HashMap<u32, bool>,
        current_sat: Option<u32>,
    ) -> Option<u32> {
        if let Some(cur) = current_sat {
            if visible_sats.contains(&cur) {
                return Some(cur);
            }
        }
        // `Iterator::max_by_key` keeps the *last* maximal element on ties;
        // ties here must go to whichever id appears first in visible_sats.
        let mut best: Option<(u32, u64)> = None;
        for &id in visible_sats {
            if occupied.get(&id).copied().unwrap_or(false) {
                continue;
            }
            let bits = sensors.get(&id).map_or(0, Sensor::bits_buffered);
            if bits == 0 {
                continue;
            }
            if best.is_none_or(|(_, best_bits)| bits > best_bits) {
                best = Some((id, bits));
            }
        }
        best.map(|(id, _)| id)
    }
}
