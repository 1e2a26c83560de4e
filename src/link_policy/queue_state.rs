use std::collections::{HashSet, VecDeque};

/// Per-ground-station FIFO queue shared by the `fifo` and `roundrobin`
/// variants: an ordered sequence of satellite ids by first-visibility,
/// plus a membership set so re-appearing satellites aren't queued twice
/// (invariant: no satellite id appears twice in any policy queue).
#[derive(Debug, Clone, Default)]
pub struct QueueState {
    queue: VecDeque<u32>,
    in_queue: HashSet<u32>,
}

impl QueueState {
    /// Admits newly visible satellites and drops ones no longer visible.
    pub fn sync_visibility(&mut self, visible_sats: &[u32]) {
        for &sat_id in visible_sats {
            if self.in_queue.insert(sat_id) {
                self.queue.push_back(sat_id);
            }
        }
        let visible: HashSet<u32> = visible_sats.iter().copied().collect();
        self.queue.retain(|id| visible.contains(id));
        self.in_queue.retain(|id| visible.contains(id));
    }

    /// Pops from the front, skipping ids that fail `eligible`, and
    /// returns the first eligible id found (leaving ineligible ids in
    /// place at the front for a future call, since they remain visible
    /// but are merely drained empty right now).
    pub fn next_eligible(&self, eligible: impl Fn(u32) -> bool) -> Option<u32> {
        self.queue.iter().copied().find(|&id| eligible(id))
    }

    /// Moves `id` to the back of the queue, used by round-robin when a
    /// time slice expires so the next eligible entry is dispatched
    /// instead of re-selecting the one just preempted.
    pub fn rotate_to_back(&mut self, id: u32) {
        if let Some(pos) = self.queue.iter().position(|&q| q == id) {
            self.queue.remove(pos);
            self.queue.push_back(id);
        }
    }
}
