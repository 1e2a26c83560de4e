//! C5: the link scheduling policy interface and its six variants.
//!
//! Same closed-enum shape as [`crate::spacing`]: each variant owns its own
//! per-ground-station state, and the driver holds one [`LinkPolicy`] value
//! for the whole run.

mod fifo;
mod queue_state;
mod random;
mod round_robin;
mod sjf;
mod srtf;
mod sticky;

use crate::sensor::Sensor;
use std::collections::HashMap;
use strum_macros::Display;

pub use fifo::FifoPolicy;
pub use random::RandomPolicy;
pub use round_robin::RoundRobinPolicy;
pub use sjf::SjfPolicy;
pub use srtf::SrtfPolicy;
pub use sticky::StickyPolicy;

/// Minimum number of steps a station must hold a connection before a
/// timer-driven policy is allowed to switch it away voluntarily. Not
/// consulted by `sticky` or `fifo`, which are greedy/completion-driven.
pub(crate) const MIN_CONNECTION_STEPS: u64 = 30;

/// Selects which link policy variant to construct; parsed from the CLI's
/// `policy` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PolicyKind {
    #[strum(to_string = "sticky")]
    Sticky,
    #[strum(to_string = "fifo")]
    Fifo,
    #[strum(to_string = "round-robin")]
    RoundRobin,
    #[strum(to_string = "random")]
    Random,
    #[strum(to_string = "sjf")]
    Sjf,
    #[strum(to_string = "srtf")]
    Srtf,
}

impl PolicyKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "sticky" | "greedy" => Some(PolicyKind::Sticky),
            "fifo" => Some(PolicyKind::Fifo),
            "round-robin" | "roundrobin" | "rr" => Some(PolicyKind::RoundRobin),
            "random" => Some(PolicyKind::Random),
            "sjf" | "shortestjobfirst" | "shortest-job-first" => Some(PolicyKind::Sjf),
            "srtf" | "shortestremainingtime" | "shortest-remaining-time" => Some(PolicyKind::Srtf),
            _ => None,
        }
    }
}

impl Default for PolicyKind {
    fn default() -> Self {
        PolicyKind::Sticky
    }
}

#[derive(Debug, Clone)]
pub enum LinkPolicy {
    Sticky(StickyPolicy),
    Fifo(FifoPolicy),
    RoundRobin(RoundRobinPolicy),
    Random(RandomPolicy),
    Sjf(SjfPolicy),
    Srtf(SrtfPolicy),
}

impl LinkPolicy {
    pub fn new(kind: PolicyKind) -> Self {
        match kind {
            PolicyKind::Sticky => LinkPolicy::Sticky(StickyPolicy::default()),
            PolicyKind::Fifo => LinkPolicy::Fifo(FifoPolicy::default()),
            PolicyKind::RoundRobin => LinkPolicy::RoundRobin(RoundRobinPolicy::default()),
            PolicyKind::Random => LinkPolicy::Random(RandomPolicy::default()),
            PolicyKind::Sjf => LinkPolicy::Sjf(SjfPolicy::default()),
            PolicyKind::Srtf => LinkPolicy::Srtf(SrtfPolicy::default()),
        }
    }

    /// Chooses which visible satellite (if any) a ground station should be
    /// connected to this step. `occupied` marks satellites already claimed
    /// by another station earlier in the same step's per-station pass (only
    /// `sticky` consults it; the other variants are queue-ordered and so
    /// never contend for the same satellite within one step).
    #[allow(clippy::too_many_arguments)]
    pub fn decide(
        &mut self,
        visible_sats: &[u32],
        sensors: &HashMap<u32, Sensor>,
        occupied: &HashMap<u32, bool>,
        gnd_id: u32,
        current_sat: Option<u32>,
        step: u64,
    ) -> Option<u32> {
        match self {
            LinkPolicy::Sticky(p) => p.decide(visible_sats, sensors, occupied, current_sat),
            LinkPolicy::Fifo(p) => p.decide(visible_sats, sensors, gnd_id, current_sat),
            LinkPolicy::RoundRobin(p) => p.decide(visible_sats, sensors, gnd_id, current_sat, step),
            LinkPolicy::Random(p) => p.decide(visible_sats, sensors, gnd_id, current_sat, step),
            LinkPolicy::Sjf(p) => p.decide(visible_sats, sensors, current_sat),
            LinkPolicy::Srtf(p) => p.decide(visible_sats, sensors, gnd_id, current_sat, step),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_documented_policy_aliases() {
        for alias in ["sticky", "greedy"] {
            assert_eq!(PolicyKind::parse(alias), Some(PolicyKind::Sticky));
        }
        assert_eq!(PolicyKind::parse("fifo"), Some(PolicyKind::Fifo));
        for alias in ["round-robin", "roundrobin", "rr"] {
            assert_eq!(PolicyKind::parse(alias), Some(PolicyKind::RoundRobin));
        }
        assert_eq!(PolicyKind::parse("random"), Some(PolicyKind::Random));
        for alias in ["sjf", "shortestjobfirst", "shortest-job-first"] {
            assert_eq!(PolicyKind::parse(alias), Some(PolicyKind::Sjf));
        }
        for alias in ["srtf", "shortestremainingtime", "shortest-remaining-time"] {
            assert_eq!(PolicyKind::parse(alias), Some(PolicyKind::Srtf));
        }
        assert_eq!(PolicyKind::parse("nonsense"), None);
    }

    #[test]
    fn default_policy_kind_is_sticky() {
        assert_eq!(PolicyKind::default(), PolicyKind::Sticky);
    }
}
