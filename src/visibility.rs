//! The visibility oracle contract (C5) and a deterministic reference
//! implementation. Real visibility geometry is an external collaborator;
//! this crate only depends on the trait below.

use crate::satellite::Satellite;
use chrono::{DateTime, Utc};

/// Supplies, per step and per ground station, the ordered set of visible
/// satellites. Ordering must be stable across calls when the visible set
/// is unchanged — policies rely on this for tie-breaking.
pub trait VisibilityOracle {
    fn visible(&self, gnd_id: u32, satellites: &[Satellite], now: DateTime<Utc>) -> Vec<u32>;
}

/// A deterministic stand-in for real elevation-mask visibility geometry:
/// a satellite is visible to a ground station whenever its altitude is
/// within a configured swath of the station's nominal longitude band,
/// approximated here by an angular sweep keyed on `(gnd_id, sat_id, now)`.
///
/// This is a reference implementation for standalone runs and tests, not
/// a physical model; it exists purely to satisfy the trait contract
/// deterministically.
pub struct ElevationMaskVisibility {
    /// Each ground station sees one third of the constellation at a time,
    /// rotating over a period of `rotation_period_steps` steps.
    rotation_period_steps: u64,
    step_seconds: i64,
}

impl ElevationMaskVisibility {
    pub fn new(rotation_period_steps: u64, step_seconds: i64) -> Self {
        Self {
            rotation_period_steps,
            step_seconds,
        }
    }
}

impl VisibilityOracle for ElevationMaskVisibility {
    fn visible(&self, gnd_id: u32, satellites: &[Satellite], now: DateTime<Utc>) -> Vec<u32> {
        if satellites.is_empty() {
            return Vec::new();
        }
        let elapsed_steps = (now.timestamp() / self.step_seconds.max(1)) as u64;
        let n = satellites.len() as u64;
        let window = (n / 3).max(1);
        let phase = (elapsed_steps + u64::from(gnd_id) * window) % self.rotation_period_steps.max(1);
        let start = (phase * n / self.rotation_period_steps.max(1)) % n;
        (0..window)
            .map(|i| satellites[((start + i) % n) as usize].sat_id())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sats(n: u32) -> Vec<Satellite> {
        let now = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
        (0..n).map(|i| Satellite::new(i, (0.0, 0.0, 0.0), now)).collect()
    }

    #[test]
    fn visible_ids_reference_real_satellites() {
        let satellites = sats(6);
        let oracle = ElevationMaskVisibility::new(100, 10);
        let now = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
        let v = oracle.visible(0, &satellites, now);
        assert!(!v.is_empty());
        for id in v {
            assert!(satellites.iter().any(|s| s.sat_id() == id));
        }
    }

    #[test]
    fn visibility_is_stable_for_unchanged_inputs() {
        let satellites = sats(6);
        let oracle = ElevationMaskVisibility::new(100, 10);
        let now = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
        assert_eq!(oracle.visible(0, &satellites, now), oracle.visible(0, &satellites, now));
    }
}
