//! C4: the spacing strategy interface and its four variants.
//!
//! Modelled as a closed enum of tagged variants per the redesign notes:
//! each variant owns its private state, and the driver holds one
//! [`SpacingStrategy`] value for the whole run rather than a trait object.

mod bent_pipe;
mod close_orbit_spaced;
mod frame_spaced;
mod orbit_spaced;

use crate::math::{altitude_km, EciPosn};
use crate::satellite::Satellite;
use crate::sensor::Sensor;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use strum_macros::Display;

pub use bent_pipe::BentPipeState;
pub use close_orbit_spaced::CloseOrbitSpacedState;
pub use frame_spaced::FrameSpacedState;
pub use orbit_spaced::OrbitSpacedState;

/// Selects which spacing strategy variant to construct; parsed from the
/// CLI's `spacing` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SpacingKind {
    #[strum(to_string = "bent-pipe")]
    BentPipe,
    #[strum(to_string = "frame-spaced")]
    FrameSpaced,
    #[strum(to_string = "orbit-spaced")]
    OrbitSpaced,
    #[strum(to_string = "close-orbit-spaced")]
    CloseOrbitSpaced,
}

impl SpacingKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "bent-pipe" | "bentpipe" | "close-spaced" | "close" | "closed" => {
                Some(SpacingKind::BentPipe)
            }
            "frame-spaced" | "frame" => Some(SpacingKind::FrameSpaced),
            "orbit-spaced" | "orbit" => Some(SpacingKind::OrbitSpaced),
            "close-orbit-spaced" => Some(SpacingKind::CloseOrbitSpaced),
            _ => None,
        }
    }
}

impl Default for SpacingKind {
    fn default() -> Self {
        SpacingKind::BentPipe
    }
}

/// One triggered satellite, returned by [`SpacingStrategy::execute`] so the
/// driver can emit `trigger-time` log events without the strategy knowing
/// about the log emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggeredSatellite(pub u32);

#[derive(Debug, Clone)]
pub enum SpacingStrategy {
    BentPipe(BentPipeState),
    FrameSpaced(FrameSpacedState),
    OrbitSpaced(OrbitSpacedState),
    CloseOrbitSpaced(CloseOrbitSpacedState),
}

impl SpacingStrategy {
    pub fn new(kind: SpacingKind, satellite_count: usize) -> Self {
        match kind {
            SpacingKind::BentPipe => SpacingStrategy::BentPipe(BentPipeState::default()),
            SpacingKind::FrameSpaced => {
                SpacingStrategy::FrameSpaced(FrameSpacedState::new(satellite_count))
            }
            SpacingKind::OrbitSpaced => SpacingStrategy::OrbitSpaced(OrbitSpacedState::default()),
            SpacingKind::CloseOrbitSpaced => {
                SpacingStrategy::CloseOrbitSpaced(CloseOrbitSpacedState::default())
            }
        }
    }

    /// One-shot setup invoked by the driver before step 0. Only
    /// close-orbit-spaced does anything here (the cluster re-phasing of
    /// per-satellite local clocks).
    pub fn initialize(&mut self, satellites: &mut [Satellite]) {
        if let SpacingStrategy::CloseOrbitSpaced(state) = self {
            state.initialize(satellites);
        }
    }

    /// The satellite the driver should treat as "the lead" for this step's
    /// distance/threshold evaluation. Every variant but `orbit-spaced`
    /// fixes this at `satellites[0]`; `orbit-spaced` instead tracks a
    /// rotation cursor, so each round's scheduled satellite's own crossing
    /// must be what `should_trigger` sees, or the rotation never advances
    /// past its first satellite.
    pub fn lead_sat_id(&self, satellites: &[Satellite]) -> Option<u32> {
        match self {
            SpacingStrategy::OrbitSpaced(s) => s.scheduled_sat_id(satellites),
            _ => satellites.first().map(Satellite::sat_id),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn should_trigger(
        &self,
        distance_km: f64,
        threshold_km: f64,
        lead_sat_id: u32,
        satellites: &[Satellite],
    ) -> bool {
        match self {
            SpacingStrategy::BentPipe(s) => s.should_trigger(distance_km, threshold_km),
            SpacingStrategy::FrameSpaced(s) => s.should_trigger(distance_km, threshold_km),
            SpacingStrategy::OrbitSpaced(s) => {
                s.should_trigger(distance_km, threshold_km, lead_sat_id, satellites)
            }
            SpacingStrategy::CloseOrbitSpaced(s) => s.should_trigger(distance_km, threshold_km),
        }
    }

    /// Triggers the chosen subset of satellites and refreshes thresholds.
    /// Returns the satellites actually triggered this step.
    pub fn execute(
        &mut self,
        satellites: &[Satellite],
        sensors: &mut HashMap<u32, Sensor>,
        thresholds: &mut HashMap<u32, f64>,
        thresh_coeff: f64,
    ) -> Vec<TriggeredSatellite> {
        #[allow(clippy::match_same_arms)]
        match self {
            SpacingStrategy::BentPipe(s) => {
                s.execute(satellites, sensors, thresholds, thresh_coeff)
            }
            SpacingStrategy::FrameSpaced(s) => {
                s.execute(satellites, sensors, thresholds, thresh_coeff)
            }
            SpacingStrategy::OrbitSpaced(s) => {
                s.execute(satellites, sensors, thresholds, thresh_coeff)
            }
            SpacingStrategy::CloseOrbitSpaced(s) => {
                s.execute(satellites, sensors, thresholds, thresh_coeff)
            }
        }
    }

    pub fn update_frame_state(
        &mut self,
        lead_sat_id: u32,
        curr_posn: EciPosn,
        now: DateTime<Utc>,
        sensors: &mut HashMap<u32, Sensor>,
    ) {
        if let SpacingStrategy::FrameSpaced(s) = self {
            s.update_frame_state(lead_sat_id, curr_posn, now, sensors);
        }
    }
}

pub(crate) fn refresh_threshold(
    sat: &Satellite,
    thresholds: &mut HashMap<u32, f64>,
    thresh_coeff: f64,
) {
    thresholds.insert(sat.sat_id(), thresh_coeff * altitude_km(sat.eci_posn()));
}
