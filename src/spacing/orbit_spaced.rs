use super::{refresh_threshold, TriggeredSatellite};
use crate::satellite::Satellite;
use crate::sensor::Sensor;
use std::collections::HashMap;

/// Round-robins observation across satellites: each threshold crossing
/// triggers exactly one satellite, advancing through the constellation in
/// order.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrbitSpacedState {
    rotation_index: usize,
}

impl OrbitSpacedState {
    /// The satellite whose crossing is awaited this round. The driver must
    /// evaluate `distance_km`/`threshold_km` against *this* satellite, not
    /// a fixed lead, or only `rotation_index == 0` ever fires.
    pub fn scheduled_sat_id(&self, satellites: &[Satellite]) -> Option<u32> {
        if satellites.is_empty() {
            return None;
        }
        let n = satellites.len();
        Some(satellites[self.rotation_index % n].sat_id())
    }

    pub fn should_trigger(
        &self,
        distance_km: f64,
        threshold_km: f64,
        lead_sat_id: u32,
        satellites: &[Satellite],
    ) -> bool {
        if satellites.is_empty() {
            return false;
        }
        let n = satellites.len();
        let scheduled = satellites[self.rotation_index % n].sat_id();
        distance_km >= threshold_km && lead_sat_id == scheduled
    }

    pub fn execute(
        &mut self,
        satellites: &[Satellite],
        sensors: &mut HashMap<u32, Sensor>,
        thresholds: &mut HashMap<u32, f64>,
        thresh_coeff: f64,
    ) -> Vec<TriggeredSatellite> {
        if satellites.is_empty() {
            return Vec::new();
        }
        let n = satellites.len();
        let sat = &satellites[self.rotation_index % n];
        let mut triggered = Vec::new();
        if let Some(sensor) = sensors.get_mut(&sat.sat_id()) {
            sensor.trigger_sense();
            triggered.push(TriggeredSatellite(sat.sat_id()));
        }
        refresh_threshold(sat, thresholds, thresh_coeff);
        self.rotation_index += 1;
        triggered
    }
}
