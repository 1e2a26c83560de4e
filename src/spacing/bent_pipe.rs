use super::{refresh_threshold, TriggeredSatellite};
use crate::satellite::Satellite;
use crate::sensor::Sensor;
use std::collections::HashMap;

/// The default strategy: trigger every satellite simultaneously whenever
/// the lead satellite has drifted past its threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct BentPipeState;

impl BentPipeState {
    pub fn should_trigger(&self, distance_km: f64, threshold_km: f64) -> bool {
        distance_km >= threshold_km
    }

    pub fn execute(
        &mut self,
        satellites: &[Satellite],
        sensors: &mut HashMap<u32, Sensor>,
        thresholds: &mut HashMap<u32, f64>,
        thresh_coeff: f64,
    ) -> Vec<TriggeredSatellite> {
        let mut triggered = Vec::with_capacity(satellites.len());
        for sat in satellites {
            if let Some(sensor) = sensors.get_mut(&sat.sat_id()) {
                sensor.trigger_sense();
                triggered.push(TriggeredSatellite(sat.sat_id()));
            }
            refresh_threshold(sat, thresholds, thresh_coeff);
        }
        triggered
    }
}
