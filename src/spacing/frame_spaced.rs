use super::{refresh_threshold, TriggeredSatellite};
use crate::math::EciPosn;
use crate::satellite::Satellite;
use crate::sensor::Sensor;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Triggers the whole constellation only once every `N` threshold
/// crossings (N = constellation size), holding the flock still the rest
/// of the time while the lead satellite's reference point keeps marching
/// forward so its distance metric stays meaningful.
#[derive(Debug, Clone, Copy)]
pub struct FrameSpacedState {
    frame_count: u64,
    satellite_count: u64,
}

impl FrameSpacedState {
    pub fn new(satellite_count: usize) -> Self {
        Self {
            frame_count: 0,
            satellite_count: satellite_count as u64,
        }
    }

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
        self.frame_count += 1;
        let n = self.satellite_count.max(1);
        if self.frame_count % n != 0 {
            return Vec::new();
        }
        self.frame_count = 0;
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

    /// Invoked on steps where `should_trigger` returned false: the lead
    /// satellite's reference point is advanced even though the rest of
    /// the flock is held.
    pub fn update_frame_state(
        &mut self,
        lead_sat_id: u32,
        curr_posn: EciPosn,
        now: DateTime<Utc>,
        sensors: &mut HashMap<u32, Sensor>,
    ) {
        if let Some(lead_sensor) = sensors.get_mut(&lead_sat_id) {
            lead_sensor.set_prev_sense(curr_posn, now);
        }
    }
}
