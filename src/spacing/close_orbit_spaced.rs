use super::{refresh_threshold, TriggeredSatellite};
use crate::satellite::Satellite;
use crate::sensor::Sensor;
use std::collections::HashMap;

const DEFAULT_CLUSTER_SIZE: usize = 5;
const DEFAULT_INTRA_DT_SEC: i64 = 0;
const DEFAULT_INTER_DT_SEC: i64 = 540;

/// Behaves like bent-pipe, except that a one-shot re-phasing of each
/// satellite's local clock at [`initialize`](Self::initialize) bakes a
/// temporal cluster spread into the constellation before the first step.
#[derive(Debug, Clone, Copy)]
pub struct CloseOrbitSpacedState {
    rephased: bool,
    cluster_size: usize,
    intra_dt_sec: i64,
    inter_dt_sec: i64,
}

impl Default for CloseOrbitSpacedState {
    fn default() -> Self {
        Self {
            rephased: false,
            cluster_size: DEFAULT_CLUSTER_SIZE,
            intra_dt_sec: DEFAULT_INTRA_DT_SEC,
            inter_dt_sec: DEFAULT_INTER_DT_SEC,
        }
    }
}

impl CloseOrbitSpacedState {
    pub fn with_cluster_params(cluster_size: usize, intra_dt_sec: i64, inter_dt_sec: i64) -> Self {
        Self {
            rephased: false,
            cluster_size: cluster_size.max(1),
            intra_dt_sec,
            inter_dt_sec,
        }
    }

    /// One-shot re-phasing of per-satellite local clocks to form clusters.
    /// For `i in [1, N)`, satellite `i`'s local clock advances from
    /// satellite `i-1`'s by `intra_dt_sec` if `i mod cluster_size != 0`,
    /// else by `inter_dt_sec`.
    pub fn initialize(&mut self, satellites: &mut [Satellite]) {
        if self.rephased || satellites.is_empty() {
            return;
        }
        for i in 1..satellites.len() {
            let prev_clock = satellites[i - 1].local_clock();
            let dt = if i % self.cluster_size != 0 {
                self.intra_dt_sec
            } else {
                self.inter_dt_sec
            };
            satellites[i].set_local_clock(prev_clock + chrono::TimeDelta::seconds(dt));
        }
        self.rephased = true;
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
