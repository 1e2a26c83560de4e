//! Ties every component together and drives the fixed per-step dependency
//! order: propagate -> spacing -> sensor update -> visibility -> policy
//! per ground station -> downlink drain -> log emit.

use crate::downlink;
use crate::error::LogError;
use crate::ground_station::GroundStation;
use crate::link_policy::LinkPolicy;
use crate::log_emitter::LogEmitter;
use crate::math::distance_km;
use crate::propagator::Propagator;
use crate::satellite::Satellite;
use crate::sensor::Sensor;
use crate::spacing::{refresh_threshold, SpacingStrategy};
use crate::visibility::VisibilityOracle;
use crate::{event, info};
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;

/// Simulation-wide parameters not read from either `.dat` configuration
/// file (see the external-interfaces description of `link_rate`).
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub thresh_coeff: f64,
    pub link_rate_bps: f64,
    pub step_duration_secs: f64,
}

pub struct Simulation<'a> {
    config: SimulationConfig,
    satellites: Vec<Satellite>,
    sensors: HashMap<u32, Sensor>,
    thresholds: HashMap<u32, f64>,
    ground_stations: Vec<GroundStation>,
    spacing: SpacingStrategy,
    policy: LinkPolicy,
    propagator: &'a mut dyn Propagator,
    visibility: &'a dyn VisibilityOracle,
    log: LogEmitter,
    step: u64,
    now: DateTime<Utc>,
}

impl<'a> Simulation<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: SimulationConfig,
        mut satellites: Vec<Satellite>,
        sensors: HashMap<u32, Sensor>,
        ground_stations: Vec<GroundStation>,
        mut spacing: SpacingStrategy,
        policy: LinkPolicy,
        propagator: &'a mut dyn Propagator,
        visibility: &'a dyn VisibilityOracle,
        log: LogEmitter,
        start: DateTime<Utc>,
    ) -> Self {
        spacing.initialize(&mut satellites);

        let mut thresholds = HashMap::new();
        for sat in &satellites {
            refresh_threshold(sat, &mut thresholds, config.thresh_coeff);
        }

        Self {
            config,
            satellites,
            sensors,
            thresholds,
            ground_stations,
            spacing,
            policy,
            propagator,
            visibility,
            log,
            step: 0,
            now: start,
        }
    }

    /// Runs one discrete time step, in the fixed dependency order.
    pub fn step(&mut self) -> Result<(), LogError> {
        self.propagator.advance(&mut self.satellites, self.now);

        if let Some(lead_id) = self.spacing.lead_sat_id(&self.satellites) {
            let lead = *self
                .satellites
                .iter()
                .find(|s| s.sat_id() == lead_id)
                .expect("lead_sat_id names a satellite in self.satellites");
            let prev_posn = self.sensors.get(&lead_id).map_or(lead.eci_posn(), Sensor::prev_sense_posn);
            let dist = distance_km(prev_posn, lead.eci_posn());
            let threshold = self.thresholds.get(&lead_id).copied().unwrap_or(0.0);

            let should_trigger = self.spacing.should_trigger(dist, threshold, lead_id, &self.satellites);
            if should_trigger {
                let triggered = self.spacing.execute(
                    &self.satellites,
                    &mut self.sensors,
                    &mut self.thresholds,
                    self.config.thresh_coeff,
                );
                for t in &triggered {
                    event!("trigger sat {} at step {}", t.0, self.step);
                    self.log.record_trigger(t.0, self.step, self.now)?;
                }
            } else {
                self.spacing.update_frame_state(lead_id, lead.eci_posn(), self.now, &mut self.sensors);
            }
        }

        let mut overflow_events = Vec::new();
        for sat in &self.satellites {
            if let Some(sensor) = self.sensors.get_mut(&sat.sat_id()) {
                if let Some(overflow) = sensor.update(self.now, sat.eci_posn()) {
                    overflow_events.push(overflow);
                }
                self.log.record_buffered(sat.sat_id(), self.step, self.now, sensor.bits_buffered())?;
            }
        }
        for overflow in overflow_events {
            info!("sat {} overflowed: {:.3} MB lost cumulative", overflow.sat_id, overflow.total_lost_mb);
            self.log.record_overflow(overflow.sat_id, self.step, self.now, overflow.total_lost_mb)?;
        }

        let visible_by_station: Vec<(u32, Vec<u32>)> = self
            .ground_stations
            .iter()
            .map(|gs| (gs.gnd_id(), self.visibility.visible(gs.gnd_id(), &self.satellites, self.now)))
            .collect();

        let mut occupied: HashMap<u32, bool> = self.satellites.iter().map(|s| (s.sat_id(), false)).collect();

        for (gnd_id, visible) in &visible_by_station {
            let current = self
                .ground_stations
                .iter()
                .find(|gs| gs.gnd_id() == *gnd_id)
                .expect("visible_by_station built from ground_stations")
                .current_sat_id();

            let choice = self.policy.decide(visible, &self.sensors, &occupied, *gnd_id, current, self.step);

            if choice != current {
                self.log.record_connection_change(*gnd_id, self.step, self.now, choice)?;
            }
            let station = self
                .ground_stations
                .iter_mut()
                .find(|gs| gs.gnd_id() == *gnd_id)
                .expect("visible_by_station built from ground_stations");
            station.set_current_sat(choice, self.step);
            if let Some(sat_id) = choice {
                occupied.insert(sat_id, true);
            }

            if let Some(record) = downlink::drain(
                *gnd_id,
                choice,
                &mut self.sensors,
                self.config.link_rate_bps,
                self.config.step_duration_secs,
            ) {
                self.log.record_downlink(record.gnd_id, self.step, self.now, record.sat_id, record.bits_drained)?;
            }
        }

        self.step += 1;
        self.now += TimeDelta::milliseconds((self.config.step_duration_secs * 1000.0) as i64);
        Ok(())
    }

    /// Runs steps until `self.step == total_steps`, flushing the log at
    /// the end of the run.
    pub fn run(&mut self, total_steps: u64) -> Result<(), LogError> {
        while self.step < total_steps {
            self.step()?;
        }
        self.log.flush()
    }
}
