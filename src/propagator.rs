//! The orbital propagation contract (C1 collaborator) and a deterministic
//! reference implementation. Real orbital mechanics integration is an
//! external collaborator; this crate only depends on the trait below.

use crate::math::EciPosn;
use crate::satellite::Satellite;
use chrono::{DateTime, Utc};

/// Advances every satellite's ECI position by one step. A production
/// deployment swaps this for a real propagator behind the same trait.
pub trait Propagator {
    fn advance(&mut self, satellites: &mut [Satellite], now: DateTime<Utc>);
}

/// Moves each satellite around a circular orbit at a fixed angular rate,
/// phase-offset by index so the constellation is spread around the orbit.
/// Deterministic and collaborator-contract-only: not a physical model.
pub struct CircularOrbitPropagator {
    radius_km: f64,
    angular_rate_rad_per_sec: f64,
    epoch: DateTime<Utc>,
}

impl CircularOrbitPropagator {
    pub fn new(radius_km: f64, angular_rate_rad_per_sec: f64, epoch: DateTime<Utc>) -> Self {
        Self {
            radius_km,
            angular_rate_rad_per_sec,
            epoch,
        }
    }

    fn position_for(&self, index: usize, count: usize, now: DateTime<Utc>) -> EciPosn {
        let t = (now - self.epoch).num_milliseconds() as f64 / 1000.0;
        let phase = if count > 0 {
            std::f64::consts::TAU * (index as f64) / (count as f64)
        } else {
            0.0
        };
        let theta = self.angular_rate_rad_per_sec * t + phase;
        (self.radius_km * theta.cos(), self.radius_km * theta.sin(), 0.0)
    }
}

impl Propagator for CircularOrbitPropagator {
    fn advance(&mut self, satellites: &mut [Satellite], now: DateTime<Utc>) {
        let count = satellites.len();
        for (index, sat) in satellites.iter_mut().enumerate() {
            let posn = self.position_for(index, count, now);
            sat.set_eci_posn(posn);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn satellites_spread_evenly_around_the_orbit() {
        let epoch = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
        let mut prop = CircularOrbitPropagator::new(7000.0, 0.001, epoch);
        let mut satellites: Vec<Satellite> = (0..4).map(|i| Satellite::new(i, (0.0, 0.0, 0.0), epoch)).collect();
        prop.advance(&mut satellites, epoch);
        let positions: Vec<EciPosn> = satellites.iter().map(Satellite::eci_posn).collect();
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                assert_ne!(positions[i], positions[j]);
            }
        }
    }

    #[test]
    fn positions_stay_on_the_orbit_radius() {
        let epoch = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
        let mut prop = CircularOrbitPropagator::new(7000.0, 0.001, epoch);
        let mut satellites = vec![Satellite::new(0, (0.0, 0.0, 0.0), epoch)];
        prop.advance(&mut satellites, epoch + chrono::TimeDelta::seconds(500));
        let (x, y, z) = satellites[0].eci_posn();
        let r = (x * x + y * y + z * z).sqrt();
        assert!((r - 7000.0).abs() < 1e-6);
    }
}
