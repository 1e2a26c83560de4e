use crate::math::EciPosn;
use chrono::{DateTime, Utc};

/// A single constellation member.
///
/// Position is mutated once per step by the external propagator; the local
/// clock is otherwise just a copy of simulation time, except for satellites
/// rephased by the close-orbit-spaced strategy, whose local clock runs
/// ahead of the shared simulation clock to model intra-cluster timing
/// offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Satellite {
    sat_id: u32,
    eci_posn: EciPosn,
    local_clock: DateTime<Utc>,
}

impl Satellite {
    pub fn new(sat_id: u32, eci_posn: EciPosn, now: DateTime<Utc>) -> Self {
        Self {
            sat_id,
            eci_posn,
            local_clock: now,
        }
    }

    pub fn sat_id(&self) -> u32 {
        self.sat_id
    }

    pub fn eci_posn(&self) -> EciPosn {
        self.eci_posn
    }

    pub fn set_eci_posn(&mut self, posn: EciPosn) {
        self.eci_posn = posn;
    }

    pub fn local_clock(&self) -> DateTime<Utc> {
        self.local_clock
    }

    pub fn set_local_clock(&mut self, t: DateTime<Utc>) {
        self.local_clock = t;
    }
}
