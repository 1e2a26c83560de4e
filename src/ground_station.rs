/// A ground station. The policy attached to the simulation owns any
/// additional per-station state (queues, timers, RNG); this struct only
/// tracks the current connection, which the step loop needs to enforce
/// the at-most-one-connection invariant and to populate the `occupied`
/// flag surface policies read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroundStation {
    gnd_id: u32,
    current_sat_id: Option<u32>,
    connection_start_step: u64,
}

impl GroundStation {
    pub fn new(gnd_id: u32) -> Self {
        Self {
            gnd_id,
            current_sat_id: None,
            connection_start_step: 0,
        }
    }

    pub fn gnd_id(&self) -> u32 {
        self.gnd_id
    }

    pub fn current_sat_id(&self) -> Option<u32> {
        self.current_sat_id
    }

    pub fn connection_start_step(&self) -> u64 {
        self.connection_start_step
    }

    /// Records a new selection. If it differs from the current one, the
    /// connection timer resets to `step`.
    pub fn set_current_sat(&mut self, sat_id: Option<u32>, step: u64) {
        if sat_id != self.current_sat_id {
            self.connection_start_step = step;
        }
        self.current_sat_id = sat_id;
    }
}
