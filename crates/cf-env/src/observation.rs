//! Rolling residual history exposed to the agent as state.

use cf_core::Real;
use cf_solver::ResidualPair;

pub const OBSERVATION_LEN: usize = 10;

pub type Observation = [Real; OBSERVATION_LEN];

/// Most recent residual pairs, newest first, zero-filled.
///
/// Layout: `[u_0, p_0, u_1, p_1, ...]` where index 0 is the latest pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResidualHistory {
    values: Observation,
}

impl Default for ResidualHistory {
    fn default() -> Self {
        Self {
            values: [0.0; OBSERVATION_LEN],
        }
    }
}

impl ResidualHistory {
    /// Shift existing pairs back one slot, dropping the oldest.
    pub fn push(&mut self, pair: ResidualPair) {
        self.values.copy_within(0..OBSERVATION_LEN - 2, 2);
        self.values[0] = pair.u;
        self.values[1] = pair.p;
    }

    pub fn clear(&mut self) {
        self.values = [0.0; OBSERVATION_LEN];
    }

    pub fn observation(&self) -> Observation {
        self.values
    }
}
