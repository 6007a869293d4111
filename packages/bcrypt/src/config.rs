//! Configuration for bcrypt hashing

use crate::api::HashCost;
use crate::engine::DEFAULT_MAX_PER_SLICE;
use crate::params::Minor;
use serde::Deserialize;

/// Configuration for bcrypt hashing
///
/// Missing fields fall back to [`BcryptConfig::default`], so a partial JSON
/// object such as `{"cost": 10}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BcryptConfig {
    /// Cost exponent for new hashes; clamped to 4..=31 when a salt is generated
    pub cost: u32,
    /// Minor version for new hashes
    pub minor: Minor,
    /// Rounds attempted by the first burst before self-tuning takes over
    pub initial_max_per_slice: u32,
}

impl Default for BcryptConfig {
    fn default() -> Self {
        Self {
            cost: HashCost::default().log_rounds(),
            minor: Minor::B,
            initial_max_per_slice: DEFAULT_MAX_PER_SLICE,
        }
    }
}
