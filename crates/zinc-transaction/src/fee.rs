//! Action-based fee model.
//!
//! `fee = marginal_fee * max(grace_actions, max(inputs, outputs))`

use serde::{Deserialize, Serialize};

/// Default zatoshi charged per logical action.
pub const DEFAULT_MARGINAL_FEE: u64 = 5_000;

/// Default number of actions every transaction pays for at minimum.
pub const DEFAULT_GRACE_ACTIONS: u64 = 2;

/// Default smallest change output worth creating.
pub const DEFAULT_DUST_THRESHOLD: u64 = 546;

/// Fee parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeModel {
    /// Zatoshi per action.
    pub marginal_fee: u64,
    /// Minimum billed actions.
    pub grace_actions: u64,
    /// Change below this (and above zero) is rejected.
    pub dust_threshold: u64,
}

impl Default for FeeModel {
    fn default() -> Self {
        FeeModel {
            marginal_fee: DEFAULT_MARGINAL_FEE,
            grace_actions: DEFAULT_GRACE_ACTIONS,
            dust_threshold: DEFAULT_DUST_THRESHOLD,
        }
    }
}

impl FeeModel {
    /// Fee for a transaction with the given transparent input and output counts.
    pub fn fee(&self, input_count: usize, output_count: usize) -> u64 {
        let actions = (input_count.max(output_count) as u64).max(self.grace_actions);
        self.marginal_fee.saturating_mul(actions)
    }

    /// Whether `change` may be emitted: exactly zero or at least dust.
    pub fn is_valid_change(&self, change: u64) -> bool {
        change == 0 || change >= self.dust_threshold
    }
}
