// Copyright 2025 RISC Zero, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Allocation of cumulative reward checkpoints to report periods.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::periods::Period;

/// Cumulative reward total of one participant role as of a block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardCheckpoint {
    pub block_number: u64,
    pub total_awarded: f64,
    /// Set when the checkpoint was emitted by a delegation change; names the guardian the
    /// rewards up to this checkpoint were earned with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guardian_from: Option<Address>,
}

impl RewardCheckpoint {
    pub fn new(block_number: u64, total_awarded: f64) -> Self {
        Self { block_number, total_awarded, guardian_from: None }
    }

    /// Checkpoint emitted when the delegation moved away from `guardian`.
    pub fn delegation_change(block_number: u64, total_awarded: f64, guardian: Address) -> Self {
        Self { block_number, total_awarded, guardian_from: Some(guardian) }
    }

    fn counts_for(&self, owner: &Address) -> bool {
        self.guardian_from.is_none_or(|from| from == *owner)
    }
}

/// Part of `delta`, earned uniformly over `(prev_block, block]`, that falls on or after
/// `boundary`, and the rest. `None` unless `prev_block < boundary <= block`.
pub(crate) fn split_at_boundary(
    delta: f64,
    block: u64,
    prev_block: u64,
    boundary: u64,
) -> Option<(f64, f64)> {
    if prev_block >= boundary || boundary > block {
        return None;
    }
    let needed_blocks = (block - boundary + 1) as f64;
    let total_blocks = (block - prev_block) as f64;
    let needed = delta * needed_blocks / total_blocks;
    Some((needed, delta - needed))
}

/// Reward earned by `owner` in each period, newest period first.
///
/// `checkpoints` must be ordered newest first. A delta between two checkpoints that
/// crosses a period start is split between the two periods by block count. Deltas of
/// checkpoints marked with another guardian are skipped. Periods that start after a
/// checkpoint interval ends are closed before the interval is counted, and periods the
/// stream does not reach are zero.
///
/// Only one boundary is split per delta: when a single interval spans several period
/// starts, the newest period gets its block share and the whole remainder goes to the
/// next one.
pub fn allocate_rewards(
    checkpoints: &[RewardCheckpoint],
    owner: &Address,
    periods: &[Period],
) -> Vec<f64> {
    let mut period_rewards = Vec::with_capacity(periods.len());
    let mut curr_period = 0;
    let mut curr_period_reward = 0.0;

    for pair in checkpoints.windows(2) {
        let (curr, prev) = (&pair[0], &pair[1]);
        while curr_period < periods.len() && curr.block_number < periods[curr_period].start_block
        {
            period_rewards.push(curr_period_reward);
            curr_period_reward = 0.0;
            curr_period += 1;
        }
        if curr_period >= periods.len() {
            break;
        }
        let period_start = periods[curr_period].start_block;

        if curr.counts_for(owner) {
            let delta = curr.total_awarded - prev.total_awarded;
            if delta < 0.0 {
                tracing::warn!(
                    "Negative reward delta {} for {} between blocks {} and {}",
                    delta,
                    owner,
                    prev.block_number,
                    curr.block_number
                );
            }

            if prev.block_number >= period_start {
                curr_period_reward += delta;
            } else {
                // The pre-advance loop keeps prev < period_start <= curr.
                let (needed, remainder) =
                    split_at_boundary(delta, curr.block_number, prev.block_number, period_start)
                        .unwrap_or((0.0, delta));
                period_rewards.push(curr_period_reward + needed);
                curr_period_reward = remainder;
                curr_period += 1;
            }
        } else if prev.block_number <= period_start {
            period_rewards.push(curr_period_reward);
            curr_period_reward = 0.0;
            curr_period += 1;
        }
    }

    if curr_period < periods.len() {
        period_rewards.push(curr_period_reward);
    }
    period_rewards.resize(periods.len(), 0.0);

    period_rewards
}
