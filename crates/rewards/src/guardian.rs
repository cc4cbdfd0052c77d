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

//! Guardian data and the split of guardian rewards into self and delegator shares.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{
    allocation::{allocate_rewards, RewardCheckpoint},
    error::AttributionError,
    periods::Period,
};

/// Guardian entry of the directory listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardianListing {
    pub address: Address,
    pub certified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardianDetails {
    pub name: String,
    pub certified: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatorRef {
    pub address: Address,
}

/// Everything the report needs to know about one guardian. Built by the directory and
/// never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardianInfo {
    pub address: Address,
    pub details: GuardianDetails,
    /// Fraction of the guardian's rewards passed on to its delegators
    pub delegator_reward_share: f64,
    /// Guardian-role checkpoints, newest first
    #[serde(default)]
    pub reward_as_guardian_slices: Vec<RewardCheckpoint>,
    /// Checkpoints of the guardian's self-delegated stake, newest first
    #[serde(default)]
    pub reward_as_delegator_slices: Vec<RewardCheckpoint>,
    /// Current delegators
    #[serde(default)]
    pub delegators: Vec<DelegatorRef>,
    /// Former delegators
    #[serde(default)]
    pub delegators_left: Vec<DelegatorRef>,
}

impl GuardianInfo {
    /// Fail unless `delegator_reward_share` is in `[0, 1)`.
    pub fn reward_share(&self) -> Result<f64, AttributionError> {
        let share = self.delegator_reward_share;
        if (0.0..1.0).contains(&share) {
            Ok(share)
        } else {
            Err(AttributionError::InvalidRewardShare(share))
        }
    }
}

/// Per-period views of a guardian's rewards, newest period first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GuardianRewards {
    /// Everything earned through the guardian, delegators included
    pub all_guardian_rewards: Vec<f64>,
    /// Guardian-role rewards plus rewards of the guardian's self-delegated stake
    pub guardian_self_rewards: Vec<f64>,
    /// Rewards of all other delegators combined
    pub sum_delegator_rewards: Vec<f64>,
}

/// Derive [GuardianRewards] from the guardian's two checkpoint streams.
pub fn attribute_guardian_rewards(
    guardian: &GuardianInfo,
    periods: &[Period],
) -> Result<GuardianRewards, AttributionError> {
    let share = guardian.reward_share()?;
    let guardian_share_to_total = 1.0 / (1.0 - share);
    let guardian_share_to_delegators = share / (1.0 - share);

    let as_guardian =
        allocate_rewards(&guardian.reward_as_guardian_slices, &guardian.address, periods);
    let as_delegator =
        allocate_rewards(&guardian.reward_as_delegator_slices, &guardian.address, periods);

    let mut rewards = GuardianRewards::default();
    for (i, &guardian_reward) in as_guardian.iter().enumerate() {
        let self_delegate_reward = as_delegator.get(i).copied().unwrap_or_default();
        rewards.all_guardian_rewards.push(guardian_reward * guardian_share_to_total);
        rewards.guardian_self_rewards.push(guardian_reward + self_delegate_reward);
        rewards
            .sum_delegator_rewards
            .push(guardian_reward * guardian_share_to_delegators - self_delegate_reward);
    }

    Ok(rewards)
}
