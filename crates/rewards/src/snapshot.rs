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

//! Guardian directory and ledger backed by a JSON snapshot of the staking contracts.

use std::path::Path;

use alloy_primitives::Address;
use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    allocation::RewardCheckpoint,
    error::FetchError,
    guardian::{GuardianInfo, GuardianListing},
    sources::{BlockInfo, BlockRef, GuardianDirectory, LedgerClient},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelegatorHistory {
    pub address: Address,
    /// Delegator-role checkpoints, newest first
    pub rewards: Vec<RewardCheckpoint>,
}

/// Point-in-time copy of everything a report reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub latest_block: BlockInfo,
    /// Known blocks other than the latest one
    #[serde(default)]
    pub blocks: Vec<BlockInfo>,
    #[serde(default)]
    pub guardians: Vec<GuardianInfo>,
    #[serde(default)]
    pub delegators: Vec<DelegatorHistory>,
}

impl Snapshot {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
        tracing::info!(
            "Loaded snapshot with {} guardians and {} delegators at block {}",
            snapshot.guardians.len(),
            snapshot.delegators.len(),
            snapshot.latest_block.number
        );
        Ok(snapshot)
    }
}

/// Checkpoints newer than `read_from_block`, plus the newest one at or before it so the
/// first delta reaching into the window is kept.
fn visible_from(checkpoints: &[RewardCheckpoint], read_from_block: u64) -> Vec<RewardCheckpoint> {
    let newer = checkpoints.iter().take_while(|c| c.block_number > read_from_block).count();
    checkpoints.iter().take(newer + 1).copied().collect()
}

#[async_trait]
impl GuardianDirectory for Snapshot {
    async fn list(&self) -> Result<Vec<GuardianListing>, FetchError> {
        Ok(self
            .guardians
            .iter()
            .map(|g| GuardianListing { address: g.address, certified: g.details.certified })
            .collect())
    }

    async fn detail(
        &self,
        address: Address,
        read_from_block: u64,
    ) -> Result<GuardianInfo, FetchError> {
        let guardian = self
            .guardians
            .iter()
            .find(|g| g.address == address)
            .ok_or(FetchError::GuardianNotFound(address))?;
        Ok(GuardianInfo {
            reward_as_guardian_slices: visible_from(
                &guardian.reward_as_guardian_slices,
                read_from_block,
            ),
            reward_as_delegator_slices: visible_from(
                &guardian.reward_as_delegator_slices,
                read_from_block,
            ),
            ..guardian.clone()
        })
    }
}

#[async_trait]
impl LedgerClient for Snapshot {
    async fn get_block(&self, block: BlockRef) -> Result<BlockInfo, FetchError> {
        match block {
            BlockRef::Latest => Ok(self.latest_block),
            BlockRef::Number(number) if number == self.latest_block.number => {
                Ok(self.latest_block)
            }
            BlockRef::Number(number) => self
                .blocks
                .iter()
                .find(|b| b.number == number)
                .copied()
                .ok_or(FetchError::BlockNotFound(block)),
        }
    }

    async fn get_delegator_rewards(
        &self,
        address: Address,
        read_from_block: u64,
    ) -> Result<Vec<RewardCheckpoint>, FetchError> {
        self.delegators
            .iter()
            .find(|d| d.address == address)
            .map(|d| visible_from(&d.rewards, read_from_block))
            .ok_or(FetchError::DelegatorNotFound(address))
    }
}
