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

//! Interfaces of the upstream collaborators the report is built from.

use std::fmt;

use alloy_primitives::Address;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    allocation::RewardCheckpoint,
    error::FetchError,
    guardian::{GuardianInfo, GuardianListing},
};

/// Block selector accepted by [LedgerClient::get_block].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRef {
    Latest,
    Number(u64),
}

impl fmt::Display for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockRef::Latest => write!(f, "latest"),
            BlockRef::Number(number) => write!(f, "{number}"),
        }
    }
}

/// Number and timestamp (seconds since epoch) of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub number: u64,
    pub timestamp: u64,
}

/// Directory of guardians and their delegator sets.
#[async_trait]
pub trait GuardianDirectory: Send + Sync {
    /// All guardians currently registered, with their certification status.
    async fn list(&self) -> Result<Vec<GuardianListing>, FetchError>;

    /// Full guardian details, with reward checkpoints visible from `read_from_block` on.
    async fn detail(
        &self,
        address: Address,
        read_from_block: u64,
    ) -> Result<GuardianInfo, FetchError>;
}

/// Ledger data source for block metadata and delegator reward history.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn get_block(&self, block: BlockRef) -> Result<BlockInfo, FetchError>;

    /// Delegator-role checkpoints of `address`, newest first.
    async fn get_delegator_rewards(
        &self,
        address: Address,
        read_from_block: u64,
    ) -> Result<Vec<RewardCheckpoint>, FetchError>;
}
