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

//! Ledger reading block metadata from an Ethereum node.

use alloy::{primitives::Address, providers::Provider, rpc::types::BlockNumberOrTag};
use async_trait::async_trait;

use crate::{
    allocation::RewardCheckpoint,
    error::FetchError,
    sources::{BlockInfo, BlockRef, LedgerClient},
};

impl From<BlockRef> for BlockNumberOrTag {
    fn from(block: BlockRef) -> Self {
        match block {
            BlockRef::Latest => BlockNumberOrTag::Latest,
            BlockRef::Number(number) => BlockNumberOrTag::Number(number),
        }
    }
}

/// [LedgerClient] that reads blocks through `provider` and reward histories from `rewards`.
pub struct ChainLedger<P, L> {
    provider: P,
    rewards: L,
}

impl<P, L> ChainLedger<P, L> {
    pub fn new(provider: P, rewards: L) -> Self {
        Self { provider, rewards }
    }
}

#[async_trait]
impl<P, L> LedgerClient for ChainLedger<P, L>
where
    P: Provider + Send + Sync,
    L: LedgerClient,
{
    async fn get_block(&self, block: BlockRef) -> Result<BlockInfo, FetchError> {
        let header = self
            .provider
            .get_block_by_number(block.into())
            .await
            .map_err(|err| FetchError::Upstream(err.into()))?
            .ok_or(FetchError::BlockNotFound(block))?
            .header;
        Ok(BlockInfo { number: header.number, timestamp: header.timestamp })
    }

    async fn get_delegator_rewards(
        &self,
        address: Address,
        read_from_block: u64,
    ) -> Result<Vec<RewardCheckpoint>, FetchError> {
        self.rewards.get_delegator_rewards(address, read_from_block).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_ref_to_block_tag() {
        assert_eq!(BlockNumberOrTag::from(BlockRef::Latest), BlockNumberOrTag::Latest);
        assert_eq!(BlockNumberOrTag::from(BlockRef::Number(42)), BlockNumberOrTag::Number(42));
    }
}
