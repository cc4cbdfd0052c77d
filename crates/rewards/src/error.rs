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

use alloy_primitives::Address;
use thiserror::Error;

use crate::sources::BlockRef;

/// Failure to read a single input from an upstream collaborator.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Block {0} not found")]
    BlockNotFound(BlockRef),

    #[error("Guardian {0} not found")]
    GuardianNotFound(Address),

    #[error("Delegator {0} not found")]
    DelegatorNotFound(Address),

    #[error("Upstream request failed: {0:#}")]
    Upstream(#[from] anyhow::Error),
}

/// Failure that prevents a report from being built at all.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Latest block {latest} is below the start of rewards block {anchor}")]
    BeforeRewardsStart { latest: u64, anchor: u64 },

    #[error("Invalid report options: {0}")]
    InvalidOptions(String),

    #[error("Failed to fetch report inputs: {0}")]
    Fetch(#[from] FetchError),

    #[error("Got {actual} block times for {expected} periods")]
    MissingBlockTimes { expected: usize, actual: usize },
}

#[derive(Error, Debug, PartialEq)]
pub enum AttributionError {
    #[error("Delegator reward share {0} is outside [0, 1)")]
    InvalidRewardShare(f64),
}

#[cfg(test)]
mod tests {
    use anyhow::Context;

    use super::*;

    #[test]
    fn test_upstream_message_keeps_context_on_one_line() {
        let err: anyhow::Result<()> = Err(anyhow::anyhow!("connection reset"));
        let err = FetchError::from(err.context("eth_getBlockByNumber").unwrap_err());

        assert_eq!(
            err.to_string(),
            "Upstream request failed: eth_getBlockByNumber: connection reset"
        );

        let report_err = ReportError::from(err);
        assert!(!report_err.to_string().contains('\n'));
    }
}
