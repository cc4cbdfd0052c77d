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

use std::time::Duration;

use alloy_primitives::{address, Address};
use pos_rewards::{
    BlockInfo, DelegatorHistory, DelegatorRef, GuardianDetails, GuardianInfo, ProtocolConstants,
    ReportConfig, RetryPolicy, RewardCheckpoint, Snapshot,
};

pub const GUARDIAN: Address = address!("0x1111111111111111111111111111111111111111");
pub const CERTIFIED_GUARDIAN: Address = address!("0x2222222222222222222222222222222222222222");
pub const DELEGATOR: Address = address!("0xd1d1d1d1d1d1d1d1d1d1d1d1d1d1d1d1d1d1d1d1");
pub const FORMER_DELEGATOR: Address = address!("0xd2d2d2d2d2d2d2d2d2d2d2d2d2d2d2d2d2d2d2d2");
pub const UNKNOWN_DELEGATOR: Address = address!("0xd3d3d3d3d3d3d3d3d3d3d3d3d3d3d3d3d3d3d3d3");

pub const EPSILON: f64 = 1e-9;

pub fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?} != {expected:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < EPSILON, "{actual:?} != {expected:?}");
    }
}

/// Anchor at block 0 and no pause between retries.
pub fn test_config() -> ReportConfig {
    ReportConfig {
        constants: ProtocolConstants { start_of_rewards_block: 0, block_gap_secs: 13 },
        retry: RetryPolicy { attempts: 2, delay: Duration::ZERO },
        read_cushion_blocks: None,
    }
}

fn guardian(
    address: Address,
    name: &str,
    certified: bool,
    delegators: Vec<Address>,
) -> GuardianInfo {
    GuardianInfo {
        address,
        details: GuardianDetails { name: name.into(), certified },
        delegator_reward_share: 0.5,
        reward_as_guardian_slices: vec![
            RewardCheckpoint::new(1000, 100.0),
            RewardCheckpoint::new(500, 40.0),
            RewardCheckpoint::new(0, 0.0),
        ],
        reward_as_delegator_slices: vec![],
        delegators: delegators.into_iter().map(|address| DelegatorRef { address }).collect(),
        delegators_left: vec![DelegatorRef { address: FORMER_DELEGATOR }],
    }
}

/// Two guardians at block 1000: an uncertified one with two current delegators (one of
/// which has no history) and a former one, and a certified one without delegators.
pub fn test_snapshot() -> Snapshot {
    Snapshot {
        latest_block: BlockInfo { number: 1000, timestamp: 1_600_013_000 },
        blocks: [0, 200, 400, 600, 800]
            .into_iter()
            .map(|number| BlockInfo { number, timestamp: 1_600_000_000 + number * 13 })
            .collect(),
        guardians: vec![
            guardian(GUARDIAN, "Guardian One", false, vec![DELEGATOR, UNKNOWN_DELEGATOR]),
            guardian(CERTIFIED_GUARDIAN, "Guardian Two", true, vec![]),
        ],
        delegators: vec![
            DelegatorHistory {
                address: DELEGATOR,
                rewards: vec![RewardCheckpoint::new(800, 10.0), RewardCheckpoint::new(0, 0.0)],
            },
            DelegatorHistory {
                address: FORMER_DELEGATOR,
                rewards: vec![
                    RewardCheckpoint::delegation_change(700, 9.0, GUARDIAN),
                    RewardCheckpoint::new(100, 3.0),
                    RewardCheckpoint::new(0, 0.0),
                ],
            },
        ],
    }
}
