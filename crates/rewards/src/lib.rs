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

//! Per-period reward attribution for proof-of-stake guardians and their delegators.
//!
//! A report splits the recent block range into periods, distributes each participant's
//! cumulative reward checkpoints over those periods and lists one row per guardian role and
//! delegator. Reports built on different networks can be merged into one.

// Declare modules
pub mod allocation;
pub mod builder;
pub mod chain;
pub mod config;
pub mod error;
pub mod guardian;
pub mod merge;
pub mod periods;
pub mod report;
pub mod retry;
pub mod snapshot;
pub mod sources;
pub mod trim;

// Re-export commonly used types
pub use allocation::{allocate_rewards, RewardCheckpoint};

pub use builder::{GuardianSelection, ReportBuilder};

pub use chain::ChainLedger;

pub use config::{
    PeriodPreset, ProtocolConstants, ReportConfig, ReportOptions, DEFAULT_EXCLUDED_GUARDIANS,
    DEFAULT_PERIODS, DEFAULT_PERIOD_BLOCKS, DEFAULT_READ_CUSHION_BLOCKS,
};

pub use error::{AttributionError, FetchError, ReportError};

pub use guardian::{
    attribute_guardian_rewards, DelegatorRef, GuardianDetails, GuardianInfo, GuardianListing,
    GuardianRewards,
};

pub use merge::merge_reports;

pub use periods::{Period, PeriodPlanner, ReportDetails};

pub use report::{Participant, ParticipantKind, Report};

pub use retry::{with_retry, RetryPolicy};

pub use snapshot::{DelegatorHistory, Snapshot};

pub use sources::{BlockInfo, BlockRef, GuardianDirectory, LedgerClient};

pub use trim::trim_partial_period;
