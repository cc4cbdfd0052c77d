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

//! The report handed to rendering: period layout plus one reward row per participant.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{guardian::GuardianInfo, periods::ReportDetails};

/// Kind of a report row. Variants are declared in report sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ParticipantKind {
    #[serde(rename = "Total")]
    Total,
    #[serde(rename = "Self-Share (guardian + self-delegate)")]
    SelfShare,
    #[serde(rename = "Total Delegators")]
    TotalDelegators,
    #[serde(rename = "Delegator")]
    Delegator,
    #[serde(rename = "Historical Delegator")]
    HistoricalDelegator,
}

impl ParticipantKind {
    /// Whether rows of this kind are identified by a delegator address too.
    pub fn is_delegator(self) -> bool {
        matches!(self, ParticipantKind::Delegator | ParticipantKind::HistoricalDelegator)
    }
}

/// One report row.
///
/// `rewards` is parallel to the report periods. An empty `rewards` means the data could
/// not be fetched and is rendered as "Missing Data".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub guardian_address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guardian_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guardian_certified: Option<bool>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ParticipantKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegator_address: Option<Address>,
    pub rewards: Vec<f64>,
}

impl Participant {
    pub fn new(
        guardian: &GuardianInfo,
        kind: ParticipantKind,
        rewards: Vec<f64>,
        delegator_address: Option<Address>,
    ) -> Self {
        Self {
            guardian_address: guardian.address,
            guardian_name: Some(guardian.details.name.clone()),
            guardian_certified: Some(guardian.details.certified),
            kind: Some(kind),
            delegator_address,
            rewards,
        }
    }

    /// Row of a guardian whose details could not be fetched.
    pub fn missing_guardian(guardian_address: Address) -> Self {
        Self {
            guardian_address,
            guardian_name: None,
            guardian_certified: None,
            kind: None,
            delegator_address: None,
            rewards: Vec::new(),
        }
    }

    pub fn is_missing_data(&self) -> bool {
        self.rewards.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub details: ReportDetails,
    pub participants: Vec<Participant>,
}
