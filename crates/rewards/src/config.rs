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

//! Report options and protocol configuration.

use std::str::FromStr;

use alloy_primitives::{address, Address};

use crate::{error::ReportError, retry::RetryPolicy};

/// Default period length in blocks (one quarter on Ethereum mainnet).
pub const DEFAULT_PERIOD_BLOCKS: u64 = 604_800;
/// Default number of periods in a report
pub const DEFAULT_PERIODS: usize = 3;
/// Guardians left out of reports unless the caller provides its own exclusion list.
pub const DEFAULT_EXCLUDED_GUARDIANS: [Address; 2] = [
    address!("0x4aca0c63e351b2ea44ee628425710e933b5b3396"),
    address!("0xca0ff0479bd7f52e55e65da7b76074b477b734b3"),
];
/// Ethereum mainnet block at which staking rewards started accruing.
pub const ETHEREUM_START_OF_REWARDS_BLOCK: u64 = 11_145_373;
/// Nominal seconds between two Ethereum blocks
pub const ETHEREUM_BLOCK_GAP_SECS: u64 = 13;
/// Blocks read before the earliest period so the checkpoint straddling it is visible.
pub const DEFAULT_READ_CUSHION_BLOCKS: u64 = 10_000;

/// Options of a single report request.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    /// Length of every full period, in blocks
    pub period_in_blocks: u64,
    /// Number of periods requested
    pub periods: usize,
    /// Drop a partial period from the finished report
    pub show_only_full_periods: bool,
    /// Guardians to leave out; [DEFAULT_EXCLUDED_GUARDIANS] when unset
    pub exclude_guardians: Option<Vec<Address>>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            period_in_blocks: DEFAULT_PERIOD_BLOCKS,
            periods: DEFAULT_PERIODS,
            show_only_full_periods: false,
            exclude_guardians: None,
        }
    }
}

impl ReportOptions {
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.period_in_blocks == 0 {
            return Err(ReportError::InvalidOptions(
                "period length must be at least 1 block".into(),
            ));
        }
        if self.periods == 0 {
            return Err(ReportError::InvalidOptions(
                "at least one period must be requested".into(),
            ));
        }
        Ok(())
    }

    /// Number of periods to plan; one extra when a partial period may be trimmed later.
    pub fn periods_to_plan(&self) -> usize {
        self.periods + usize::from(self.show_only_full_periods)
    }

    pub fn is_excluded(&self, guardian: &Address) -> bool {
        match &self.exclude_guardians {
            Some(excluded) => excluded.contains(guardian),
            None => DEFAULT_EXCLUDED_GUARDIANS.contains(guardian),
        }
    }
}

/// Named period lengths for Ethereum mainnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodPreset {
    /// ~91 days
    Quarterly,
    /// ~30 days
    Monthly,
    /// ~7 days
    Weekly,
}

impl PeriodPreset {
    pub fn blocks(self) -> u64 {
        match self {
            PeriodPreset::Quarterly => DEFAULT_PERIOD_BLOCKS,
            PeriodPreset::Monthly => 199_385,
            PeriodPreset::Weekly => 46_525,
        }
    }
}

impl FromStr for PeriodPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quarterly" => Ok(PeriodPreset::Quarterly),
            "monthly" => Ok(PeriodPreset::Monthly),
            "weekly" => Ok(PeriodPreset::Weekly),
            other => Err(format!("unknown period preset {other:?} (quarterly, monthly, weekly)")),
        }
    }
}

/// Fixed per-chain protocol values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolConstants {
    /// Anchor block; no period starts before it
    pub start_of_rewards_block: u64,
    /// Nominal gap between consecutive blocks, used to derive period end times
    pub block_gap_secs: u64,
}

impl ProtocolConstants {
    pub fn ethereum() -> Self {
        Self {
            start_of_rewards_block: ETHEREUM_START_OF_REWARDS_BLOCK,
            block_gap_secs: ETHEREUM_BLOCK_GAP_SECS,
        }
    }
}

impl Default for ProtocolConstants {
    fn default() -> Self {
        Self::ethereum()
    }
}

/// Configuration of a [crate::ReportBuilder].
#[derive(Debug, Clone, Default)]
pub struct ReportConfig {
    pub constants: ProtocolConstants,
    pub retry: RetryPolicy,
    pub read_cushion_blocks: Option<u64>,
}

impl ReportConfig {
    pub fn read_cushion_blocks(&self) -> u64 {
        self.read_cushion_blocks.unwrap_or(DEFAULT_READ_CUSHION_BLOCKS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_exclusions() {
        let options = ReportOptions::default();
        assert!(options.is_excluded(&DEFAULT_EXCLUDED_GUARDIANS[0]));
        assert!(!options.is_excluded(&Address::repeat_byte(0x11)));

        let options = ReportOptions { exclude_guardians: Some(vec![]), ..Default::default() };
        assert!(!options.is_excluded(&DEFAULT_EXCLUDED_GUARDIANS[0]));
    }

    #[test]
    fn test_periods_to_plan() {
        let options = ReportOptions { periods: 3, ..Default::default() };
        assert_eq!(options.periods_to_plan(), 3);
        let options =
            ReportOptions { periods: 3, show_only_full_periods: true, ..Default::default() };
        assert_eq!(options.periods_to_plan(), 4);
    }

    #[test]
    fn test_validate() {
        assert!(ReportOptions::default().validate().is_ok());
        let zero_length = ReportOptions { period_in_blocks: 0, ..Default::default() };
        assert!(matches!(zero_length.validate(), Err(ReportError::InvalidOptions(_))));
        let zero_periods = ReportOptions { periods: 0, ..Default::default() };
        assert!(matches!(zero_periods.validate(), Err(ReportError::InvalidOptions(_))));
    }

    #[test]
    fn test_period_presets() {
        assert_eq!("Monthly".parse::<PeriodPreset>().unwrap().blocks(), 199_385);
        assert_eq!("weekly".parse::<PeriodPreset>().unwrap().blocks(), 46_525);
        assert_eq!(PeriodPreset::Quarterly.blocks(), DEFAULT_PERIOD_BLOCKS);
        assert!("yearly".parse::<PeriodPreset>().is_err());
    }
}
