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

//! Partitioning of a block range into reporting periods.

use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};

use crate::{
    config::{ProtocolConstants, ReportOptions},
    error::ReportError,
    sources::{BlockInfo, BlockRef, LedgerClient},
};

/// A contiguous block range rewards are aggregated over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start_block: u64,
    pub start_block_time: u64,
    pub end_block: u64,
    pub end_block_time: u64,
    /// Number of blocks in the period, both ends included
    pub length: u64,
}

impl Period {
    pub fn new(start_block: u64, end_block: u64) -> Self {
        Self {
            start_block,
            start_block_time: 0,
            end_block,
            end_block_time: 0,
            length: end_block - start_block + 1,
        }
    }
}

/// Period layout of a report, newest period first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDetails {
    pub number_of_periods: usize,
    pub total_length_of_periods: u64,
    pub start_of_periods_block: u64,
    pub end_of_periods_block: u64,
    pub periods: Vec<Period>,
}

impl ReportDetails {
    /// Derive the aggregate fields from a non-empty, newest-first period list.
    pub fn from_periods(periods: Vec<Period>) -> Self {
        let mut details = Self {
            number_of_periods: 0,
            total_length_of_periods: 0,
            start_of_periods_block: 0,
            end_of_periods_block: 0,
            periods,
        };
        details.refresh();
        details
    }

    pub(crate) fn refresh(&mut self) {
        self.number_of_periods = self.periods.len();
        self.total_length_of_periods = self.periods.iter().map(|p| p.length).sum();
        self.start_of_periods_block = self.periods.last().map_or(0, |p| p.start_block);
        self.end_of_periods_block = self.periods.first().map_or(0, |p| p.end_block);
    }
}

/// Plans report periods aligned to the start of rewards block.
#[derive(Debug, Clone, Copy)]
pub struct PeriodPlanner {
    constants: ProtocolConstants,
}

impl PeriodPlanner {
    pub fn new(constants: ProtocolConstants) -> Self {
        Self { constants }
    }

    /// Periods from `latest_block` back towards the anchor, without timestamps.
    ///
    /// The newest period ends at `latest_block` and starts on a block aligned to the anchor
    /// by `period_in_blocks`, so it is usually partial. Older periods are full. At most
    /// `max_periods` are returned, fewer once the anchor is reached.
    pub fn plan(
        &self,
        latest_block: u64,
        period_in_blocks: u64,
        max_periods: usize,
    ) -> Result<Vec<Period>, ReportError> {
        let anchor = self.constants.start_of_rewards_block;
        if latest_block < anchor {
            return Err(ReportError::BeforeRewardsStart { latest: latest_block, anchor });
        }
        if period_in_blocks == 0 || max_periods == 0 {
            return Err(ReportError::InvalidOptions(format!(
                "cannot plan {max_periods} periods of {period_in_blocks} blocks"
            )));
        }

        let mut curr_end = latest_block;
        let mut curr_start = if latest_block - anchor + 1 > period_in_blocks {
            latest_block - ((latest_block - anchor) % period_in_blocks)
        } else {
            anchor
        };

        let mut periods = Vec::with_capacity(max_periods);
        loop {
            periods.push(Period::new(curr_start, curr_end));
            if periods.len() >= max_periods || curr_start == 0 {
                break;
            }
            curr_end = curr_start - 1;
            match (curr_end + 1).checked_sub(period_in_blocks) {
                Some(start) if start >= anchor => curr_start = start,
                _ => break,
            }
        }

        Ok(periods)
    }

    /// Attach block times to planned periods.
    ///
    /// `start_times[i]` is the timestamp of `periods[i].start_block`, so both must have the
    /// same length. The newest period ends at the latest block's time; every older one ends
    /// one block gap before the next period starts.
    pub fn with_timestamps(
        &self,
        mut periods: Vec<Period>,
        latest: &BlockInfo,
        start_times: &[u64],
    ) -> Result<Vec<Period>, ReportError> {
        if periods.len() != start_times.len() {
            return Err(ReportError::MissingBlockTimes {
                expected: periods.len(),
                actual: start_times.len(),
            });
        }

        let mut end_time = latest.timestamp;
        for (period, &start_time) in periods.iter_mut().zip(start_times) {
            period.start_block_time = start_time;
            period.end_block_time = end_time;
            end_time = start_time.saturating_sub(self.constants.block_gap_secs);
        }
        Ok(periods)
    }

    /// Plan the periods of a report ending at the ledger's latest block, with timestamps.
    pub async fn plan_details<L: LedgerClient + ?Sized>(
        &self,
        ledger: &L,
        options: &ReportOptions,
    ) -> Result<ReportDetails, ReportError> {
        options.validate()?;

        let latest = ledger.get_block(BlockRef::Latest).await?;
        let periods =
            self.plan(latest.number, options.period_in_blocks, options.periods_to_plan())?;

        tracing::debug!("Fetching start block times for {} periods", periods.len());
        let start_blocks = try_join_all(
            periods.iter().map(|period| ledger.get_block(BlockRef::Number(period.start_block))),
        )
        .await?;
        let start_times: Vec<u64> = start_blocks.iter().map(|block| block.timestamp).collect();

        let periods = self.with_timestamps(periods, &latest, &start_times)?;
        let details = ReportDetails::from_periods(periods);
        tracing::info!(
            "Planned {} periods covering blocks {} to {}",
            details.number_of_periods,
            details.start_of_periods_block,
            details.end_of_periods_block
        );
        Ok(details)
    }
}
