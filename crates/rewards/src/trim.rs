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

use crate::report::Report;

/// Drop one partial period from `report` when only full periods were requested.
///
/// Nothing happens unless `show_only_full` is set and the report has more than one
/// period. The leading (newest, still running) period is dropped if it is shorter than
/// `period_in_blocks`; otherwise the oldest one is when it is. Every participant loses the
/// matching reward entry. Returns whether a period was dropped.
pub fn trim_partial_period(
    report: &mut Report,
    period_in_blocks: u64,
    show_only_full: bool,
) -> bool {
    let periods = &report.details.periods;
    if !show_only_full || periods.len() <= 1 {
        return false;
    }

    let index = if periods[0].length < period_in_blocks {
        0
    } else if periods[periods.len() - 1].length < period_in_blocks {
        periods.len() - 1
    } else {
        return false;
    };

    let removed = report.details.periods.remove(index);
    report.details.refresh();
    for participant in &mut report.participants {
        if index < participant.rewards.len() {
            participant.rewards.remove(index);
        }
    }

    tracing::info!(
        "Dropped partial period {}..={} ({} of {} blocks)",
        removed.start_block,
        removed.end_block,
        removed.length,
        period_in_blocks
    );
    true
}
