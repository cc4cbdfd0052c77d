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

use crate::{
    allocation::allocate_rewards,
    config::{ReportConfig, ReportOptions},
    error::ReportError,
    guardian::{attribute_guardian_rewards, DelegatorRef, GuardianInfo},
    periods::{PeriodPlanner, ReportDetails},
    report::{Participant, ParticipantKind, Report},
    retry::with_retry,
    sources::{GuardianDirectory, LedgerClient},
    trim::trim_partial_period,
};

/// A guardian to report on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardianSelection {
    pub address: Address,
    /// Add one row per current and former delegator
    pub calculate_delegators: bool,
}

/// Builds period reward reports from a guardian directory and a ledger.
///
/// Guardians and their delegators are fetched one at a time. A participant whose data
/// cannot be fetched after a retry is reported with empty rewards instead of failing the
/// report.
pub struct ReportBuilder<D, L> {
    directory: D,
    ledger: L,
    config: ReportConfig,
    planner: PeriodPlanner,
}

impl<D: GuardianDirectory, L: LedgerClient> ReportBuilder<D, L> {
    pub fn new(directory: D, ledger: L, config: ReportConfig) -> Self {
        let planner = PeriodPlanner::new(config.constants);
        Self { directory, ledger, config, planner }
    }

    /// Report on every guardian in the directory that is not excluded by `options`.
    ///
    /// Delegator rows are added for guardians that are not certified.
    pub async fn build_report(&self, options: &ReportOptions) -> Result<Report, ReportError> {
        let listing =
            with_retry(&self.config.retry, "guardian list", || self.directory.list()).await?;

        let selections: Vec<GuardianSelection> = listing
            .into_iter()
            .filter(|guardian| !options.is_excluded(&guardian.address))
            .map(|guardian| GuardianSelection {
                address: guardian.address,
                calculate_delegators: !guardian.certified,
            })
            .collect();

        self.build_guardians_report(&selections, options).await
    }

    /// Report on the given guardians.
    pub async fn build_guardians_report(
        &self,
        guardians: &[GuardianSelection],
        options: &ReportOptions,
    ) -> Result<Report, ReportError> {
        let start_time = std::time::Instant::now();
        tracing::info!("Building rewards report for {} guardians", guardians.len());

        let details = self.planner.plan_details(&self.ledger, options).await?;
        let participants = self.build_participants(guardians, &details).await;

        let mut report = Report { details, participants };
        trim_partial_period(&mut report, options.period_in_blocks, options.show_only_full_periods);

        tracing::info!(
            "Rewards report with {} participants built in {:.2}s",
            report.participants.len(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(report)
    }

    /// Rows of all `guardians` over the periods of `details`, in guardian order.
    pub async fn build_participants(
        &self,
        guardians: &[GuardianSelection],
        details: &ReportDetails,
    ) -> Vec<Participant> {
        let read_from_block =
            details.start_of_periods_block.saturating_sub(self.config.read_cushion_blocks());

        let mut participants = Vec::new();
        for (i, selection) in guardians.iter().enumerate() {
            tracing::info!(
                "[{}/{}] Processing guardian {}",
                i + 1,
                guardians.len(),
                selection.address
            );
            let rows = self.guardian_participants(selection, details, read_from_block).await;
            participants.extend(rows);
        }
        participants
    }

    async fn guardian_participants(
        &self,
        selection: &GuardianSelection,
        details: &ReportDetails,
        read_from_block: u64,
    ) -> Vec<Participant> {
        let address = selection.address;
        let fetched = with_retry(&self.config.retry, &format!("guardian {address}"), || {
            self.directory.detail(address, read_from_block)
        })
        .await;
        let guardian = match fetched {
            Ok(guardian) => guardian,
            Err(err) => {
                tracing::error!("Error while generating guardian {address}: {err} ... (skipped)");
                return vec![Participant::missing_guardian(address)];
            }
        };

        let rewards = match attribute_guardian_rewards(&guardian, &details.periods) {
            Ok(rewards) => rewards,
            Err(err) => {
                tracing::error!("Error while generating guardian {address}: {err} ... (skipped)");
                return vec![Participant::missing_guardian(address)];
            }
        };

        let mut participants = vec![
            Participant::new(&guardian, ParticipantKind::Total, rewards.all_guardian_rewards, None),
            Participant::new(
                &guardian,
                ParticipantKind::SelfShare,
                rewards.guardian_self_rewards,
                None,
            ),
            Participant::new(
                &guardian,
                ParticipantKind::TotalDelegators,
                rewards.sum_delegator_rewards,
                None,
            ),
        ];

        if selection.calculate_delegators {
            self.delegator_participants(
                &guardian,
                &guardian.delegators,
                ParticipantKind::Delegator,
                details,
                read_from_block,
                &mut participants,
            )
            .await;
            self.delegator_participants(
                &guardian,
                &guardian.delegators_left,
                ParticipantKind::HistoricalDelegator,
                details,
                read_from_block,
                &mut participants,
            )
            .await;
        }

        participants
    }

    async fn delegator_participants(
        &self,
        guardian: &GuardianInfo,
        delegators: &[DelegatorRef],
        kind: ParticipantKind,
        details: &ReportDetails,
        read_from_block: u64,
        participants: &mut Vec<Participant>,
    ) {
        let label = match kind {
            ParticipantKind::HistoricalDelegator => "historical delegator",
            _ => "delegator",
        };
        for delegator in delegators {
            let address = delegator.address;
            let fetched = with_retry(&self.config.retry, &format!("{label} {address}"), || {
                self.ledger.get_delegator_rewards(address, read_from_block)
            })
            .await;
            let rewards = match fetched {
                Ok(checkpoints) => {
                    allocate_rewards(&checkpoints, &guardian.address, &details.periods)
                }
                Err(err) => {
                    tracing::error!(
                        "Error while generating {label} {address}: {err} ... (skipped)"
                    );
                    Vec::new()
                }
            };
            participants.push(Participant::new(guardian, kind, rewards, Some(address)));
        }
    }
}
