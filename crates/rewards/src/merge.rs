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

//! Merging of reports computed independently on different networks.

use std::collections::HashMap;

use alloy_primitives::Address;

use crate::report::{Participant, ParticipantKind, Report};

/// Identity of a row across reports. The delegator address only counts for delegator rows.
type RowKey = (Address, Option<ParticipantKind>, Option<Address>);

fn row_key(participant: &Participant) -> RowKey {
    let delegator = match participant.kind {
        Some(kind) if kind.is_delegator() => participant.delegator_address,
        _ => None,
    };
    (participant.guardian_address, participant.kind, delegator)
}

/// Element-wise sum of two reward rows. Missing data on either side stays missing.
fn sum_rewards(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    (0..a.len().max(b.len()))
        .map(|i| a.get(i).copied().unwrap_or_default() + b.get(i).copied().unwrap_or_default())
        .collect()
}

/// Sort key: guardian address, row kind, then delegator address. Rows without a kind sort
/// last.
fn sort_key(participant: &Participant) -> (Address, u8, Option<Address>) {
    let rank = participant.kind.map_or(u8::MAX, |kind| kind as u8);
    (participant.guardian_address, rank, participant.delegator_address)
}

/// Combine two reports with the same period layout into one.
///
/// Rows of both reports that identify the same participant are replaced by a single row
/// holding the sum of their rewards. The details of `a` are kept.
pub fn merge_reports(a: Report, b: Report) -> Report {
    if a.details.periods.len() != b.details.periods.len() {
        tracing::warn!(
            "Merging reports with {} and {} periods; keeping the layout of the first",
            a.details.periods.len(),
            b.details.periods.len()
        );
    }

    let mut merged: Vec<Participant> = Vec::with_capacity(a.participants.len());
    let mut index_by_key: HashMap<RowKey, usize> = HashMap::new();
    for participant in a.participants.into_iter().chain(b.participants) {
        match index_by_key.get(&row_key(&participant)) {
            Some(&index) => {
                let existing = &mut merged[index];
                existing.rewards = sum_rewards(&existing.rewards, &participant.rewards);
            }
            None => {
                index_by_key.insert(row_key(&participant), merged.len());
                merged.push(participant);
            }
        }
    }

    merged.sort_by_key(sort_key);
    tracing::debug!("Merged reports into {} participants", merged.len());

    Report { details: a.details, participants: merged }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::*;
    use crate::periods::{Period, ReportDetails};

    const G1: Address = address!("0x0101010101010101010101010101010101010101");
    const G2: Address = address!("0x0202020202020202020202020202020202020202");
    const D1: Address = address!("0xd1d1d1d1d1d1d1d1d1d1d1d1d1d1d1d1d1d1d1d1");
    const D2: Address = address!("0xd2d2d2d2d2d2d2d2d2d2d2d2d2d2d2d2d2d2d2d2");

    fn row(
        guardian: Address,
        kind: ParticipantKind,
        delegator: Option<Address>,
        rewards: Vec<f64>,
    ) -> Participant {
        Participant {
            guardian_address: guardian,
            guardian_name: Some(format!("{guardian}")),
            guardian_certified: Some(false),
            kind: Some(kind),
            delegator_address: delegator,
            rewards,
        }
    }

    fn report(participants: Vec<Participant>) -> Report {
        Report {
            details: ReportDetails::from_periods(vec![
                Period::new(600, 1000),
                Period::new(200, 599),
            ]),
            participants,
        }
    }

    #[test]
    fn test_matching_rows_are_summed() {
        let a = report(vec![row(G1, ParticipantKind::Total, None, vec![10.0, 20.0])]);
        let b = report(vec![row(G1, ParticipantKind::Total, None, vec![5.0, 5.0])]);

        let merged = merge_reports(a, b);

        assert_eq!(merged.participants.len(), 1);
        assert_eq!(merged.participants[0].rewards, vec![15.0, 25.0]);
    }

    #[test]
    fn test_delegators_match_on_delegator_address() {
        let a = report(vec![
            row(G1, ParticipantKind::Delegator, Some(D1), vec![1.0, 1.0]),
            row(G1, ParticipantKind::Delegator, Some(D2), vec![2.0, 2.0]),
        ]);
        let b = report(vec![
            row(G1, ParticipantKind::Delegator, Some(D2), vec![3.0, 3.0]),
            row(G1, ParticipantKind::HistoricalDelegator, Some(D1), vec![4.0, 4.0]),
        ]);

        let merged = merge_reports(a, b);

        assert_eq!(merged.participants.len(), 3);
        assert_eq!(merged.participants[0].delegator_address, Some(D1));
        assert_eq!(merged.participants[0].rewards, vec![1.0, 1.0]);
        assert_eq!(merged.participants[1].delegator_address, Some(D2));
        assert_eq!(merged.participants[1].rewards, vec![5.0, 5.0]);
        assert_eq!(merged.participants[2].kind, Some(ParticipantKind::HistoricalDelegator));
    }

    #[test]
    fn test_sort_order() {
        let a = report(vec![
            row(G2, ParticipantKind::Total, None, vec![1.0, 1.0]),
            row(G1, ParticipantKind::HistoricalDelegator, Some(D1), vec![1.0, 1.0]),
            row(G1, ParticipantKind::TotalDelegators, None, vec![1.0, 1.0]),
        ]);
        let b = report(vec![
            Participant::missing_guardian(G1),
            row(G1, ParticipantKind::Delegator, Some(D2), vec![1.0, 1.0]),
            row(G1, ParticipantKind::SelfShare, None, vec![1.0, 1.0]),
            row(G1, ParticipantKind::Total, None, vec![1.0, 1.0]),
        ]);

        let merged = merge_reports(a, b);

        let order: Vec<_> =
            merged.participants.iter().map(|p| (p.guardian_address, p.kind)).collect();
        assert_eq!(
            order,
            vec![
                (G1, Some(ParticipantKind::Total)),
                (G1, Some(ParticipantKind::SelfShare)),
                (G1, Some(ParticipantKind::TotalDelegators)),
                (G1, Some(ParticipantKind::Delegator)),
                (G1, Some(ParticipantKind::HistoricalDelegator)),
                (G1, None),
                (G2, Some(ParticipantKind::Total)),
            ]
        );
    }

    #[test]
    fn test_merge_is_commutative() {
        let a = report(vec![
            row(G1, ParticipantKind::Total, None, vec![1.5, 2.5]),
            row(G2, ParticipantKind::Total, None, vec![7.0, 0.0]),
        ]);
        let b = report(vec![
            row(G1, ParticipantKind::Total, None, vec![0.5, 0.25]),
            row(G1, ParticipantKind::Delegator, Some(D1), vec![3.0, 1.0]),
        ]);

        let ab = merge_reports(a.clone(), b.clone());
        let ba = merge_reports(b.clone(), a.clone());

        assert_eq!(ab.participants, ba.participants);
        assert!(ab.participants.len() < a.participants.len() + b.participants.len());
    }

    #[test]
    fn test_delegator_order_does_not_depend_on_argument_order() {
        let a = report(vec![
            row(G1, ParticipantKind::Delegator, Some(D2), vec![1.0, 1.0]),
            row(G1, ParticipantKind::Total, None, vec![2.0, 2.0]),
        ]);
        let b = report(vec![
            row(G1, ParticipantKind::Delegator, Some(D1), vec![3.0, 3.0]),
            row(G1, ParticipantKind::HistoricalDelegator, Some(D2), vec![4.0, 4.0]),
            row(G1, ParticipantKind::HistoricalDelegator, Some(D1), vec![5.0, 5.0]),
        ]);

        let ab = merge_reports(a.clone(), b.clone());
        let ba = merge_reports(b, a);

        assert_eq!(ab.participants, ba.participants);
        let order: Vec<_> =
            ab.participants.iter().map(|p| (p.kind, p.delegator_address)).collect();
        assert_eq!(
            order,
            vec![
                (Some(ParticipantKind::Total), None),
                (Some(ParticipantKind::Delegator), Some(D1)),
                (Some(ParticipantKind::Delegator), Some(D2)),
                (Some(ParticipantKind::HistoricalDelegator), Some(D1)),
                (Some(ParticipantKind::HistoricalDelegator), Some(D2)),
            ]
        );
    }

    #[test]
    fn test_disjoint_reports_keep_every_row() {
        let a = report(vec![row(G1, ParticipantKind::Total, None, vec![1.0, 1.0])]);
        let b = report(vec![row(G2, ParticipantKind::Total, None, vec![1.0, 1.0])]);

        let merged = merge_reports(a, b);
        assert_eq!(merged.participants.len(), 2);
    }

    #[test]
    fn test_missing_data_stays_missing() {
        let a = report(vec![row(G1, ParticipantKind::Delegator, Some(D1), vec![])]);
        let b = report(vec![row(G1, ParticipantKind::Delegator, Some(D1), vec![1.0, 2.0])]);

        let merged = merge_reports(a, b);
        assert!(merged.participants[0].is_missing_data());
    }

    #[test]
    fn test_details_of_first_report_are_kept() {
        let a = report(vec![]);
        let mut b = report(vec![]);
        b.details.periods[0].end_block_time = 42;

        let merged = merge_reports(a.clone(), b);
        assert_eq!(merged.details, a.details);
    }
}
