use std::collections::BTreeMap;

use crate::core::compatibility::FilteredScoreMatrix;
use crate::core::roles::RolePartition;
use crate::models::{
    MatchOutcome, MatchPair, Role, RunStats, UnmatchedParticipant, UnmatchedReason,
};

/// Turn the final tentative assignment (acceptor -> proposer) into pairs and
/// unmatched diagnostics
///
/// Pairs come out ordered by acceptor id. Every participant missing from the
/// pairs is listed in `unmatched`, ordered by id.
pub fn assemble(
    tentative: &BTreeMap<usize, usize>,
    roles: &RolePartition,
    scores: &FilteredScoreMatrix,
    stats: RunStats,
) -> MatchOutcome {
    let pairs: Vec<MatchPair> = tentative
        .iter()
        .map(|(&acceptor, &proposer)| MatchPair {
            proposer,
            acceptor,
            proposer_score: scores.get(proposer, acceptor).unwrap_or_default(),
            acceptor_score: scores.get(acceptor, proposer).unwrap_or_default(),
        })
        .collect();

    let mut matched = vec![false; roles.len()];
    for pair in &pairs {
        matched[pair.proposer] = true;
        matched[pair.acceptor] = true;
    }

    let unmatched = (0..roles.len())
        .filter(|&id| !matched[id])
        .map(|id| {
            let role = roles.role_of(id);
            let reason = match role {
                Role::Proposer => UnmatchedReason::ExhaustedCandidates,
                Role::Acceptor => UnmatchedReason::NoProposals,
            };
            UnmatchedParticipant { id, role, reason }
        })
        .collect();

    MatchOutcome {
        pairs,
        unmatched,
        stats,
    }
}
