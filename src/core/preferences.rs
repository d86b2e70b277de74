use std::collections::HashSet;

use crate::core::compatibility::FilteredScoreMatrix;

/// An acceptor a proposer may still propose to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub acceptor: usize,
    pub score: f64,
}

/// A proposer's ranked, shrinking set of remaining acceptors
///
/// Candidates are stored once, best first, and never re-added. Rejections
/// only mark entries as removed; `cursor` skips past removed entries at the
/// front so `best_remaining` is amortized O(1).
#[derive(Debug, Clone)]
pub struct PreferenceList {
    proposer: usize,
    candidates: Vec<Candidate>,
    removed: HashSet<usize>,
    cursor: usize,
}

impl PreferenceList {
    /// Rank every eligible acceptor by the proposer's score, highest first,
    /// ties broken by lowest acceptor id
    ///
    /// Filtered-out pairs never become candidates.
    pub fn build(proposer: usize, acceptors: &[usize], scores: &FilteredScoreMatrix) -> Self {
        let mut candidates: Vec<Candidate> = acceptors
            .iter()
            .filter(|&&a| a != proposer)
            .filter_map(|&a| {
                scores
                    .get(proposer, a)
                    .map(|score| Candidate { acceptor: a, score })
            })
            .collect();

        candidates.sort_by(|x, y| {
            y.score
                .total_cmp(&x.score)
                .then_with(|| x.acceptor.cmp(&y.acceptor))
        });

        Self {
            proposer,
            candidates,
            removed: HashSet::new(),
            cursor: 0,
        }
    }

    pub fn proposer(&self) -> usize {
        self.proposer
    }

    /// Highest-ranked candidate not yet rejected, or `None` once exhausted
    pub fn best_remaining(&mut self) -> Option<Candidate> {
        while let Some(candidate) = self.candidates.get(self.cursor) {
            if !self.removed.contains(&candidate.acceptor) {
                return Some(*candidate);
            }
            self.cursor += 1;
        }
        None
    }

    /// Permanently drop `acceptor`; returns false if it was not a live candidate
    pub fn reject(&mut self, acceptor: usize) -> bool {
        let present = self.candidates.iter().any(|c| c.acceptor == acceptor);
        present && self.removed.insert(acceptor)
    }

    pub fn remaining(&self) -> usize {
        self.candidates.len() - self.removed.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }
}
