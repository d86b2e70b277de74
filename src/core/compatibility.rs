use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::error::InputError;
use crate::core::matrix::ScoreMatrix;
use crate::models::Participant;

/// One row of the compatibility table: a preference label and the identity
/// labels it accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityRule {
    pub preference: String,
    pub accepts: Vec<String>,
}

impl CompatibilityRule {
    pub fn new(preference: &str, accepts: &[&str]) -> Self {
        Self {
            preference: preference.to_string(),
            accepts: accepts.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Maps each gender preference label to the set of identity labels it accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityTable {
    accepted: BTreeMap<String, BTreeSet<String>>,
}

impl CompatibilityTable {
    /// Build a table from rules; repeated preferences are merged
    pub fn from_rules(rules: impl IntoIterator<Item = CompatibilityRule>) -> Self {
        let mut accepted: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for rule in rules {
            accepted
                .entry(rule.preference)
                .or_default()
                .extend(rule.accepts);
        }
        Self { accepted }
    }

    /// Men, Women and Bisexual over Male, Female and Nonbinary identities
    pub fn standard() -> Self {
        Self::from_rules(default_rules())
    }

    #[inline]
    pub fn accepts(&self, preference: &str, identity: &str) -> bool {
        self.accepted
            .get(preference)
            .is_some_and(|identities| identities.contains(identity))
    }

    pub fn knows_preference(&self, preference: &str) -> bool {
        self.accepted.contains_key(preference)
    }

    /// Both participants accept each other's identity
    #[inline]
    pub fn mutually_compatible(&self, a: &Participant, b: &Participant) -> bool {
        self.accepts(&a.gender_preference, &b.gender_identity)
            && self.accepts(&b.gender_preference, &a.gender_identity)
    }

    /// Fail on the first participant whose preference label is not in the table
    ///
    /// Identity labels are not checked: an identity no preference accepts is
    /// simply unmatchable.
    pub fn validate(&self, participants: &[Participant]) -> Result<(), InputError> {
        match participants
            .iter()
            .find(|p| !self.knows_preference(&p.gender_preference))
        {
            Some(p) => Err(InputError::UnknownPreference {
                participant: p.id,
                label: p.gender_preference.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn rules(&self) -> Vec<CompatibilityRule> {
        self.accepted
            .iter()
            .map(|(preference, identities)| CompatibilityRule {
                preference: preference.clone(),
                accepts: identities.iter().cloned().collect(),
            })
            .collect()
    }
}

impl Default for CompatibilityTable {
    fn default() -> Self {
        Self::standard()
    }
}

pub fn default_rules() -> Vec<CompatibilityRule> {
    vec![
        CompatibilityRule::new("Men", &["Male", "Nonbinary"]),
        CompatibilityRule::new("Women", &["Female", "Nonbinary"]),
        CompatibilityRule::new("Bisexual", &["Male", "Female", "Nonbinary"]),
    ]
}

/// Score matrix with gender-infeasible pairs removed
///
/// A `None` entry means the pair may never be matched. `Some(0.0)` is a
/// legitimate, if weak, candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredScoreMatrix {
    n: usize,
    entries: Vec<Option<f64>>,
}

impl FilteredScoreMatrix {
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.entries[i * self.n + j]
    }

    #[inline]
    pub fn is_eligible(&self, i: usize, j: usize) -> bool {
        self.get(i, j).is_some()
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Number of ordered eligible pairs
    pub fn eligible_pairs(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// Materialize as a plain score matrix with removed pairs scored zero
    pub fn to_score_matrix(&self) -> ScoreMatrix {
        ScoreMatrix::from_flat(
            self.n,
            self.entries.iter().map(|e| e.unwrap_or(0.0)).collect(),
        )
    }
}

/// Remove every pair whose identity/preference combination is not mutually
/// acceptable
///
/// Works on a copy; `scores` is left untouched. Compatible pairs keep their
/// raw score in each direction.
pub fn filter(
    scores: &ScoreMatrix,
    participants: &[Participant],
    table: &CompatibilityTable,
) -> FilteredScoreMatrix {
    let n = scores.len();
    debug_assert_eq!(participants.len(), n);

    let mut entries = vec![None; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            if table.mutually_compatible(&participants[i], &participants[j]) {
                entries[i * n + j] = Some(scores.get(i, j));
                entries[j * n + i] = Some(scores.get(j, i));
            }
        }
    }

    FilteredScoreMatrix { n, entries }
}
