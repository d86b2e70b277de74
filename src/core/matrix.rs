use crate::core::error::InputError;
use crate::models::Participant;

/// Validated N×N matrix of raw compatibility scores in `[0, 1]`
///
/// `get(i, j)` is how much `i` likes `j`. The matrix is usually symmetric but
/// nothing here relies on that. Diagonal entries are never read or validated.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    n: usize,
    values: Vec<f64>,
}

impl ScoreMatrix {
    /// Build a matrix from rows, rejecting ragged or out-of-range input
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, InputError> {
        let n = rows.len();
        let mut values = Vec::with_capacity(n * n);

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(InputError::NotSquare {
                    row: i,
                    expected: n,
                    actual: row.len(),
                });
            }
            for (j, &value) in row.iter().enumerate() {
                // NaN fails the range check too
                if i != j && !(0.0..=1.0).contains(&value) {
                    return Err(InputError::ScoreOutOfRange { row: i, col: j, value });
                }
            }
            values.extend(row);
        }

        Ok(Self { n, values })
    }

    /// Internal constructor for values that are already known to be valid
    pub(crate) fn from_flat(n: usize, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), n * n);
        Self { n, values }
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks panics on zero; an empty matrix has no rows anyway
        self.values.chunks(self.n.max(1))
    }
}

/// Score matrix plus the participants it describes, indexed consistently
#[derive(Debug, Clone)]
pub struct MatchingInput {
    scores: ScoreMatrix,
    participants: Vec<Participant>,
}

impl MatchingInput {
    pub fn new(
        scores: ScoreMatrix,
        gender_identities: Vec<String>,
        gender_preferences: Vec<String>,
    ) -> Result<Self, InputError> {
        let n = scores.len();
        if gender_identities.len() != n {
            return Err(InputError::LengthMismatch {
                field: "gender identities",
                expected: n,
                actual: gender_identities.len(),
            });
        }
        if gender_preferences.len() != n {
            return Err(InputError::LengthMismatch {
                field: "gender preferences",
                expected: n,
                actual: gender_preferences.len(),
            });
        }

        let participants = gender_identities
            .into_iter()
            .zip(gender_preferences)
            .enumerate()
            .map(|(id, (gender_identity, gender_preference))| Participant {
                id,
                gender_identity,
                gender_preference,
            })
            .collect();

        Ok(Self {
            scores,
            participants,
        })
    }

    /// Convenience for callers holding raw rows and labels
    pub fn from_raw<S: Into<String>>(
        rows: Vec<Vec<f64>>,
        gender_identities: impl IntoIterator<Item = S>,
        gender_preferences: impl IntoIterator<Item = S>,
    ) -> Result<Self, InputError> {
        Self::new(
            ScoreMatrix::new(rows)?,
            gender_identities.into_iter().map(Into::into).collect(),
            gender_preferences.into_iter().map(Into::into).collect(),
        )
    }

    pub fn scores(&self) -> &ScoreMatrix {
        &self.scores
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}
