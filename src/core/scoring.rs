use crate::core::error::InputError;
use crate::core::matrix::ScoreMatrix;
use crate::models::{ScoringWeights, SurveyParticipant};

const MALE: &str = "Male";
const FEMALE: &str = "Female";

/// Graduation-year gap tables, indexed by the gap in years. Gaps past the end
/// use the last entry.
const SAME_IDENTITY_GAP: [f64; 4] = [1.0, 0.5, 0.25, 0.25];
const FEMALE_OLDER_GAP: [f64; 4] = [0.5, 0.25, 0.1, 0.0];
const MALE_OLDER_GAP: [f64; 4] = [0.5, 1.0, 0.5, 0.0];

/// How often each answer was given to each question
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDistribution {
    counts: Vec<Vec<usize>>,
    respondents: usize,
}

impl ResponseDistribution {
    /// Share of respondents who gave `answer` to `question`
    pub fn share(&self, question: usize, answer: u8) -> f64 {
        if self.respondents == 0 {
            return 0.0;
        }
        let count = self
            .counts
            .get(question)
            .and_then(|answers| answers.get(answer as usize))
            .copied()
            .unwrap_or(0);
        count as f64 / self.respondents as f64
    }

    pub fn questions(&self) -> usize {
        self.counts.len()
    }
}

/// Count answers per question across all participants
///
/// Every participant must have answered the same number of questions.
pub fn compute_response_distribution(
    participants: &[SurveyParticipant],
) -> Result<ResponseDistribution, InputError> {
    let questions = participants.first().map_or(0, |p| p.responses.len());
    let mut counts: Vec<Vec<usize>> = vec![Vec::new(); questions];

    for participant in participants {
        if participant.responses.len() != questions {
            return Err(InputError::LengthMismatch {
                field: "survey responses",
                expected: questions,
                actual: participant.responses.len(),
            });
        }
        for (question, &answer) in participant.responses.iter().enumerate() {
            let answers = &mut counts[question];
            if answers.len() <= answer as usize {
                answers.resize(answer as usize + 1, 0);
            }
            answers[answer as usize] += 1;
        }
    }

    Ok(ResponseDistribution {
        counts,
        respondents: participants.len(),
    })
}

/// Graduation-year compatibility (0-1)
///
/// Same-identity pairs and mixes other than Male/Female use a symmetric
/// table. Male/Female pairs favour the man being about a year older.
#[inline]
pub fn calculate_grad_year_score(a: &SurveyParticipant, b: &SurveyParticipant) -> f64 {
    let gap = a.grad_year.abs_diff(b.grad_year) as usize;
    let lookup = |table: &[f64; 4]| -> f64 { table[gap.min(table.len() - 1)] };

    // A later graduation year means the younger participant
    let a_younger = a.grad_year > b.grad_year;
    match (a.gender_identity.as_str(), b.gender_identity.as_str()) {
        (MALE, FEMALE) if a_younger => lookup(&FEMALE_OLDER_GAP),
        (MALE, FEMALE) => lookup(&MALE_OLDER_GAP),
        (FEMALE, MALE) if a_younger => lookup(&MALE_OLDER_GAP),
        (FEMALE, MALE) => lookup(&FEMALE_OLDER_GAP),
        _ => lookup(&SAME_IDENTITY_GAP),
    }
}

/// Survey-answer compatibility (0-1)
///
/// Each question answered identically adds `1/Q`, scaled down the more
/// common that answer is: rare agreement counts for more.
#[inline]
pub fn calculate_response_score(
    a: &SurveyParticipant,
    b: &SurveyParticipant,
    distribution: &ResponseDistribution,
) -> f64 {
    let questions = distribution.questions();
    if questions == 0 {
        return 0.0;
    }
    let weight = 1.0 / questions as f64;

    a.responses
        .iter()
        .zip(&b.responses)
        .enumerate()
        .filter(|(_, (x, y))| x == y)
        .map(|(question, (&x, &y))| {
            let p1 = distribution.share(question, x);
            let p2 = distribution.share(question, y);
            weight * rarity_scale(p1, p2)
        })
        .sum()
}

#[inline]
fn rarity_scale(p1: f64, p2: f64) -> f64 {
    1.0 / (1.0 + (p1 * p2).sqrt())
}

/// Calculate a raw compatibility score (0-1) between two participants
///
/// Scoring formula:
/// score = (
///     grad_year_score * 0.10 +     # Graduation years close, man slightly older
///     response_score * 0.90        # Rare shared answers = higher
/// )
///
/// Gender compatibility is not considered here; the matching engine's
/// compatibility filter handles it.
pub fn calculate_compatibility_score(
    a: &SurveyParticipant,
    b: &SurveyParticipant,
    distribution: &ResponseDistribution,
    weights: &ScoringWeights,
) -> f64 {
    let grad_score = calculate_grad_year_score(a, b);
    let response_score = calculate_response_score(a, b, distribution);

    let total = grad_score * weights.grad_year + response_score * weights.responses;
    total.clamp(0.0, 1.0)
}

/// Build the N×N raw score matrix for a survey population
pub fn build_score_matrix(
    participants: &[SurveyParticipant],
    weights: &ScoringWeights,
) -> Result<ScoreMatrix, InputError> {
    let distribution = compute_response_distribution(participants)?;

    let rows: Vec<Vec<f64>> = participants
        .iter()
        .enumerate()
        .map(|(i, a)| {
            participants
                .iter()
                .enumerate()
                .map(|(j, b)| {
                    if i == j {
                        0.0
                    } else {
                        calculate_compatibility_score(a, b, &distribution, weights)
                    }
                })
                .collect::<Vec<f64>>()
        })
        .collect();

    ScoreMatrix::new(rows)
}
