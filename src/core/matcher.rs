use std::collections::{BTreeMap, VecDeque};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn};

use crate::core::{
    assembler::assemble,
    compatibility::{filter, CompatibilityTable, FilteredScoreMatrix},
    error::{InputError, MatchingError},
    matrix::MatchingInput,
    preferences::PreferenceList,
    roles::{partition, RolePartition},
};
use crate::models::{MatchOutcome, RunStats};

/// Where a proposer is in the deferred-acceptance cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposerState {
    Queued,
    Proposing,
    Held,
    /// Bumped by a better proposer; back in the queue
    Displaced,
    /// Ran out of candidates before anyone held it
    Exhausted,
    Matched,
}

/// Gender-aware stable matching engine
///
/// # Pipeline
/// 1. Compatibility filter over the raw scores
/// 2. Random proposer/acceptor split
/// 3. Deferred acceptance over a FIFO queue of proposers
/// 4. Assembly of pairs and unmatched diagnostics
///
/// The engine is stateless between runs; every run owns its working copies.
#[derive(Debug, Clone, Default)]
pub struct MatchingEngine {
    table: CompatibilityTable,
    seed: Option<u64>,
}

impl MatchingEngine {
    pub fn new(table: CompatibilityTable) -> Self {
        Self { table, seed: None }
    }

    /// Make role assignment reproducible across runs
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn table(&self) -> &CompatibilityTable {
        &self.table
    }

    /// Run a matching with roles drawn from the configured seed, or from
    /// entropy when none is set
    pub fn run(
        &self,
        input: &MatchingInput,
        cancel: &CancellationToken,
    ) -> Result<MatchOutcome, MatchingError> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.run_with_rng(input, &mut rng, cancel)
    }

    /// Run a matching drawing the role split from `rng`
    pub fn run_with_rng<R: Rng + ?Sized>(
        &self,
        input: &MatchingInput,
        rng: &mut R,
        cancel: &CancellationToken,
    ) -> Result<MatchOutcome, MatchingError> {
        let roles = partition(input.len(), rng);
        self.run_with_partition(input, roles, cancel)
    }

    /// Run a matching with a caller-chosen role split
    pub fn run_with_partition(
        &self,
        input: &MatchingInput,
        roles: RolePartition,
        cancel: &CancellationToken,
    ) -> Result<MatchOutcome, MatchingError> {
        self.table.validate(input.participants())?;
        if roles.len() != input.len() {
            return Err(InputError::InvalidPartition(format!(
                "partition covers {} participants, input has {}",
                roles.len(),
                input.len()
            ))
            .into());
        }

        let span = info_span!("matching_run", participants = input.len());
        let _enter = span.enter();

        if input.len() < 2 {
            debug!("Degenerate input of {} participants, nothing to match", input.len());
        }

        let scores = filter(input.scores(), input.participants(), &self.table);
        debug!(
            "Compatibility filter kept {} of {} ordered pairs",
            scores.eligible_pairs(),
            input.len() * input.len().saturating_sub(1)
        );

        let run = DeferredAcceptance::new(&scores, &roles);
        let (tentative, stats) = run.execute(cancel)?;

        let outcome = assemble(&tentative, &roles, &scores, stats);

        info!(
            "Matched {} pairs, {} unmatched ({} proposals, {} rejections, {} displacements)",
            outcome.pairs.len(),
            outcome.unmatched.len(),
            stats.proposals,
            stats.rejections,
            stats.displacements
        );

        Ok(outcome)
    }
}

/// Working state of one deferred-acceptance run
struct DeferredAcceptance<'a> {
    scores: &'a FilteredScoreMatrix,
    roles: &'a RolePartition,
    queue: VecDeque<usize>,
    /// acceptor -> currently held proposer; entries are replaced, never removed
    tentative: BTreeMap<usize, usize>,
    /// Built lazily on a proposer's first proposal, indexed by participant id
    preferences: Vec<Option<PreferenceList>>,
    states: Vec<Option<ProposerState>>,
    stats: RunStats,
}

impl<'a> DeferredAcceptance<'a> {
    fn new(scores: &'a FilteredScoreMatrix, roles: &'a RolePartition) -> Self {
        let n = roles.len();
        let mut states = vec![None; n];
        for &p in roles.proposers() {
            states[p] = Some(ProposerState::Queued);
        }

        Self {
            scores,
            roles,
            queue: roles.proposers().iter().copied().collect(),
            tentative: BTreeMap::new(),
            preferences: vec![None; n],
            states,
            stats: RunStats {
                proposer_count: roles.proposers().len(),
                acceptor_count: roles.acceptors().len(),
                ..Default::default()
            },
        }
    }

    /// Every proposal either lands a hold or costs a rejection, and each
    /// (proposer, acceptor) pair is rejected at most once
    fn proposal_budget(&self) -> usize {
        self.stats.rejection_bound() + self.roles.len()
    }

    fn execute(
        mut self,
        cancel: &CancellationToken,
    ) -> Result<(BTreeMap<usize, usize>, RunStats), MatchingError> {
        let budget = self.proposal_budget();

        while let Some(proposer) = self.queue.pop_front() {
            if cancel.is_cancelled() {
                warn!("Matching run cancelled after {} proposals", self.stats.proposals);
                return Err(MatchingError::Cancelled {
                    proposals: self.stats.proposals,
                });
            }

            self.states[proposer] = Some(ProposerState::Proposing);

            // Keep proposing within this turn until held or out of candidates
            loop {
                let Some(candidate) = self.preferences_of(proposer).best_remaining() else {
                    warn!("Proposer {} exhausted all candidates and stays unmatched", proposer);
                    self.states[proposer] = Some(ProposerState::Exhausted);
                    break;
                };

                self.stats.proposals += 1;
                if self.stats.proposals > budget {
                    return Err(MatchingError::StepBudgetExceeded { budget });
                }

                let acceptor = candidate.acceptor;
                match self.tentative.get(&acceptor).copied() {
                    None => {
                        self.hold(acceptor, proposer);
                        break;
                    }
                    Some(holder)
                        if self.acceptor_score(acceptor, proposer)
                            > self.acceptor_score(acceptor, holder) =>
                    {
                        debug!("Acceptor {} drops {} for {}", acceptor, holder, proposer);
                        self.preferences_of(holder).reject(acceptor);
                        self.stats.rejections += 1;
                        self.stats.displacements += 1;
                        self.states[holder] = Some(ProposerState::Displaced);
                        self.queue.push_back(holder);
                        self.hold(acceptor, proposer);
                        break;
                    }
                    Some(_) => {
                        self.preferences_of(proposer).reject(acceptor);
                        self.stats.rejections += 1;
                    }
                }
            }
        }

        for state in self.states.iter_mut().flatten() {
            if *state == ProposerState::Held {
                *state = ProposerState::Matched;
            }
        }
        debug_assert!(self.states.iter().flatten().all(|s| matches!(
            s,
            ProposerState::Matched | ProposerState::Exhausted
        )));

        Ok((self.tentative, self.stats))
    }

    fn hold(&mut self, acceptor: usize, proposer: usize) {
        self.tentative.insert(acceptor, proposer);
        self.states[proposer] = Some(ProposerState::Held);
    }

    fn preferences_of(&mut self, proposer: usize) -> &mut PreferenceList {
        let scores = self.scores;
        let roles = self.roles;
        let acceptors = roles.acceptors();
        self.preferences[proposer]
            .get_or_insert_with(|| PreferenceList::build(proposer, acceptors, scores))
    }

    /// Candidates are always eligible pairs, so the score is present
    fn acceptor_score(&self, acceptor: usize, proposer: usize) -> f64 {
        self.scores
            .get(acceptor, proposer)
            .unwrap_or(f64::NEG_INFINITY)
    }
}
