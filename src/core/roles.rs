use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::error::InputError;
use crate::models::Role;

/// Split of participants into proposers and acceptors for one run
///
/// `proposers` keeps the order proposers enter the work queue; `acceptors` is
/// sorted by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePartition {
    proposers: Vec<usize>,
    acceptors: Vec<usize>,
    roles: Vec<Role>,
}

impl RolePartition {
    /// Use an explicit proposer set
    ///
    /// The set must contain exactly `floor(n / 2)` distinct ids below `n`.
    pub fn from_proposers(n: usize, proposers: Vec<usize>) -> Result<Self, InputError> {
        if proposers.len() != n / 2 {
            return Err(InputError::InvalidPartition(format!(
                "expected {} proposers for {} participants, got {}",
                n / 2,
                n,
                proposers.len()
            )));
        }

        let mut roles = vec![Role::Acceptor; n];
        for &p in &proposers {
            if p >= n {
                return Err(InputError::InvalidPartition(format!(
                    "proposer {} is out of range for {} participants",
                    p, n
                )));
            }
            if roles[p] == Role::Proposer {
                return Err(InputError::InvalidPartition(format!(
                    "proposer {} listed twice",
                    p
                )));
            }
            roles[p] = Role::Proposer;
        }

        let acceptors = (0..n).filter(|&i| roles[i] == Role::Acceptor).collect();

        Ok(Self {
            proposers,
            acceptors,
            roles,
        })
    }

    pub fn proposers(&self) -> &[usize] {
        &self.proposers
    }

    pub fn acceptors(&self) -> &[usize] {
        &self.acceptors
    }

    #[inline]
    pub fn role_of(&self, participant: usize) -> Role {
        self.roles[participant]
    }

    #[inline]
    pub fn is_proposer(&self, participant: usize) -> bool {
        self.roles[participant] == Role::Proposer
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

/// Randomly assign `floor(n / 2)` participants to propose and the rest to
/// accept
///
/// The split ignores gender entirely; compatibility is resolved by the filter.
pub fn partition<R: Rng + ?Sized>(n: usize, rng: &mut R) -> RolePartition {
    let mut ids: Vec<usize> = (0..n).collect();
    ids.shuffle(rng);

    let acceptors: BTreeSet<usize> = ids[n / 2..].iter().copied().collect();
    ids.truncate(n / 2);

    let mut roles = vec![Role::Proposer; n];
    for &a in &acceptors {
        roles[a] = Role::Acceptor;
    }

    RolePartition {
        proposers: ids,
        acceptors: acceptors.into_iter().collect(),
        roles,
    }
}
