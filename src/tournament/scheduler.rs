use std::collections::VecDeque;

use tracing::{trace, warn};

use super::identity_pool::IdentityPool;
use super::judge::MatchReport;
use super::schedule::AgentPair;

/// A match admitted to run, with its leased identities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledMatch {
    pub index: usize,
    pub pair: AgentPair,
    pub uids: (u32, u32),
}

/// What a worker sends back once the judge process is gone.
#[derive(Debug)]
pub struct MatchOutcome {
    pub scheduled: ScheduledMatch,
    pub result: anyhow::Result<MatchReport>,
}

/// Final record of one scheduled match.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    /// Agents as scheduled.
    pub pair: AgentPair,
    /// Judge summary, or why the orchestrator could not obtain one.
    pub result: Result<MatchReport, String>,
}

/// Admission control, owned by the coordinating thread.
///
/// A match starts only when fewer than `max_running` matches are running and two identities
/// are free. Each result frees its slot and identities, whether the match succeeded or not.
pub struct TournamentScheduler {
    pending: VecDeque<(usize, AgentPair)>,
    pool: IdentityPool,
    max_running: usize,
    running: usize,
    records: Vec<Option<MatchRecord>>,
}

impl TournamentScheduler {
    pub fn new(schedule: Vec<AgentPair>, pool: IdentityPool, max_running: usize) -> Self {
        TournamentScheduler {
            records: vec![None; schedule.len()],
            pending: schedule.into_iter().enumerate().collect(),
            pool,
            max_running: max_running.max(1),
            running: 0,
        }
    }

    /// Admit as many pending matches as the bound and the pool allow.
    pub fn advance(&mut self) -> Vec<ScheduledMatch> {
        let mut admitted = vec![];
        while self.running < self.max_running {
            let Some((index, pair)) = self.pending.pop_front() else {
                break;
            };
            let Some(uids) = self.pool.try_lease_pair() else {
                self.pending.push_front((index, pair));
                break;
            };
            self.running += 1;
            admitted.push(ScheduledMatch { index, pair, uids });
        }
        trace!(
            admitted = admitted.len(),
            running = self.running,
            free = self.pool.free(),
            pending = self.pending.len(),
            "advance"
        );
        admitted
    }

    /// Record a finished match, free its slot and identities, and admit what can now run.
    pub fn on_result(&mut self, outcome: MatchOutcome) -> Vec<ScheduledMatch> {
        let MatchOutcome { scheduled, result } = outcome;
        self.pool.release(scheduled.uids);
        self.running -= 1;

        let result = result.map_err(|e| {
            warn!("match {} ({}) failed: {e:#}", scheduled.index, scheduled.pair);
            format!("{e:#}")
        });
        self.records[scheduled.index] = Some(MatchRecord {
            pair: scheduled.pair,
            result,
        });
        self.advance()
    }

    pub fn running(&self) -> usize {
        self.running
    }

    /// All scheduled matches ran and finished
    pub fn is_finished(&self) -> bool {
        self.pending.is_empty() && self.running == 0
    }

    /// Records in schedule order. Only meaningful once [`is_finished`](Self::is_finished).
    pub fn into_records(self) -> Vec<MatchRecord> {
        self.records.into_iter().flatten().collect()
    }
}
