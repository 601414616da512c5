//! Running a whole schedule.
//!
//! Each admitted match gets its own worker thread, which launches the judge and blocks until it
//! exits. Workers report back over a channel; the coordinating loop in [`Tournament::run`] is
//! the only place where identities are leased and released.

use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    sync::mpsc::{self, Sender},
    thread,
    time::Instant,
};

use anyhow::{anyhow, bail, Context};
use tracing::{error, info, instrument, trace};

use super::identity_pool::IdentityPool;
use super::judge::{run_judge, MatchReport};
use super::schedule::AgentPair;
use super::scheduler::{MatchOutcome, MatchRecord, ScheduledMatch, TournamentScheduler};
use super::settings::TournamentSettings;

/// Runs the matches of a schedule through the judge, a bounded number at a time.
pub struct Tournament {
    settings: TournamentSettings,
    verbose: bool,
}

impl Tournament {
    /// `verbose` prints progress on stdout, independently of the judge's own verbosity.
    #[instrument(skip_all)]
    pub fn new(settings: TournamentSettings, verbose: bool) -> Self {
        trace!(?settings);
        Tournament { settings, verbose }
    }

    /// Settings this tournament runs with.
    pub fn settings(&self) -> &TournamentSettings {
        &self.settings
    }

    /// Run every match of `schedule` and return one record per match, in schedule order.
    ///
    /// A match whose judge cannot be launched, crashes, or prints an unreadable summary is
    /// recorded as failed; the other matches keep running.
    ///
    /// # Errors
    /// Fails before running anything if the judge executable does not exist.
    pub fn run(&self, schedule: Vec<AgentPair>) -> anyhow::Result<Vec<MatchRecord>> {
        let judge = self.settings.judge();
        if !judge.is_file() {
            bail!("judge executable '{}' not found", judge.display());
        }

        let total = schedule.len();
        info!(
            total,
            concurrent_matches = self.settings.concurrent_matches(),
            "starting tournament"
        );
        let started = Instant::now();

        let pool = IdentityPool::new(self.settings.identities().iter().copied());
        let mut scheduler =
            TournamentScheduler::new(schedule, pool, self.settings.concurrent_matches());
        let (tx_result, rx_result) = mpsc::channel();

        for m in scheduler.advance() {
            self.launch_match(m, tx_result.clone());
        }

        while !scheduler.is_finished() {
            // not finished <=> match running <=> result to receive
            let outcome = rx_result
                .recv()
                .context("every match worker hung up before reporting")?;
            if self.verbose {
                print_outcome(&outcome.scheduled, &outcome.result);
            }
            for m in scheduler.on_result(outcome) {
                self.launch_match(m, tx_result.clone());
            }
            trace!(running = scheduler.running(), "match finished");
        }

        let elapsed = started.elapsed();
        info!(?elapsed, "tournament finished");
        if self.verbose {
            println!(
                "\x1b[32mTournament finished:\x1b[39m {total} matches in {:.1}s",
                elapsed.as_secs_f64()
            );
        }
        Ok(scheduler.into_records())
    }

    fn launch_match(&self, scheduled: ScheduledMatch, tx_result: Sender<MatchOutcome>) {
        let (uid_a, uid_b) = scheduled.uids;
        info!(
            index = scheduled.index,
            "Starting game between {} (uid: {uid_a}) and {} (uid: {uid_b})",
            scheduled.pair.first,
            scheduled.pair.second
        );
        if self.verbose {
            println!(
                "Starting game between {} (uid: {uid_a}) and {} (uid: {uid_b}) ...",
                scheduled.pair.first, scheduled.pair.second
            );
        }

        let judge = self.settings.judge().to_path_buf();
        let limits = *self.settings.limits();
        let worker_tx = tx_result.clone();
        let for_worker = scheduled.clone();

        let spawned = thread::Builder::new()
            .name(format!("match-{}", scheduled.index))
            .spawn(move || {
                let result = catch_unwind(AssertUnwindSafe(|| {
                    run_judge(&judge, &for_worker.pair, for_worker.uids, &limits)
                }))
                .unwrap_or_else(|_| Err(anyhow!("match worker panicked")));
                // the coordinator only stops listening once every match reported
                let _ = worker_tx.send(MatchOutcome {
                    scheduled: for_worker,
                    result,
                });
            });

        if let Err(e) = spawned {
            error!("could not spawn worker for match {}: {e}", scheduled.index);
            let _ = tx_result.send(MatchOutcome {
                scheduled,
                result: Err(anyhow!(e).context("could not spawn match worker")),
            });
        }
    }
}

fn print_outcome(scheduled: &ScheduledMatch, result: &anyhow::Result<MatchReport>) {
    match result {
        Ok(report) => {
            let [a, b] = &report.sides;
            // green match, results, red errors
            println!(
                "\x1b[32m{}: \x1b[39m{}-{} \x1b[31m{} {}\x1b[39m",
                scheduled.pair,
                u8::from(a.won),
                u8::from(b.won),
                a.error,
                b.error
            );
        }
        Err(e) => println!("\x1b[32m{}: \x1b[31mfailed: {e:#}\x1b[39m", scheduled.pair),
    }
}
