//! Launching the judge for one match and reading back its summary.
//!
//! The judge prints two comma-separated lines on stdout when the match is over: a header and
//! the values, each ending with a trailing comma.
//!
//! ```text
//! agent_1,agent_1_won,agent_1_rounds,agent_1_secs,agent_1_err,agent_1_logfile,agent_2,...,
//! ./random,1,31,0.012000,none,/tmp/hex-agent.ab12cd,./mcts,0,30,12.500000,none,/tmp/hex-agent.ef34gh,
//! ```

use std::{
    collections::HashMap,
    path::Path,
    process::{Command, Stdio},
};

use anyhow::{anyhow, bail, Context};
use tracing::{instrument, warn};

use super::schedule::AgentPair;
use super::settings::MatchLimits;

/// Per-side summary reported by the judge.
#[derive(Debug, Clone, PartialEq)]
pub struct SideReport {
    /// Agent command.
    pub agent: String,
    /// Whether this side won.
    pub won: bool,
    /// Moves played by this side.
    pub rounds: u32,
    /// Clock time used by this side.
    pub seconds_used: f64,
    /// Judge-side error for this agent (`none` when everything went fine).
    pub error: String,
    /// Path of the agent's log file.
    pub logfile: String,
}

/// Summary of one judged match, first side is black.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchReport {
    /// `[agent_1, agent_2]`.
    pub sides: [SideReport; 2],
}

impl MatchReport {
    /// Names of the per-side fields, in output order, without their `agent_N` prefix.
    pub const FIELDS: [&'static str; 6] = ["", "_won", "_rounds", "_secs", "_err", "_logfile"];
}

/// Judge command line for `pair` with the leased `uids`.
pub fn judge_args(pair: &AgentPair, uids: (u32, u32), limits: &MatchLimits) -> Vec<String> {
    let mut args = vec![
        "-a".to_string(),
        pair.first.clone(),
        "-ua".to_string(),
        uids.0.to_string(),
        "-b".to_string(),
        pair.second.clone(),
        "-ub".to_string(),
        uids.1.to_string(),
        "-d".to_string(),
        limits.dimension.to_string(),
        "-s".to_string(),
        limits.seconds.to_string(),
        "-t".to_string(),
        limits.threads.to_string(),
        "-m".to_string(),
        limits.memory_mib.to_string(),
    ];
    if limits.verbose {
        args.push("-v".to_string());
    }
    args
}

/// Run the judge to completion and parse its summary.
///
/// Blocks until the judge process exits.
#[instrument(skip(judge, limits))]
pub fn run_judge(
    judge: &Path,
    pair: &AgentPair,
    uids: (u32, u32),
    limits: &MatchLimits,
) -> anyhow::Result<MatchReport> {
    let output = Command::new(judge)
        .args(judge_args(pair, uids, limits))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .output()
        .with_context(|| format!("could not launch judge '{}'", judge.display()))?;

    if !output.status.success() {
        warn!("judge exited with {}", output.status);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_judge_output(&stdout)
        .with_context(|| format!("judge exited with {}", output.status))
}

/// Parse the header and value lines printed by the judge.
pub fn parse_judge_output(output: &str) -> anyhow::Result<MatchReport> {
    let mut rows = output.lines().filter(|l| !l.trim().is_empty()).map(|row| {
        row.split(',')
            .filter(|token| !token.is_empty())
            .map(str::trim)
            .collect::<Vec<_>>()
    });
    let (Some(header), Some(values)) = (rows.next(), rows.next()) else {
        bail!("judge printed no summary");
    };
    if header.len() != values.len() {
        bail!(
            "judge summary has {} fields but {} values",
            header.len(),
            values.len()
        );
    }
    let fields: HashMap<&str, &str> = header.into_iter().zip(values).collect();

    Ok(MatchReport {
        sides: [side_report(&fields, 1)?, side_report(&fields, 2)?],
    })
}

fn field<'a>(fields: &HashMap<&'a str, &'a str>, key: &str) -> anyhow::Result<&'a str> {
    fields
        .get(key)
        .copied()
        .ok_or_else(|| anyhow!("judge summary lacks '{key}'"))
}

fn side_report(fields: &HashMap<&str, &str>, n: u32) -> anyhow::Result<SideReport> {
    let get = |suffix: &str| field(fields, &format!("agent_{n}{suffix}"));
    let rounds = get("_rounds")?;
    let secs = get("_secs")?;
    Ok(SideReport {
        agent: get("")?.to_string(),
        won: matches!(get("_won")?, "1" | "true"),
        rounds: rounds
            .parse()
            .with_context(|| format!("invalid round count '{rounds}'"))?,
        seconds_used: secs
            .parse()
            .with_context(|| format!("invalid seconds '{secs}'"))?,
        error: get("_err")?.to_string(),
        logfile: get("_logfile")?.to_string(),
    })
}
