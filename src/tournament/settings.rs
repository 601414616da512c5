//! Per-agent match limits and tournament-wide settings.
//!
//! The main entry point is the [`TournamentSettingsBuilder`], which uses a builder pattern
//! to configure:
//!
//! - **Match limits** handed to the judge: board dimension, game clock, thread and memory
//!   hard limits per agent
//! - **Concurrency**: how many matches may run at the same time (1 to 8)
//! - **Identities**: the OS user ids leased to agents, two per running match
//! - **Judge**: the path of the judge executable
//!
//! The judge enforces the limits, the orchestrator only checks that they are sane for the host.
//!
//! # Example
//!
//! ```no_run
//! use hex_arena::tournament::TournamentSettingsBuilder;
//!
//! let settings = TournamentSettingsBuilder::new()
//!     .with_dimension(9)
//!     .with_seconds(60)
//!     .with_concurrent_matches(2)
//!     .with_uid_list("2001-2004")
//!     .build()
//!     .unwrap();
//! ```

use std::{
    collections::HashSet,
    env,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use tracing::{info, warn};

/// Passwd prefix of the accounts reserved for agents.
const AGENT_USER_PREFIX: &str = "hex-agent-";

/// Longest range accepted in a uid list.
const MAX_UID_RANGE: u32 = 65_536;

/// Limits forwarded to the judge for every match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchLimits {
    /// Board side length.
    pub dimension: u32,
    /// Per-agent game clock, in seconds.
    pub seconds: u32,
    /// Per-agent thread hard limit.
    pub threads: u32,
    /// Per-agent memory hard limit, in MiB.
    pub memory_mib: u32,
    /// Ask the judge for verbose logging.
    pub verbose: bool,
}

impl Default for MatchLimits {
    fn default() -> Self {
        Self {
            dimension: 11,
            seconds: 300,
            threads: 4,
            memory_mib: 1024,
            verbose: false,
        }
    }
}

/// Obtained using [`TournamentSettingsBuilder`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TournamentSettings {
    pub(crate) limits: MatchLimits,
    pub(crate) concurrent_matches: usize,
    pub(crate) judge: PathBuf,
    pub(crate) identities: Vec<u32>,
}

impl TournamentSettings {
    /// create a TournamentSettingsBuilder
    pub fn builder() -> TournamentSettingsBuilder {
        TournamentSettingsBuilder::new()
    }

    /// Limits handed to the judge.
    pub fn limits(&self) -> &MatchLimits {
        &self.limits
    }

    /// Matches allowed to run at the same time, already capped by the identity count.
    pub fn concurrent_matches(&self) -> usize {
        self.concurrent_matches
    }

    /// Judge executable.
    pub fn judge(&self) -> &Path {
        &self.judge
    }

    /// Identities available for leasing.
    pub fn identities(&self) -> &[u32] {
        &self.identities
    }
}

/// A builder for [`TournamentSettings`].
///
/// Unset values default to an 11×11 board, 300 seconds, 4 threads, 1024 MiB, one match at a
/// time, `./hex-server` as judge, and every `hex-agent-<n>` account of `/etc/passwd`.
#[derive(Debug, Default)]
pub struct TournamentSettingsBuilder {
    dimension: Option<u32>,
    seconds: Option<u32>,
    threads: Option<u32>,
    memory_mib: Option<u32>,
    verbose: bool,
    concurrent_matches: Option<usize>,
    judge: Option<PathBuf>,
    uids: Option<String>,
}

impl TournamentSettingsBuilder {
    /// Largest accepted value for [`with_concurrent_matches`](Self::with_concurrent_matches).
    pub const MAX_CONCURRENT_MATCHES: usize = 8;

    /// Creates a new builder where everything takes its default value.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new builder configured from environment variables.
    ///
    /// Read environment variables are:
    /// - `HEX_DIMENSION` (u32): board side length
    /// - `HEX_SECONDS` (u32): per-agent game clock in seconds
    /// - `HEX_THREADS` (u32): per-agent thread limit
    /// - `HEX_MEMORY_MIB` (u32): per-agent memory limit in MiB
    /// - `HEX_CONCURRENT_MATCHES` (usize): matches running at the same time
    /// - `HEX_JUDGE` (path): judge executable
    /// - `HEX_AGENT_UIDS` (string): comma-separated uids or ranges, e.g. "2001-2004,2010"
    #[must_use]
    pub fn from_env() -> Self {
        fn parse_u32(var: &str) -> Option<u32> {
            env::var(var).ok()?.trim().parse().ok()
        }

        Self {
            dimension: parse_u32("HEX_DIMENSION"),
            seconds: parse_u32("HEX_SECONDS"),
            threads: parse_u32("HEX_THREADS"),
            memory_mib: parse_u32("HEX_MEMORY_MIB"),
            verbose: false,
            concurrent_matches: env::var("HEX_CONCURRENT_MATCHES")
                .ok()
                .and_then(|v| v.trim().parse().ok()),
            judge: env::var_os("HEX_JUDGE").map(PathBuf::from),
            uids: env::var("HEX_AGENT_UIDS").ok(),
        }
    }

    /// Sets the board side length.
    #[must_use]
    pub fn with_dimension(self, dimension: u32) -> Self {
        Self {
            dimension: Some(dimension),
            ..self
        }
    }

    /// Sets the per-agent game clock, in seconds.
    #[must_use]
    pub fn with_seconds(self, seconds: u32) -> Self {
        Self {
            seconds: Some(seconds),
            ..self
        }
    }

    /// Sets the per-agent thread hard limit.
    #[must_use]
    pub fn with_threads(self, threads: u32) -> Self {
        Self {
            threads: Some(threads),
            ..self
        }
    }

    /// Sets the per-agent memory hard limit, in MiB.
    #[must_use]
    pub fn with_memory_mib(self, memory_mib: u32) -> Self {
        Self {
            memory_mib: Some(memory_mib),
            ..self
        }
    }

    /// Ask the judge for verbose logs.
    #[must_use]
    pub fn with_verbose(self, verbose: bool) -> Self {
        Self { verbose, ..self }
    }

    /// Sets how many matches may run at the same time, from 1 to 8.
    #[must_use]
    pub fn with_concurrent_matches(self, count: usize) -> Self {
        Self {
            concurrent_matches: Some(count),
            ..self
        }
    }

    /// Sets the judge executable.
    #[must_use]
    pub fn with_judge(self, path: impl Into<PathBuf>) -> Self {
        Self {
            judge: Some(path.into()),
            ..self
        }
    }

    /// Sets the identities to lease, instead of reading `/etc/passwd`.
    ///
    /// Format follows the pattern: `"2001-2004,2010"` (inclusive ranges and individual ids).
    #[must_use]
    pub fn with_uid_list(self, uids: &str) -> Self {
        Self {
            uids: Some(uids.to_string()),
            ..self
        }
    }

    /// Consumes the builder and returns the constructed [`TournamentSettings`].
    ///
    /// # Errors
    ///
    /// Returns an error when the settings are impossible: a zero board dimension or thread
    /// limit, a concurrency outside `1..=8`, an unparseable uid list, or fewer than two
    /// identities.
    pub fn build(self) -> anyhow::Result<TournamentSettings> {
        let defaults = MatchLimits::default();
        let limits = MatchLimits {
            dimension: self.dimension.unwrap_or(defaults.dimension),
            seconds: self.seconds.unwrap_or(defaults.seconds),
            threads: self.threads.unwrap_or(defaults.threads),
            memory_mib: self.memory_mib.unwrap_or(defaults.memory_mib),
            verbose: self.verbose,
        };
        if limits.dimension == 0 {
            bail!("board dimension must be at least 1");
        }
        if limits.threads == 0 {
            bail!("per-agent thread limit must be at least 1");
        }

        let requested = self.concurrent_matches.unwrap_or(1);
        if !(1..=Self::MAX_CONCURRENT_MATCHES).contains(&requested) {
            bail!(
                "concurrent matches must be between 1 and {}, got {requested}",
                Self::MAX_CONCURRENT_MATCHES
            );
        }

        let identities = match self.uids {
            Some(list) => uid_list_to_vec(&list).context("error parsing uid list")?,
            None => {
                let passwd = std::fs::read_to_string("/etc/passwd")
                    .context("could not read /etc/passwd to find agent accounts")?;
                identities_from_passwd(&passwd)
            }
        };
        if identities.len() < 2 {
            bail!(
                "need at least two agent identities, found {} (create '{AGENT_USER_PREFIX}<n>' accounts or pass a uid list)",
                identities.len()
            );
        }

        let concurrent_matches = requested.min(identities.len() / 2);
        if concurrent_matches < requested {
            warn!(
                "only {} identities available, running {concurrent_matches} matches at a time instead of {requested}",
                identities.len()
            );
        }
        check_host_capacity(&limits, concurrent_matches);

        let judge = match self.judge {
            Some(path) => path,
            None => PathBuf::from("hex-server"),
        };
        let judge = std::path::absolute(&judge)
            .with_context(|| format!("invalid judge path {}", judge.display()))?;

        Ok(TournamentSettings {
            limits,
            concurrent_matches,
            judge,
            identities,
        })
    }
}

/// Warns when running agents at full budget would oversubscribe the host.
fn check_host_capacity(limits: &MatchLimits, concurrent_matches: usize) {
    let agents = 2 * concurrent_matches as u64;

    let threads = agents * u64::from(limits.threads);
    let cpus = num_cpus::get_physical() as u64;
    if threads > cpus {
        warn!("{threads} agent threads may run on {cpus} physical cpus");
    }

    let mut sys = sysinfo::System::new();
    sys.refresh_memory();
    let available_mib = sys.available_memory() / (1024 * 1024);
    let memory = agents * u64::from(limits.memory_mib);
    if memory > available_mib {
        warn!("agents may use up to {memory} MiB but only {available_mib} MiB are available");
    }
    info!(threads, cpus, memory, available_mib, "host capacity checked");
}

fn uid_list_to_vec(s: &str) -> anyhow::Result<Vec<u32>> {
    if s.trim().is_empty() {
        bail!("Empty string");
    }
    let mut uids: Vec<u32> = Vec::new();
    let mut seen: HashSet<u32> = HashSet::new();
    for item in s.split(',').map(str::trim) {
        let parts = item.split('-').collect::<Vec<_>>();
        let range = match parts.as_slice() {
            [value] => {
                let value: u32 = value
                    .parse()
                    .with_context(|| format!("could not parse {value}"))?;
                value..=value
            }
            [start, end] => {
                let start: u32 = start
                    .parse()
                    .with_context(|| format!("could not parse {start}"))?;
                let end: u32 = end
                    .parse()
                    .with_context(|| format!("could not parse {end}"))?;
                let (start, end) = (start.min(end), start.max(end));
                if end - start >= MAX_UID_RANGE {
                    bail!("range '{item}' spans more than {MAX_UID_RANGE} ids");
                }
                start..=end
            }
            _ => bail!(
                "each comma-separated item must be a number or a range (e.g. '2001-2004'), got '{item}'"
            ),
        };
        for uid in range {
            if uid == 0 {
                bail!("uid 0 (root) cannot be leased to an agent");
            }
            if seen.insert(uid) {
                uids.push(uid);
            }
        }
    }
    Ok(uids)
}

/// Uids of every `hex-agent-<digits>` account in passwd-formatted `contents`, in file order.
pub(crate) fn identities_from_passwd(contents: &str) -> Vec<u32> {
    contents
        .lines()
        .filter_map(|line| {
            let mut fields = line.split(':');
            let name = fields.next()?;
            let suffix = name.strip_prefix(AGENT_USER_PREFIX)?;
            if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let _password = fields.next()?;
            fields.next()?.parse().ok()
        })
        .collect()
}
