//! Tournament orchestration: run a schedule of matches through the judge with bounded
//! concurrency and collect one CSV row per match.
//!
//! Agents of a running match are executed under OS identities leased from a fixed pool, two per
//! match. No identity is ever shared by two running matches, and a match that fails (judge
//! missing, crashed, garbled output) still releases its identities and gets a row in the report.
//!
//! # Example
//!
//! ```no_run
//! use hex_arena::tournament::{read_schedule, write_report, Tournament, TournamentSettingsBuilder};
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = TournamentSettingsBuilder::from_env()
//!         .with_concurrent_matches(4)
//!         .build()?;
//!     let records = Tournament::new(settings, true).run(read_schedule("schedule.txt")?)?;
//!     write_report(&mut std::fs::File::create("results.csv")?, &records)?;
//!     Ok(())
//! }
//! ```

mod identity_pool;
mod judge;
mod report;
mod runner;
mod schedule;
mod scheduler;
mod settings;

pub use judge::{judge_args, parse_judge_output, run_judge, MatchReport, SideReport};
pub use report::{header, write_report};
pub use runner::Tournament;
pub use schedule::{parse_schedule, read_schedule, AgentPair};
pub use scheduler::MatchRecord;
pub use settings::{MatchLimits, TournamentSettings, TournamentSettingsBuilder};
