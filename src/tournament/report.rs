//! Tournament CSV output: one header row, then one row per match in schedule order.
//!
//! Rows keep the judge's own layout (trailing comma included), prefixed with the 0-based match
//! index. A match the orchestrator could not complete still gets a row: agents from the
//! schedule, no win, zero rounds and seconds, and the failure in both error columns.

use std::io::{self, Write};

use super::judge::{MatchReport, SideReport};
use super::scheduler::MatchRecord;

/// Header row, without line terminator.
pub fn header() -> String {
    let mut cols = vec!["game".to_string()];
    for side in 1..=2 {
        for suffix in MatchReport::FIELDS {
            cols.push(format!("agent_{side}{suffix}"));
        }
    }
    cols.join(",") + ","
}

/// Write the whole report.
pub fn write_report<W: Write>(out: &mut W, records: &[MatchRecord]) -> io::Result<()> {
    writeln!(out, "{}", header())?;
    for (index, record) in records.iter().enumerate() {
        write!(out, "{index},")?;
        match &record.result {
            Ok(report) => {
                for side in &report.sides {
                    write_side(out, side)?;
                }
            }
            Err(msg) => {
                let error = format!("orchestrator: {}", sanitize(msg));
                for agent in [&record.pair.first, &record.pair.second] {
                    write_side(
                        out,
                        &SideReport {
                            agent: agent.clone(),
                            won: false,
                            rounds: 0,
                            seconds_used: 0.0,
                            error: error.clone(),
                            logfile: String::new(),
                        },
                    )?;
                }
            }
        }
        writeln!(out)?;
    }
    out.flush()
}

fn write_side<W: Write>(out: &mut W, side: &SideReport) -> io::Result<()> {
    write!(
        out,
        "{},{},{},{:.6},{},{},",
        side.agent,
        u8::from(side.won),
        side.rounds,
        side.seconds_used,
        sanitize(&side.error),
        side.logfile
    )
}

/// Keep free text inside one CSV cell.
fn sanitize(text: &str) -> String {
    text.replace(',', ";").replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::schedule::AgentPair;

    fn side(agent: &str, won: bool) -> SideReport {
        SideReport {
            agent: agent.into(),
            won,
            rounds: 12,
            seconds_used: 1.25,
            error: "none".into(),
            logfile: format!("/tmp/{agent}.log"),
        }
    }

    #[test]
    fn header_names_every_column() {
        assert_eq!(
            header(),
            "game,agent_1,agent_1_won,agent_1_rounds,agent_1_secs,agent_1_err,agent_1_logfile,\
agent_2,agent_2_won,agent_2_rounds,agent_2_secs,agent_2_err,agent_2_logfile,"
        );
    }

    #[test]
    fn rows_are_indexed_and_failures_kept() {
        let pair = AgentPair {
            first: "a".into(),
            second: "b".into(),
        };
        let records = vec![
            MatchRecord {
                pair: pair.clone(),
                result: Ok(MatchReport {
                    sides: [side("a", true), side("b", false)],
                }),
            },
            MatchRecord {
                pair,
                result: Err("no judge, sorry\nbye".into()),
            },
        ];
        let mut out = vec![];
        write_report(&mut out, &records).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "0,a,1,12,1.250000,none,/tmp/a.log,b,0,12,1.250000,none,/tmp/b.log,"
        );
        assert_eq!(
            lines[2],
            "1,a,0,0,0.000000,orchestrator: no judge; sorry bye,,b,0,0,0.000000,orchestrator: no judge; sorry bye,,"
        );
    }
}
