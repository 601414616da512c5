//! Schedule file parsing.
//!
//! One match per line, the two agents given as the first two comma-separated tokens. Anything
//! after the second token is ignored. Empty lines and lines starting with `#` are skipped.
//!
//! ```text
//! # agent commands, black first
//! ./agents/random,./agents/mcts
//! ./agents/mcts,./agents/random
//! ```

use std::{fmt, path::Path};

use anyhow::{bail, Context};

/// The two agents of one match. `first` plays black.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AgentPair {
    /// Command of the first agent (black).
    pub first: String,
    /// Command of the second agent (white).
    pub second: String,
}

impl fmt::Display for AgentPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} VS {}", self.first, self.second)
    }
}

/// Read and parse a schedule file.
pub fn read_schedule(path: impl AsRef<Path>) -> anyhow::Result<Vec<AgentPair>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("could not read schedule file {}", path.display()))?;
    parse_schedule(&contents).with_context(|| format!("invalid schedule file {}", path.display()))
}

/// Parse schedule text.
///
/// # Errors
/// A non-comment line without a comma, or with an empty agent name.
pub fn parse_schedule(contents: &str) -> anyhow::Result<Vec<AgentPair>> {
    let mut schedule = vec![];
    for (number, raw_line) in contents.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split(',').map(str::trim);
        let (Some(first), Some(second)) = (tokens.next(), tokens.next()) else {
            bail!("line {}: expected '<agent-1>,<agent-2>', got '{line}'", number + 1);
        };
        if first.is_empty() || second.is_empty() {
            bail!("line {}: empty agent name in '{line}'", number + 1);
        }
        schedule.push(AgentPair {
            first: first.to_string(),
            second: second.to_string(),
        });
    }
    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_comments_and_blank_lines() {
        let schedule = parse_schedule(
            "# header\n\n  a,b\n#c,d\nc , d ,extra\n",
        )
        .unwrap();
        assert_eq!(
            schedule,
            vec![
                AgentPair {
                    first: "a".into(),
                    second: "b".into()
                },
                AgentPair {
                    first: "c".into(),
                    second: "d".into()
                },
            ]
        );
    }

    #[test]
    fn line_without_pair_is_rejected() {
        let err = parse_schedule("a,b\nlonely\n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(parse_schedule("a,\n").is_err());
    }
}
