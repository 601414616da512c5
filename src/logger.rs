//! File logging for the binaries.

use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use time::{
    format_description::{self, parse},
    OffsetDateTime,
};
use tracing::{subscriber::set_global_default, Level};
use tracing_subscriber::{fmt::writer::BoxMakeWriter, FmtSubscriber};

/// Install a global subscriber writing every event to a fresh timestamped file in the current
/// directory, named `<date>_<time>_<prefix>_log.txt`. Returns the path of that file.
///
/// # Errors
/// Fails if the file cannot be created or a global subscriber is already set.
pub fn init_logger(prefix: &str) -> anyhow::Result<PathBuf> {
    let file_name = get_log_file_name(prefix)?;
    let file = File::create(&file_name)
        .with_context(|| format!("could not create log file {}", file_name.display()))?;
    let writer = BoxMakeWriter::new(file);
    let local_offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    let timer = tracing_subscriber::fmt::time::OffsetTime::new(
        local_offset,
        format_description::parse("[year]-[month]-[day] [hour]:[minute]:[second]")?,
    );

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_ansi(false)
        .with_timer(timer)
        .with_writer(writer)
        .finish();

    set_global_default(subscriber).context(
        "could not set global default tracing subscriber, one is probably already installed",
    )?;
    Ok(file_name)
}

fn get_log_file_name(prefix: &str) -> anyhow::Result<PathBuf> {
    let format = parse("[year]-[month]-[day]_[hour]:[minute]:[second]")?;
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let stamp = now.format(&format)?;
    Ok(PathBuf::from(format!("{stamp}_{prefix}_log.txt")))
}
