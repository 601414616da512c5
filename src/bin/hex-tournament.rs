//! Hex tournament orchestrator: runs every match of a schedule through the judge and writes
//! one CSV row per match.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use hex_arena::logger::init_logger;
use hex_arena::tournament::{read_schedule, write_report, Tournament, TournamentSettingsBuilder};
use tracing::info;

const HELP: &str = "\
hex-tournament - run a schedule of Hex matches

USAGE:
  hex-tournament [OPTIONS] <schedule> <output.csv>

ARGS:
  <schedule>                One match per line: '<agent-1>,<agent-2>'
  <output.csv>              Results, one row per match

OPTIONS:
  -h, --help                Prints help information
  --concurrent-matches <n>  Matches running at the same time, 1 to 8 (default: 1)
  -d, --dimension <n>       Board side length (default: 11)
  -s, --seconds <n>         Per-agent game clock in seconds (default: 300)
  -t, --threads <n>         Per-agent thread hard limit (default: 4)
  -m, --memory <mib>        Per-agent memory hard limit in MiB (default: 1024)
  -v, --verbose             Ask the judge for verbose output
  -q, --quiet               No progress on stdout
  --judge <path>            Judge executable (default: ./hex-server)
  --uids <list>             Agent user ids, e.g. '2001-2008,2010'
                            (default: 'hex-agent-N' accounts of /etc/passwd)
  --log                     Write a trace log file in the current directory

ENVIRONMENT:
  HEX_DIMENSION, HEX_SECONDS, HEX_THREADS, HEX_MEMORY_MIB, HEX_CONCURRENT_MATCHES,
  HEX_JUDGE, HEX_AGENT_UIDS
";

struct AppArgs {
    schedule: PathBuf,
    output: PathBuf,
    concurrent_matches: Option<usize>,
    dimension: Option<u32>,
    seconds: Option<u32>,
    threads: Option<u32>,
    memory: Option<u32>,
    verbose: bool,
    quiet: bool,
    judge: Option<PathBuf>,
    uids: Option<String>,
    log: bool,
}

fn parse_args() -> Result<AppArgs, pico_args::Error> {
    let mut pargs = pico_args::Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let mut args = AppArgs {
        schedule: PathBuf::new(),
        output: PathBuf::new(),
        concurrent_matches: pargs.opt_value_from_str("--concurrent-matches")?,
        dimension: pargs.opt_value_from_str(["-d", "--dimension"])?,
        seconds: pargs.opt_value_from_str(["-s", "--seconds"])?,
        threads: pargs.opt_value_from_str(["-t", "--threads"])?,
        memory: pargs.opt_value_from_str(["-m", "--memory"])?,
        verbose: pargs.contains(["-v", "--verbose"]),
        quiet: pargs.contains(["-q", "--quiet"]),
        judge: pargs.opt_value_from_os_str("--judge", |s| {
            Ok::<_, std::convert::Infallible>(PathBuf::from(s))
        })?,
        uids: pargs.opt_value_from_str("--uids")?,
        log: pargs.contains("--log"),
    };
    args.schedule = pargs.free_from_os_str(|s| Ok::<_, std::convert::Infallible>(PathBuf::from(s)))?;
    args.output = pargs.free_from_os_str(|s| Ok::<_, std::convert::Infallible>(PathBuf::from(s)))?;

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        eprintln!("Warning: unused arguments left: {remaining:?}.");
    }
    Ok(args)
}

fn main() -> anyhow::Result<()> {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}.\n\n{HELP}");
            std::process::exit(2);
        }
    };

    if args.log {
        let file = init_logger("hex-tournament")?;
        eprintln!("logging to {}", file.display());
    }

    let mut builder = TournamentSettingsBuilder::from_env();
    if let Some(n) = args.concurrent_matches {
        builder = builder.with_concurrent_matches(n);
    }
    if let Some(d) = args.dimension {
        builder = builder.with_dimension(d);
    }
    if let Some(s) = args.seconds {
        builder = builder.with_seconds(s);
    }
    if let Some(t) = args.threads {
        builder = builder.with_threads(t);
    }
    if let Some(m) = args.memory {
        builder = builder.with_memory_mib(m);
    }
    if let Some(judge) = args.judge {
        builder = builder.with_judge(judge);
    }
    if let Some(uids) = &args.uids {
        builder = builder.with_uid_list(uids);
    }
    let settings = builder.with_verbose(args.verbose).build()?;

    let schedule = read_schedule(&args.schedule)?;
    // fail on an unwritable output before spending hours on matches
    let output = File::create(&args.output)
        .with_context(|| format!("could not create {}", args.output.display()))?;

    let records = Tournament::new(settings, !args.quiet).run(schedule)?;
    let failed = records.iter().filter(|r| r.result.is_err()).count();
    info!(matches = records.len(), failed, "writing report");

    write_report(&mut BufWriter::new(output), &records)
        .with_context(|| format!("could not write {}", args.output.display()))?;
    if failed > 0 {
        eprintln!("{failed} of {} matches failed, see {}", records.len(), args.output.display());
    }
    Ok(())
}
