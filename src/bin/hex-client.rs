//! Reference Hex agent: plays random moves against whoever the judge pairs it with.

use std::net::TcpStream;

use anyhow::Context;
use hex_arena::logger::init_logger;
use hex_arena::prelude::*;
use tracing::info;

const HELP: &str = "\
hex-client - random Hex agent

USAGE:
  hex-client [OPTIONS] <host> <port>

OPTIONS:
  -h, --help            Prints help information
  -q, --quiet           No status lines on stdout
  --seed <n>            Seed of the random source (default: OS entropy)

ENVIRONMENT:
  HEX_VERBOSE, HEX_LOG, HEX_SEED, HEX_SWAP_PROBABILITY
";

struct AppArgs {
    host: String,
    port: u16,
    quiet: bool,
    seed: Option<u64>,
}

fn parse_args() -> Result<AppArgs, pico_args::Error> {
    let mut pargs = pico_args::Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let quiet = pargs.contains(["-q", "--quiet"]);
    let seed = pargs.opt_value_from_str("--seed")?;
    let args = AppArgs {
        host: pargs.free_from_str()?,
        port: pargs.free_from_str()?,
        quiet,
        seed,
    };

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

    let mut config = Configuration::from_env();
    if args.quiet {
        config = config.with_verbose(false);
    }
    if args.seed.is_some() {
        config = config.with_seed(args.seed);
    }
    if config.log() {
        let file = init_logger("hex-client")?;
        eprintln!("logging to {}", file.display());
    }
    info!(?config);

    let stream = TcpStream::connect((args.host.as_str(), args.port))
        .with_context(|| format!("could not connect to {}:{}", args.host, args.port))?;
    stream.set_nodelay(true)?;

    let mut engine = ClientEngine::from_config(stream, config);
    let winner = engine.run()?;
    info!(%winner, "done");
    Ok(())
}
