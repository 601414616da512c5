//! Config for the client engine behaviors
//!
//! Configuration can be created programmatically using [`Configuration::new()`] or by reading
//! environment variables using [`Configuration::from_env()`].
//!
//! # Environment Variables
//!
//! All values are optional. Flags are case-insensitive, set them to `"true"` to enable.
//!
//! - `HEX_VERBOSE` — Print a status line per engine transition (default: `true`)
//! - `HEX_LOG` — Enable logging to a file (default: `false`)
//! - `HEX_SEED` — Seed of the random source; unset means OS entropy (default: unset)
//! - `HEX_SWAP_PROBABILITY` — Chance of exercising the pie rule, in `[0, 1]` (default: `0.5`)

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::warn;

/// Configuration for client engine behaviors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Configuration {
    pub(crate) verbose: bool,
    pub(crate) log: bool,
    pub(crate) seed: Option<u64>,
    pub(crate) swap_probability: f64,
}

impl Configuration {
    const DEFAULT_SWAP_PROBABILITY: f64 = 0.5;

    /// Create a new configuration with default parameters.
    ///
    /// By default:
    /// - Status lines are printed to stdout.
    /// - Logging to file is disabled.
    /// - The random source is seeded from the OS.
    /// - The second mover swaps with probability one half.
    pub fn new() -> Self {
        Self {
            verbose: true,
            log: false,
            seed: None,
            swap_probability: Self::DEFAULT_SWAP_PROBABILITY,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Unset or unparseable variables keep their default value.
    pub fn from_env() -> Self {
        fn get_env_flag(var: &str, default: bool) -> bool {
            match std::env::var(var) {
                Ok(val) => val.eq_ignore_ascii_case("true"),
                Err(_) => default,
            }
        }

        fn get_env_parsed<T: std::str::FromStr>(var: &str) -> Option<T> {
            let raw = std::env::var(var).ok()?;
            let parsed = raw.trim().parse().ok();
            if parsed.is_none() {
                warn!("ignoring {var}={raw:?}: not a valid value");
            }
            parsed
        }

        Self::new()
            .with_verbose(get_env_flag("HEX_VERBOSE", true))
            .with_log(get_env_flag("HEX_LOG", false))
            .with_seed(get_env_parsed("HEX_SEED"))
            .with_swap_probability(
                get_env_parsed("HEX_SWAP_PROBABILITY").unwrap_or(Self::DEFAULT_SWAP_PROBABILITY),
            )
    }

    /// Enable or disable status lines.
    pub fn with_verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }

    /// Enable or disable logging to file.
    pub fn with_log(mut self, value: bool) -> Self {
        self.log = value;
        self
    }

    /// Fix the seed of the random source, or use OS entropy with `None`.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Set the probability of exercising the pie rule. Clamped to `[0, 1]`.
    pub fn with_swap_probability(mut self, probability: f64) -> Self {
        self.swap_probability = if probability.is_nan() {
            warn!("swap probability is NaN, keeping {}", self.swap_probability);
            self.swap_probability
        } else {
            probability.clamp(0.0, 1.0)
        };
        self
    }

    /// Whether status lines are printed.
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Whether the file logger should be installed.
    pub fn log(&self) -> bool {
        self.log
    }

    /// The random source described by this configuration.
    pub fn make_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}
