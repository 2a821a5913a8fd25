/*
 * config.rs
 *
 * Three layers, first one that says something wins:
 *   1. command line
 *   2. SIGFUZZ_* environment variables (clap handles these)
 *   3. config file (--config, or ~/.sigfuzz.yaml if it exists)
 * then built-in defaults.
 *
 * Everything gets resolved here, once, before the first tick. The dispatch
 * loops only ever see the finished FuzzConfig.
 */

use std::fs;
use std::num::NonZeroU64;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::args::Args;
use crate::duration::parse_duration;
use crate::error::{ConfigError, Result};
use crate::process::{Process, find_processes};
use crate::signal::{Signal, parse_signals};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_ROUNDS: u64 = 1;
pub const DEFAULT_CONFIG_NAME: &str = ".sigfuzz.yaml";

/// How many ticks each loop runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounds {
    Limited(NonZeroU64),
    /// Until cancelled (or aborted by --exit).
    Unlimited,
}

impl Rounds {
    #[must_use]
    pub const fn limit(self) -> Option<u64> {
        match self {
            Self::Limited(n) => Some(n.get()),
            Self::Unlimited => None,
        }
    }
}

/* 0 = forever. same convention as a zero timeout meaning "no timeout" */
impl From<u64> for Rounds {
    fn from(n: u64) -> Self {
        NonZeroU64::new(n).map_or(Self::Unlimited, Self::Limited)
    }
}

/// What every dispatch loop runs with. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzConfig {
    interval: Duration,
    signals: Vec<Signal>,
    rounds: Rounds,
    exit_on_failure: bool,
}

impl FuzzConfig {
    /// Validates: interval > 0, at least one signal.
    pub fn new(
        interval: Duration,
        signals: Vec<Signal>,
        rounds: Rounds,
        exit_on_failure: bool,
    ) -> Result<Self> {
        if interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        if signals.is_empty() {
            return Err(ConfigError::NoSignals);
        }
        Ok(Self {
            interval,
            signals,
            rounds,
            exit_on_failure,
        })
    }

    #[inline]
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// In delivery order, duplicates included.
    #[inline]
    #[must_use]
    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    #[inline]
    #[must_use]
    pub fn rounds(&self) -> Rounds {
        self.rounds
    }

    #[inline]
    #[must_use]
    pub fn exit_on_failure(&self) -> bool {
        self.exit_on_failure
    }
}

/* list entries: `USR1` or `10`. no floats, "1234.0" is not a pid */
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Token {
    Int(i64),
    Text(String),
}

impl Token {
    fn into_string(self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

/* interval: `250ms`, or a bare number of seconds, fractions allowed */
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum IntervalToken {
    Int(u64),
    Float(f64),
    Text(String),
}

impl IntervalToken {
    fn into_string(self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Float(x) => x.to_string(),
            Self::Text(s) => s,
        }
    }
}

/// Contents of the YAML config file. Keys match the long flag names.
///
/// ```yaml
/// interval: 250ms
/// signal: [USR1, HUP]
/// pid: [1234]
/// number: 10
/// exit: true
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    interval: Option<IntervalToken>,
    #[serde(default, alias = "signals")]
    signal: Vec<Token>,
    #[serde(default, alias = "pids")]
    pid: Vec<Token>,
    #[serde(default)]
    number: Option<u64>,
    #[serde(default)]
    exit: Option<bool>,
}

impl FileConfig {
    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        /* an empty file is an empty config, not an error */
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|source| ConfigError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }
}

/* ~/.sigfuzz.yaml */
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DEFAULT_CONFIG_NAME))
}

/// All options merged, still as the user spelled them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub interval: Option<String>,
    pub signals: Vec<String>,
    pub pids: Vec<String>,
    pub number: Option<u64>,
    pub exit: bool,
    /// Config file that contributed, if any.
    pub source: Option<PathBuf>,
}

impl Settings {
    /// Merge CLI/env with the config file.
    ///
    /// An explicit `--config` must be readable. The default file is
    /// optional: missing is fine, but if it exists it has to parse.
    pub fn resolve(args: &Args) -> Result<Self> {
        let (file, source) = match &args.config {
            Some(path) => (FileConfig::load(path)?, Some(path.clone())),
            None => match default_config_path().filter(|p| p.is_file()) {
                Some(path) => (FileConfig::load(&path)?, Some(path)),
                None => (FileConfig::default(), None),
            },
        };

        if let Some(path) = &source {
            info!("reading in config: {}", path.display());
        }

        Ok(Self::merge(args, file, source))
    }

    #[must_use]
    pub fn merge(args: &Args, file: FileConfig, source: Option<PathBuf>) -> Self {
        let pick = |cli: &[String], file: Vec<Token>| -> Vec<String> {
            if cli.is_empty() {
                file.into_iter().map(Token::into_string).collect()
            } else {
                cli.to_vec()
            }
        };

        let settings = Self {
            interval: args
                .interval
                .clone()
                .or_else(|| file.interval.map(IntervalToken::into_string)),
            signals: pick(&args.signals, file.signal),
            pids: pick(&args.pids, file.pid),
            number: args.number.or(file.number),
            exit: args.exit.or(file.exit).unwrap_or(false),
            source,
        };
        debug!(?settings, "resolved settings");
        settings
    }

    /// Validate and build the immutable loop configuration.
    pub fn fuzz_config(&self) -> Result<FuzzConfig> {
        let interval = match &self.interval {
            Some(s) => parse_duration(s)?,
            None => DEFAULT_INTERVAL,
        };
        let signals = parse_signals(&self.signals)?;
        let rounds = Rounds::from(self.number.unwrap_or(DEFAULT_ROUNDS));
        FuzzConfig::new(interval, signals, rounds, self.exit)
    }

    /// Resolve every target. All or nothing.
    pub fn targets(&self) -> Result<Vec<Process>> {
        find_processes(&self.pids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(argv: &[&str]) -> Args {
        let mut full = vec!["sigfuzz"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).unwrap()
    }

    fn file(text: &str) -> FileConfig {
        FileConfig::parse(Path::new("test.yaml"), text).unwrap()
    }

    #[test]
    fn test_rounds_from_zero_is_unlimited() {
        assert_eq!(Rounds::from(0), Rounds::Unlimited);
        assert_eq!(Rounds::from(3).limit(), Some(3));
        assert_eq!(Rounds::Unlimited.limit(), None);
    }

    #[test]
    fn test_fuzz_config_rejects_zero_interval() {
        let err = FuzzConfig::new(Duration::ZERO, vec![Signal::SIGUSR1], Rounds::from(1), false);
        assert!(matches!(err, Err(ConfigError::ZeroInterval)));
    }

    #[test]
    fn test_fuzz_config_rejects_no_signals() {
        let err = FuzzConfig::new(Duration::from_secs(1), vec![], Rounds::from(1), false);
        assert!(matches!(err, Err(ConfigError::NoSignals)));
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::merge(&args(&["-s", "USR1"]), FileConfig::default(), None);
        let config = settings.fuzz_config().unwrap();
        assert_eq!(config.interval(), DEFAULT_INTERVAL);
        assert_eq!(config.rounds(), Rounds::from(DEFAULT_ROUNDS));
        assert!(!config.exit_on_failure());
        assert_eq!(config.signals(), &[Signal::SIGUSR1]);
        assert!(settings.targets().unwrap().is_empty());
    }

    #[test]
    fn test_file_fills_gaps() {
        let f = file("interval: 250ms\nsignal: [USR1, 12]\npid: [42, \"43\"]\nnumber: 0\nexit: true\n");
        let settings = Settings::merge(&args(&[]), f, None);
        assert_eq!(settings.interval.as_deref(), Some("250ms"));
        assert_eq!(settings.signals, vec!["USR1", "12"]);
        assert_eq!(settings.pids, vec!["42", "43"]);

        let config = settings.fuzz_config().unwrap();
        assert_eq!(config.interval(), Duration::from_millis(250));
        assert_eq!(config.signals(), &[Signal::SIGUSR1, Signal::from_raw(12)]);
        assert_eq!(config.rounds(), Rounds::Unlimited);
        assert!(config.exit_on_failure());
    }

    #[test]
    fn test_file_numeric_interval_is_seconds() {
        let settings = Settings::merge(&args(&["-s", "HUP"]), file("interval: 1.5\n"), None);
        assert_eq!(
            settings.fuzz_config().unwrap().interval(),
            Duration::from_millis(1500)
        );
    }

    #[test]
    fn test_cli_beats_file() {
        let f = file("interval: 5s\nsignals: [HUP]\npids: [1]\nnumber: 7\n");
        let settings = Settings::merge(
            &args(&["-i", "10ms", "-s", "TERM", "-p", "99", "-n", "2"]),
            f,
            None,
        );
        assert_eq!(settings.interval.as_deref(), Some("10ms"));
        assert_eq!(settings.signals, vec!["TERM"]);
        assert_eq!(settings.pids, vec!["99"]);
        assert_eq!(settings.number, Some(2));
    }

    #[test]
    fn test_exit_follows_precedence() {
        let settings = Settings::merge(&args(&["-x"]), file("exit: false\n"), None);
        assert!(settings.exit);
        let settings = Settings::merge(&args(&[]), file("exit: true\n"), None);
        assert!(settings.exit);
        /* an explicit false on the command line beats the file */
        let settings = Settings::merge(&args(&["--exit=false"]), file("exit: true\n"), None);
        assert!(!settings.exit);
        let settings = Settings::merge(&args(&[]), FileConfig::default(), None);
        assert!(!settings.exit);
    }

    #[test]
    fn test_file_rejects_float_pids() {
        let err = FileConfig::parse(Path::new("bad.yaml"), "pid: [1.0]\n").unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParse { .. }));
        let err = FileConfig::parse(Path::new("bad.yaml"), "pids: [1234, 1e3]\n").unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParse { .. }));
    }

    #[test]
    fn test_file_rejects_float_signals() {
        let err = FileConfig::parse(Path::new("bad.yaml"), "signal: [9.0]\n").unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParse { .. }));
    }

    #[test]
    fn test_file_unknown_key_rejected() {
        let err = FileConfig::parse(Path::new("bad.yaml"), "intervall: 1s\n").unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParse { .. }));
    }

    #[test]
    fn test_file_empty_is_default() {
        let f = file("  \n");
        assert!(f.signal.is_empty());
        assert!(f.interval.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let err = FileConfig::load(Path::new("/nonexistent/sigfuzz/config.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigRead { .. }));
    }

    #[test]
    fn test_bad_values_surface_as_config_errors() {
        let settings = Settings::merge(&args(&["-s", "NOPE"]), FileConfig::default(), None);
        assert!(matches!(
            settings.fuzz_config(),
            Err(ConfigError::UnknownSignal(_))
        ));

        let settings = Settings::merge(&args(&["-s", "HUP", "-i", "0s"]), FileConfig::default(), None);
        assert!(matches!(settings.fuzz_config(), Err(ConfigError::ZeroInterval)));

        let settings = Settings::merge(&args(&["-p", "abc"]), FileConfig::default(), None);
        assert!(matches!(settings.targets(), Err(ConfigError::InvalidPid(_))));
    }
}
