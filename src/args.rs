/*
 * args.rs
 *
 * Clap derive macros handle parsing. Life's too short to do this by hand.
 *
 * Everything that can also come from the config file is an Option (or an
 * empty Vec) here so config.rs can tell "not given" from "given".
 * Env fallbacks use the SIGFUZZ_ prefix.
 *
 * Pids and signals stay strings: turning them into real values is a
 * configuration step with its own errors and exit code, not a usage error.
 */

use std::io;
use std::path::PathBuf;

use clap::ArgAction;
use clap::CommandFactory;
use clap::Parser;
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(
    name = "sigfuzz",
    version,
    about = "Repeatedly send signals to running processes",
    long_about = "Send every SIGNAL to every PID once per INTERVAL, for NUMBER rounds.\n\n\
                  Use it to shake out signal-handling bugs: races in handlers, \
                  EINTR mistakes, half-finished shutdowns.\n\n\
                  Examples:\n\
                    sigfuzz -s USR1 -p 1234                 # one USR1 after 1s\n\
                    sigfuzz -s HUP,USR2 -p 1234 -n 100 -i 10ms\n\
                    sigfuzz -s CONT -p 1234 -p 5678 -n 0    # until Ctrl-C\n\n\
                  INTERVAL is a duration like 500ms, 2s, 1m30s (a bare number means seconds).\n\
                  SIGNAL is a name (TERM, sigterm, SIGTERM) or a raw number.\n\
                  A NUMBER of 0 means no limit.",
    after_help = "Options may also be set in $HOME/.sigfuzz.yaml (or --config FILE) \
                  using the long option names as keys.\n\n\
                  Exit status:\n\
                  0  all loops finished (failed deliveries are logged, not fatal)\n\
                  1  bad configuration (unknown signal, bad pid, unreadable config); nothing was sent\n\
                  2  bad command line usage"
)]
pub struct Args {
    /// Config file (default: $HOME/.sigfuzz.yaml if it exists).
    #[arg(short = 'c', long = "config", value_name = "FILE", env = "SIGFUZZ_CONFIG")]
    pub config: Option<PathBuf>,

    /// Time between rounds [default: 1s].
    #[arg(
        short = 'i',
        long = "interval",
        value_name = "DURATION",
        env = "SIGFUZZ_INTERVAL"
    )]
    pub interval: Option<String>,

    /// Signal to send each round. Repeat or comma-separate for several;
    /// they are sent in the order given.
    #[arg(
        short = 's',
        long = "signal",
        value_name = "SIGNAL",
        value_delimiter = ',',
        env = "SIGFUZZ_SIGNAL"
    )]
    pub signals: Vec<String>,

    /// Process to signal. Repeat or comma-separate for several; each gets
    /// its own independent loop.
    #[arg(
        short = 'p',
        long = "pid",
        value_name = "PID",
        value_delimiter = ',',
        allow_hyphen_values = true,
        env = "SIGFUZZ_PID"
    )]
    pub pids: Vec<String>,

    /// Number of rounds, 0 for no limit [default: 1].
    #[arg(short = 'n', long = "number", value_name = "NUMBER", env = "SIGFUZZ_NUMBER")]
    pub number: Option<u64>,

    /// Stop signalling a process at its first failed delivery.
    ///
    /// `--exit=false` (or SIGFUZZ_EXIT=false) turns off `exit: true` from
    /// the config file.
    #[arg(
        short = 'x',
        long = "exit",
        value_name = "BOOL",
        env = "SIGFUZZ_EXIT",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub exit: Option<bool>,

    /// Log every round, not just failures.
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print the signal names this platform knows and exit.
    #[arg(long = "list-signals")]
    pub list_signals: bool,

    /// Generate shell completions and exit.
    ///
    /// Supported: bash, zsh, fish, powershell, elvish.
    #[arg(long = "completions", value_name = "SHELL")]
    pub completions: Option<Shell>,
}

impl Args {
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// generate shell completions to stdout
    pub fn print_completions(shell: Shell) {
        let mut cmd = Self::command();
        clap_complete::generate(shell, &mut cmd, "sigfuzz", &mut io::stdout());
    }
}
