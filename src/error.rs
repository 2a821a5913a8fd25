/*
 * error.rs
 *
 * Two kinds of failure. Configuration errors stop the run before any
 * signal goes out. Delivery errors happen per signal, per tick, and only
 * end the loop that hit them (and only with --exit).
 *
 * Exit codes are part of the CLI contract. Scripts check them.
 */

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::process::Pid;
use crate::signal::Signal;

/// exit codes. don't renumber these.
pub mod exit_codes {
    /// Run finished (delivery failures don't change this)
    pub const SUCCESS: u8 = 0;
    /// Bad signal, bad pid, unreadable config. Nothing was sent.
    pub const CONFIG_ERROR: u8 = 1;
    /// Rejected by the argument parser (clap's own code)
    pub const USAGE_ERROR: u8 = 2;
}

/* everything that can go wrong before the first tick */
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid duration: {0}")]
    InvalidDuration(String),
    #[error("invalid duration: value too large")]
    DurationOverflow,
    #[error("invalid interval: must be greater than zero")]
    ZeroInterval,
    #[error("unknown signal: {0}")]
    UnknownSignal(String),
    #[error("no signals to send (use --signal)")]
    NoSignals,
    #[error("pid is not an integer, got: {0}")]
    InvalidPid(String),
    #[error("cannot target pid {pid}: {reason}")]
    UnresolvablePid { pid: i64, reason: &'static str },
    #[error("failed to read config file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        exit_codes::CONFIG_ERROR
    }
}

/// A signal that could not be delivered to its target.
///
/// Carries the raw OS error: `ESRCH` when the process is gone, `EPERM` when
/// we aren't allowed to signal it, `EINVAL` for a bogus raw signal number.
#[derive(Debug, Error)]
#[error("failed to send {signal} to pid {pid}: {source}")]
pub struct DeliveryError {
    pub pid: Pid,
    pub signal: Signal,
    #[source]
    pub source: io::Error,
}

impl DeliveryError {
    #[must_use]
    pub fn new(pid: Pid, signal: Signal, source: io::Error) -> Self {
        Self {
            pid,
            signal,
            source,
        }
    }

    /* ESRCH: target exited. the common case when fuzzing kills the target */
    #[must_use]
    pub fn is_gone(&self) -> bool {
        self.source.raw_os_error() == Some(libc::ESRCH)
    }
}

pub type Result<T> = core::result::Result<T, ConfigError>;
