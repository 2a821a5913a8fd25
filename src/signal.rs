/*
 * signal.rs
 *
 * Parse "TERM", "SIGTERM", "term", "15". Reject "SIGFOO".
 *
 * Unlike kill(1) we don't validate numbers: "42" becomes raw signal 42 and
 * the kernel gets to decide. Fuzzing odd signal numbers is a feature.
 *
 * One static table, case-insensitive lookup, optional SIG prefix. Linux
 * gets a few extra aliases (CLD, POLL, PWR, STKFLT, UNUSED).
 */

use std::fmt;

use crate::error::{ConfigError, Result};

/* raw signal number. named constants below, anything else is still valid */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signal(i32);

impl Signal {
    pub const SIGHUP: Self = Self(libc::SIGHUP);
    pub const SIGINT: Self = Self(libc::SIGINT);
    pub const SIGQUIT: Self = Self(libc::SIGQUIT);
    pub const SIGILL: Self = Self(libc::SIGILL);
    pub const SIGTRAP: Self = Self(libc::SIGTRAP);
    pub const SIGABRT: Self = Self(libc::SIGABRT);
    pub const SIGBUS: Self = Self(libc::SIGBUS);
    pub const SIGFPE: Self = Self(libc::SIGFPE);
    pub const SIGKILL: Self = Self(libc::SIGKILL);
    pub const SIGUSR1: Self = Self(libc::SIGUSR1);
    pub const SIGSEGV: Self = Self(libc::SIGSEGV);
    pub const SIGUSR2: Self = Self(libc::SIGUSR2);
    pub const SIGPIPE: Self = Self(libc::SIGPIPE);
    pub const SIGALRM: Self = Self(libc::SIGALRM);
    pub const SIGTERM: Self = Self(libc::SIGTERM);
    pub const SIGCHLD: Self = Self(libc::SIGCHLD);
    pub const SIGCONT: Self = Self(libc::SIGCONT);
    pub const SIGSTOP: Self = Self(libc::SIGSTOP);
    pub const SIGTSTP: Self = Self(libc::SIGTSTP);
    pub const SIGTTIN: Self = Self(libc::SIGTTIN);
    pub const SIGTTOU: Self = Self(libc::SIGTTOU);
    pub const SIGURG: Self = Self(libc::SIGURG);
    pub const SIGXCPU: Self = Self(libc::SIGXCPU);
    pub const SIGXFSZ: Self = Self(libc::SIGXFSZ);
    pub const SIGVTALRM: Self = Self(libc::SIGVTALRM);
    pub const SIGPROF: Self = Self(libc::SIGPROF);
    pub const SIGWINCH: Self = Self(libc::SIGWINCH);
    pub const SIGIO: Self = Self(libc::SIGIO);
    pub const SIGSYS: Self = Self(libc::SIGSYS);

    /* any number, named or not */
    #[inline]
    #[must_use]
    pub const fn from_raw(num: i32) -> Self {
        Self(num)
    }

    #[inline]
    #[must_use]
    pub const fn as_raw(self) -> i32 {
        self.0
    }

    /// Canonical "SIGxxx" name, `None` for numbers outside the table.
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        CANONICAL
            .iter()
            .chain(PLATFORM_CANONICAL)
            .find(|(_, sig)| *sig == self)
            .map(|(name, _)| *name)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "signal {}", self.0),
        }
    }
}

/* canonical names, kill -l order */
const CANONICAL: &[(&str, Signal)] = &[
    ("SIGHUP", Signal::SIGHUP),
    ("SIGINT", Signal::SIGINT),
    ("SIGQUIT", Signal::SIGQUIT),
    ("SIGILL", Signal::SIGILL),
    ("SIGTRAP", Signal::SIGTRAP),
    ("SIGABRT", Signal::SIGABRT),
    ("SIGBUS", Signal::SIGBUS),
    ("SIGFPE", Signal::SIGFPE),
    ("SIGKILL", Signal::SIGKILL),
    ("SIGUSR1", Signal::SIGUSR1),
    ("SIGSEGV", Signal::SIGSEGV),
    ("SIGUSR2", Signal::SIGUSR2),
    ("SIGPIPE", Signal::SIGPIPE),
    ("SIGALRM", Signal::SIGALRM),
    ("SIGTERM", Signal::SIGTERM),
    ("SIGCHLD", Signal::SIGCHLD),
    ("SIGCONT", Signal::SIGCONT),
    ("SIGSTOP", Signal::SIGSTOP),
    ("SIGTSTP", Signal::SIGTSTP),
    ("SIGTTIN", Signal::SIGTTIN),
    ("SIGTTOU", Signal::SIGTTOU),
    ("SIGURG", Signal::SIGURG),
    ("SIGXCPU", Signal::SIGXCPU),
    ("SIGXFSZ", Signal::SIGXFSZ),
    ("SIGVTALRM", Signal::SIGVTALRM),
    ("SIGPROF", Signal::SIGPROF),
    ("SIGWINCH", Signal::SIGWINCH),
    ("SIGIO", Signal::SIGIO),
    ("SIGSYS", Signal::SIGSYS),
];

/* second names for signals already in CANONICAL */
const ALIASES: &[(&str, Signal)] = &[("SIGIOT", Signal::SIGABRT)];

#[cfg(any(target_os = "linux", target_os = "android"))]
const PLATFORM_CANONICAL: &[(&str, Signal)] = &[
    ("SIGSTKFLT", Signal(libc::SIGSTKFLT)),
    ("SIGPWR", Signal(libc::SIGPWR)),
];

#[cfg(any(target_os = "linux", target_os = "android"))]
const PLATFORM_ALIASES: &[(&str, Signal)] = &[
    ("SIGCLD", Signal::SIGCHLD),
    ("SIGPOLL", Signal(libc::SIGPOLL)),
    ("SIGUNUSED", Signal::SIGSYS),
];

#[cfg(not(any(target_os = "linux", target_os = "android")))]
const PLATFORM_CANONICAL: &[(&str, Signal)] = &[];

#[cfg(not(any(target_os = "linux", target_os = "android")))]
const PLATFORM_ALIASES: &[(&str, Signal)] = &[];

/// Every named signal this platform knows, canonical names only.
pub fn all() -> impl Iterator<Item = (&'static str, Signal)> {
    CANONICAL.iter().chain(PLATFORM_CANONICAL).copied()
}

/* canonical names first so lookups and name() agree */
fn lookup_table() -> impl Iterator<Item = &'static (&'static str, Signal)> {
    CANONICAL
        .iter()
        .chain(PLATFORM_CANONICAL)
        .chain(ALIASES)
        .chain(PLATFORM_ALIASES)
}

/// Parse "TERM", "SIGKILL", "9", "hup" - all the ways to specify a signal.
///
/// # Examples
///
/// ```
/// use sigfuzz::signal::{parse_signal, Signal};
///
/// assert_eq!(parse_signal("TERM").unwrap(), Signal::SIGTERM);
/// assert_eq!(parse_signal("SIGTERM").unwrap(), Signal::SIGTERM);
/// assert_eq!(parse_signal("term").unwrap(), Signal::SIGTERM);
/// assert_eq!(parse_signal("15").unwrap(), Signal::SIGTERM);
/// assert_eq!(parse_signal("63").unwrap().as_raw(), 63);
/// ```
pub fn parse_signal(input: &str) -> Result<Signal> {
    let input = input.trim();

    /* numbers pass straight through */
    if let Ok(num) = input.parse::<i32>() {
        return Ok(Signal::from_raw(num));
    }

    /* strip optional SIG prefix without allocation */
    let name = match input.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("SIG") => &input[3..],
        _ => input,
    };

    lookup_table()
        .find(|(full, _)| full[3..].eq_ignore_ascii_case(name))
        .map(|(_, sig)| *sig)
        .ok_or_else(|| ConfigError::UnknownSignal(input.to_string()))
}

/// Resolve every token, in order. First bad token wins.
pub fn parse_signals<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Signal>> {
    tokens.iter().map(|t| parse_signal(t.as_ref())).collect()
}
