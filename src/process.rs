/*
 * process.rs
 *
 * Turn "1234" into something we can kill(2).
 *
 * Resolving a pid doesn't check that the process exists. It may be gone by
 * the first tick anyway, and that's just a delivery failure (ESRCH). What we
 * do refuse up front is pid <= 0: kill(0, sig) hits our own process group
 * and kill(-1, sig) hits everything we're allowed to signal.
 */

use std::fmt;
use std::io;

use crate::error::{ConfigError, Result};
use crate::signal::Signal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pid(libc::pid_t);

impl Pid {
    /* None for 0 and negatives */
    #[must_use]
    pub const fn from_raw(pid: libc::pid_t) -> Option<Self> {
        if pid > 0 { Some(Self(pid)) } else { None }
    }

    #[inline]
    #[must_use]
    pub const fn as_raw(self) -> libc::pid_t {
        self.0
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a pid token. Non-integers and pids that would address more than
/// one process are configuration errors.
///
/// ```
/// use sigfuzz::process::parse_pid;
///
/// assert_eq!(parse_pid("1234").unwrap().as_raw(), 1234);
/// assert!(parse_pid("abc").is_err());
/// assert!(parse_pid("0").is_err());
/// assert!(parse_pid("-1").is_err());
/// ```
pub fn parse_pid(input: &str) -> Result<Pid> {
    let input = input.trim();
    let value: i64 = input
        .parse()
        .map_err(|_| ConfigError::InvalidPid(input.to_string()))?;

    let raw = libc::pid_t::try_from(value).map_err(|_| ConfigError::UnresolvablePid {
        pid: value,
        reason: "out of range",
    })?;

    match raw {
        0 => Err(ConfigError::UnresolvablePid {
            pid: value,
            reason: "pid 0 addresses our own process group",
        }),
        r if r < 0 => Err(ConfigError::UnresolvablePid {
            pid: value,
            reason: "negative pids address process groups",
        }),
        r => Ok(Pid(r)),
    }
}

/// Something the dispatch loop can signal.
///
/// `Process` is the real thing. Tests plug in recorders.
pub trait Target: Send + Sync {
    fn pid(&self) -> Pid;

    /// Deliver one signal. Must not block for long; it runs on the async
    /// runtime between ticks.
    fn send(&self, signal: Signal) -> io::Result<()>;
}

impl<T: Target + ?Sized> Target for Box<T> {
    fn pid(&self) -> Pid {
        (**self).pid()
    }

    fn send(&self, signal: Signal) -> io::Result<()> {
        (**self).send(signal)
    }
}

/// Handle to a live (or formerly live) OS process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Process {
    pid: Pid,
}

impl Process {
    #[must_use]
    pub const fn find(pid: Pid) -> Self {
        Self { pid }
    }
}

impl Target for Process {
    #[inline]
    fn pid(&self) -> Pid {
        self.pid
    }

    fn send(&self, signal: Signal) -> io::Result<()> {
        // SAFETY: kill has no memory-safety preconditions. pid is > 0 by
        // construction, so this only ever addresses a single process.
        let ret = unsafe { libc::kill(self.pid.as_raw(), signal.as_raw()) };
        if ret == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }
}

/// Resolve every pid token before anything runs. A run never starts half
/// resolved: the first bad token aborts.
pub fn find_processes<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Process>> {
    tokens
        .iter()
        .map(|t| parse_pid(t.as_ref()).map(Process::find))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pid() {
        assert_eq!(parse_pid("1").unwrap().as_raw(), 1);
        assert_eq!(parse_pid(" 4321 ").unwrap().as_raw(), 4321);
    }

    #[test]
    fn test_parse_pid_not_integer() {
        assert!(matches!(parse_pid("abc"), Err(ConfigError::InvalidPid(_))));
        assert!(matches!(parse_pid("12a"), Err(ConfigError::InvalidPid(_))));
        assert!(matches!(parse_pid("1.0"), Err(ConfigError::InvalidPid(_))));
        assert!(matches!(parse_pid(""), Err(ConfigError::InvalidPid(_))));
    }

    #[test]
    fn test_parse_pid_unresolvable() {
        assert!(matches!(
            parse_pid("0"),
            Err(ConfigError::UnresolvablePid { pid: 0, .. })
        ));
        assert!(matches!(
            parse_pid("-1"),
            Err(ConfigError::UnresolvablePid { pid: -1, .. })
        ));
        assert!(matches!(
            parse_pid("99999999999"),
            Err(ConfigError::UnresolvablePid { .. })
        ));
    }

    #[test]
    fn test_pid_from_raw() {
        assert!(Pid::from_raw(0).is_none());
        assert!(Pid::from_raw(-5).is_none());
        assert_eq!(Pid::from_raw(7).map(Pid::as_raw), Some(7));
    }

    #[test]
    fn test_find_processes_in_order() {
        let procs = find_processes(&["10", "20", "10"]).unwrap();
        let pids: Vec<i32> = procs.iter().map(|p| p.pid().as_raw()).collect();
        assert_eq!(pids, vec![10, 20, 10]);
    }

    #[test]
    fn test_find_processes_first_error() {
        let err = find_processes(&["10", "x", "0"]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPid(ref s) if s == "x"));
    }

    #[test]
    fn test_find_processes_empty() {
        let tokens: [&str; 0] = [];
        assert!(find_processes(&tokens).unwrap().is_empty());
    }

    #[test]
    fn test_send_to_self_probe() {
        /* signal 0: existence check, nothing delivered */
        let me = Pid::from_raw(std::process::id() as libc::pid_t).unwrap();
        assert!(Process::find(me).send(Signal::from_raw(0)).is_ok());
    }

    #[test]
    fn test_send_invalid_signal_fails() {
        let me = Pid::from_raw(std::process::id() as libc::pid_t).unwrap();
        let err = Process::find(me).send(Signal::from_raw(-1)).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::EINVAL));
    }
}
