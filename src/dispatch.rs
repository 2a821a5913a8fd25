/*
 * dispatch.rs
 *
 * One loop per target. Wait for the next tick or for cancellation, then
 * send every configured signal in order, then count the round.
 *
 * Between ticks the task is parked on the timer and the token. No polling.
 *
 * Cancellation is checked before each signal too, not only between ticks,
 * so a long signal list doesn't delay shutdown. A kill(2) already issued is
 * never interrupted.
 *
 * The first tick fires one full interval after start, not immediately.
 * Missed ticks (runtime stalled) are skipped rather than burst.
 */

use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::FuzzConfig;
use crate::error::DeliveryError;
use crate::process::Target;
use crate::report::Reporter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Ran the configured number of rounds.
    Exhausted,
    /// The shared token was cancelled.
    Cancelled,
}

/// How a loop ended, when it ended without a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopReport {
    /// Complete rounds (every signal attempted).
    pub rounds: u64,
    pub delivered: u64,
    /// Failures reported and skipped over (always 0 with --exit).
    pub failed: u64,
    pub reason: StopReason,
}

impl LoopReport {
    const fn new() -> Self {
        Self {
            rounds: 0,
            delivered: 0,
            failed: 0,
            reason: StopReason::Exhausted,
        }
    }

    const fn stop(mut self, reason: StopReason) -> Self {
        self.reason = reason;
        self
    }
}

/// Fuzz one target until its rounds run out, the token is cancelled, or
/// (with `exit_on_failure`) a delivery fails.
///
/// Cancellation is not an error. With `exit_on_failure` the first failed
/// delivery is returned as-is and nothing else is sent to this target.
pub async fn fuzz_process<T, R>(
    cancel: &CancellationToken,
    config: &FuzzConfig,
    target: &T,
    reporter: &R,
) -> Result<LoopReport, DeliveryError>
where
    T: Target + ?Sized,
    R: Reporter + ?Sized,
{
    let period = config.interval();
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut remaining = config.rounds().limit();
    let mut report = LoopReport::new();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => return Ok(report.stop(StopReason::Cancelled)),
            _ = ticker.tick() => {}
        }

        for &signal in config.signals() {
            if cancel.is_cancelled() {
                return Ok(report.stop(StopReason::Cancelled));
            }
            match target.send(signal) {
                Ok(()) => report.delivered += 1,
                Err(source) => {
                    let err = DeliveryError::new(target.pid(), signal, source);
                    if config.exit_on_failure() {
                        return Err(err);
                    }
                    report.failed += 1;
                    reporter.delivery_failed(&err);
                }
            }
        }

        report.rounds += 1;
        reporter.round_completed(target.pid(), report.rounds);

        if let Some(left) = remaining.as_mut() {
            *left -= 1;
            if *left == 0 {
                return Ok(report.stop(StopReason::Exhausted));
            }
        }
    }
}
