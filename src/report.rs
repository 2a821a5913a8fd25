/*
 * report.rs
 *
 * The dispatch loop doesn't print anything itself. It hands what happened
 * to a Reporter: each non-fatal delivery failure, each finished round, and
 * its own final result at the moment it stops.
 *
 * TracingReporter is what the binary uses. Tests use recorders.
 */

use tracing::{debug, error, info, warn};

use crate::dispatch::{LoopReport, StopReason};
use crate::error::DeliveryError;
use crate::process::Pid;

pub trait Reporter: Send + Sync {
    /// A delivery failed and the loop keeps going (no --exit).
    fn delivery_failed(&self, error: &DeliveryError);

    /// Every signal of round `round` (1-based) was attempted.
    fn round_completed(&self, _pid: Pid, _round: u64) {}

    /// The loop for `pid` has stopped. Called exactly once per loop.
    fn loop_finished(&self, pid: Pid, outcome: &Result<LoopReport, DeliveryError>);
}

/// Logs through `tracing`. Failures at warn, rounds at debug.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn delivery_failed(&self, err: &DeliveryError) {
        warn!(pid = %err.pid, signal = %err.signal, "{err}");
    }

    fn round_completed(&self, pid: Pid, round: u64) {
        debug!(%pid, round, "round complete");
    }

    fn loop_finished(&self, pid: Pid, outcome: &Result<LoopReport, DeliveryError>) {
        match outcome {
            Ok(report) => {
                let why = match report.reason {
                    StopReason::Exhausted => "all rounds done",
                    StopReason::Cancelled => "cancelled",
                };
                info!(
                    %pid,
                    rounds = report.rounds,
                    delivered = report.delivered,
                    failed = report.failed,
                    "stopped: {why}"
                );
            }
            Err(err) => error!(%pid, "stopped: {err}"),
        }
    }
}
