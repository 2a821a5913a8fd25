/*
 * lib.rs
 *
 * The binary is a thin shell around this. The library is what the tests
 * drive, and what you'd use to fuzz something that isn't a plain pid.
 */

//! # sigfuzz
//!
//! Repeatedly deliver a set of signals to running processes, at a fixed
//! interval, to shake out signal-handling bugs.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use sigfuzz::{FuzzConfig, Rounds, TracingReporter, fuzz_all, find_processes, parse_signal};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() -> sigfuzz::Result<()> {
//! let config = FuzzConfig::new(
//!     Duration::from_millis(100),
//!     vec![parse_signal("USR1")?, parse_signal("HUP")?],
//!     Rounds::from(10),
//!     false,
//! )?;
//! let targets = find_processes(&["1234"])?;
//!
//! fuzz_all(targets, Arc::new(config), CancellationToken::new(), Arc::new(TracingReporter)).await;
//! # Ok(())
//! # }
//! ```

pub mod args;
pub mod config;
pub mod coordinator;
pub mod dispatch;
pub mod duration;
pub mod error;
pub mod logging;
pub mod process;
pub mod report;
pub mod signal;

pub use args::Args;
pub use config::{FuzzConfig, Rounds, Settings};
pub use coordinator::{cancel_on_interrupts, fuzz_all};
pub use dispatch::{LoopReport, StopReason, fuzz_process};
pub use duration::parse_duration;
pub use error::{ConfigError, DeliveryError, Result, exit_codes};
pub use process::{Pid, Process, Target, find_processes, parse_pid};
pub use report::{Reporter, TracingReporter};
pub use signal::{Signal, parse_signal, parse_signals};
