/*
 * coordinator.rs
 *
 * Fan out, join. One task per target, nothing shared between them except
 * the read-only config and the cancellation token.
 *
 * No aggregation: each task hands its own result to the reporter when it
 * stops. A failing (or panicking) loop never stops its siblings, and the
 * join only returns once every task is gone.
 *
 * The interrupt listener lives here too. It is the only thing that ever
 * cancels the token.
 */

use std::future::Future;
use std::io;
use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::FuzzConfig;
use crate::dispatch::fuzz_process;
use crate::process::Target;
use crate::report::Reporter;

/// Run one dispatch loop per target concurrently and wait for all of them.
///
/// The token is only observed here, never cancelled; that's up to the
/// caller (the binary wires it to Ctrl-C). An empty target list returns
/// immediately.
pub async fn fuzz_all<T, R>(
    targets: Vec<T>,
    config: Arc<FuzzConfig>,
    cancel: CancellationToken,
    reporter: Arc<R>,
) where
    T: Target + 'static,
    R: Reporter + 'static,
{
    let mut loops = JoinSet::new();

    for target in targets {
        let config = Arc::clone(&config);
        let cancel = cancel.clone();
        let reporter = Arc::clone(&reporter);

        debug!(pid = %target.pid(), "starting loop");
        loops.spawn(async move {
            let outcome = fuzz_process(&cancel, &config, &target, reporter.as_ref()).await;
            reporter.loop_finished(target.pid(), &outcome);
        });
    }

    while let Some(joined) = loops.join_next().await {
        if let Err(e) = joined {
            /* a panicking Target; the loop is over either way */
            error!("dispatch loop died: {e}");
        }
    }
}

/// Cancel `cancel` on the first interrupt from `interrupted` (the binary
/// passes `tokio::signal::ctrl_c`).
///
/// Keeps listening afterwards: once our handler is installed the default
/// SIGINT action is gone, so later interrupts are logged rather than lost.
/// Returns when the source fails; abort the task to stop it earlier.
pub async fn cancel_on_interrupts<F, Fut>(cancel: CancellationToken, mut interrupted: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    let mut seen: u64 = 0;
    loop {
        if let Err(e) = interrupted().await {
            warn!("can't listen for Ctrl-C: {e}");
            return;
        }
        seen += 1;
        if seen == 1 {
            info!("interrupted, stopping");
            cancel.cancel();
        } else {
            warn!(interrupts = seen, "interrupted again, already stopping");
        }
    }
}
