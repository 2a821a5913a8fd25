/*
 * main.rs
 *
 * Parse args, resolve config, start the loops, wait. Boring on purpose.
 * The interesting stuff is in dispatch.rs and coordinator.rs.
 *
 * Everything that can be wrong with the configuration is found before the
 * first signal goes out. After that the exit code is 0 no matter how many
 * deliveries failed; the log says what happened.
 */

use std::process::ExitCode;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use sigfuzz::args::Args;
use sigfuzz::config::Settings;
use sigfuzz::coordinator::{cancel_on_interrupts, fuzz_all};
use sigfuzz::error::exit_codes;
use sigfuzz::logging::{self, Verbosity};
use sigfuzz::report::TracingReporter;
use sigfuzz::signal;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse_args();

    if let Some(shell) = args.completions {
        Args::print_completions(shell);
        return ExitCode::from(exit_codes::SUCCESS);
    }

    if args.list_signals {
        for (name, sig) in signal::all() {
            println!("{:>2} {}", sig.as_raw(), name);
        }
        return ExitCode::from(exit_codes::SUCCESS);
    }

    logging::init(Verbosity::from_flags(args.verbose, args.quiet));

    ExitCode::from(run(&args).await)
}

async fn run(args: &Args) -> u8 {
    let resolved = Settings::resolve(args).and_then(|settings| {
        let config = settings.fuzz_config()?;
        let targets = settings.targets()?;
        Ok((config, targets))
    });

    let (config, targets) = match resolved {
        Ok(resolved) => resolved,
        Err(e) => {
            error!("{e}");
            return e.exit_code();
        }
    };

    if targets.is_empty() {
        warn!("no pids given (use --pid), nothing to do");
        return exit_codes::SUCCESS;
    }

    info!(
        targets = targets.len(),
        signals = config.signals().len(),
        interval = ?config.interval(),
        rounds = ?config.rounds(),
        exit_on_failure = config.exit_on_failure(),
        "fuzzing"
    );

    let cancel = CancellationToken::new();
    let interrupt = tokio::spawn(cancel_on_interrupts(cancel.clone(), tokio::signal::ctrl_c));

    fuzz_all(targets, Arc::new(config), cancel, Arc::new(TracingReporter)).await;

    interrupt.abort();
    exit_codes::SUCCESS
}
