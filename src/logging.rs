use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Set up file-based logging when `COACH_LOG` is set (it takes an
/// `EnvFilter` directive, e.g. `COACH_LOG=debug`).
///
/// The TUI owns the terminal, so log output goes to
/// `<config_dir>/coach/coach.log`; with the variable unset, logging is
/// disabled entirely. The returned guard must stay alive for the
/// duration of the program or buffered lines are lost.
pub fn init() -> Option<WorkerGuard> {
    let filter = std::env::var("COACH_LOG").ok()?;

    let log_dir = dirs::config_dir()?.join("coach");
    std::fs::create_dir_all(&log_dir).ok()?;

    let appender = tracing_appender::rolling::never(log_dir, "coach.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Some(guard)
}
