use std::fs::OpenOptions;
use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. `RUST_LOG` overrides the default level.
///
/// With `log_file` set, output goes through a non-blocking file writer and
/// the returned guard must be held until exit. Without one, logs go to
/// stderr unless the terminal is owned by the picker, in which case nothing
/// is installed.
pub(crate) fn init(log_file: Option<&Path>, owns_terminal: bool) -> Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .map_err(|err| anyhow::anyhow!("failed to install logger: {err}"))?;
            Ok(Some(guard))
        }
        None if owns_terminal => Ok(None),
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|err| anyhow::anyhow!("failed to install logger: {err}"))?;
            Ok(None)
        }
    }
}
