//! Log-capturing facilities.

use std::path::Path;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod stderr;
mod files;

/// Initializes [`tracing-subscriber`].
///
/// Logs are always emitted to stderr. If `log_dir` is set, authorization
/// decisions are additionally written to daily log files in that directory.
///
/// NOTE: the returned [`WorkerGuard`] will perform cleanup for the tracing layer that emits logs
///       to files, which means it has to stay alive until the program exits!
pub fn init(log_dir: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>>
{
	let (files_layer, guard) = log_dir
		.map(files::layer)
		.transpose()
		.context("files layer")?
		.unzip();

	tracing_subscriber::registry()
		.with(stderr::layer())
		.with(files_layer)
		.init();

	tracing::info!(log_dir = ?log_dir.map(Path::display), "initialized logging");

	Ok(guard)
}
