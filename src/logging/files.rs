use std::path::Path;
use std::{fs, io};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::filter::FilterFn;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// Provides a tracing layer that writes authorization decisions to daily log
/// files in `log_dir`.
pub fn layer<S>(log_dir: &Path) -> io::Result<(impl tracing_subscriber::Layer<S>, WorkerGuard)>
where
	S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
	if !log_dir.exists() {
		fs::create_dir_all(log_dir)?;
	}

	let (writer, guard) = tracing_appender::rolling::Builder::new()
		.rotation(Rotation::DAILY)
		.filename_prefix("audit")
		.filename_suffix("log")
		.build(log_dir)
		.map(tracing_appender::non_blocking)
		.map_err(io::Error::other)?;

	let layer = tracing_subscriber::fmt::layer()
		.with_ansi(false)
		.with_writer(writer)
		.with_filter(FilterFn::new(|metadata| {
			metadata.target().starts_with("idtoken_admin::audit")
		}));

	Ok((layer, guard))
}
