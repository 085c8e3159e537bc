//! This module contains helpers for unit tests.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::{fmt, future};

use bytes::Bytes;
use http::StatusCode;
use http_body_util::Full;
use tower::Service;
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::layer::{self, SubscriberExt};

/// Global constructor that will run before tests.
#[ctor::ctor]
fn ctor()
{
	use tracing_subscriber::fmt::format::FmtSpan;
	use tracing_subscriber::EnvFilter;

	color_eyre::install().expect("failed to install color-eyre");
	tracing_subscriber::fmt()
		.compact()
		.with_ansi(true)
		.with_file(true)
		.with_level(true)
		.with_line_number(true)
		.with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
		.with_target(true)
		.with_test_writer()
		.with_env_filter(EnvFilter::from_default_env())
		.init();
}

/// Wrapper over std's `assert!()` macro that uses [`eyre::ensure!()`] instead.
///
/// [`eyre::ensure!()`]: color_eyre::eyre::ensure
macro_rules! assert {
	($($t:tt)*) => {
		::color_eyre::eyre::ensure!($($t)*)
	};
}

/// Wrapper over std's `assert_eq!()` macro that uses [`eyre::ensure!()`] instead.
///
/// [`eyre::ensure!()`]: color_eyre::eyre::ensure
macro_rules! assert_eq {
	($left:expr, $right:expr $(,)?) => {
		if $left != $right {
			::color_eyre::eyre::bail!(
				"assertion `left == right` failed\n  left: {:?}\n right: {:?}",
				$left,
				$right,
			)
		}
	};
}

/// Wrapper over std's `assert!(matches!())` that uses [`eyre::ensure!()`]
/// instead.
///
/// [`eyre::ensure!()`]: color_eyre::eyre::ensure
macro_rules! assert_matches {
	($expr:expr, $pat:pat $(if $cond:expr)? $(,)?) => {
		::color_eyre::eyre::ensure!(
			matches!($expr, $pat $(if $cond)?),
			"assertion `{}` matches `{}` failed",
			stringify!($expr),
			stringify!($pat $(if $cond)?),
		)
	};
}

pub(crate) use {assert, assert_eq, assert_matches};

/// A fake identity provider that answers every request with the same
/// response, and remembers which URIs it was called with.
#[derive(Debug, Clone)]
pub(crate) struct MockProvider
{
	/// Status code of every response.
	status: StatusCode,

	/// Body of every response.
	body: Bytes,

	/// The URIs of all requests we received so far.
	requests: Arc<Mutex<Vec<http::Uri>>>,
}

impl MockProvider
{
	pub(crate) fn new(status: StatusCode, body: impl Into<Bytes>) -> Self
	{
		Self { status, body: body.into(), requests: Arc::default() }
	}

	/// A provider that successfully validates every token as belonging to
	/// `email`, issued for `audience`.
	pub(crate) fn claims(email: &str, audience: &str) -> Self
	{
		let body = serde_json::json!({
			"iss": "https://accounts.google.com",
			"email": email,
			"email_verified": "true",
			"aud": audience,
			"name": "Test User",
			"picture": "https://example.com/picture.png",
		});

		Self::new(StatusCode::OK, body.to_string())
	}

	pub(crate) fn requests(&self) -> Vec<http::Uri>
	{
		self.requests.lock().unwrap().clone()
	}

	pub(crate) fn calls(&self) -> usize
	{
		self.requests.lock().unwrap().len()
	}
}

impl Service<http::Request<Bytes>> for MockProvider
{
	type Response = http::Response<Full<Bytes>>;
	type Error = Infallible;
	type Future = future::Ready<Result<Self::Response, Self::Error>>;

	fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>>
	{
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, request: http::Request<Bytes>) -> Self::Future
	{
		self.requests.lock().unwrap().push(request.uri().clone());

		let mut response = http::Response::new(Full::new(self.body.clone()));
		*response.status_mut() = self.status;

		future::ready(Ok(response))
	}
}

/// A single tracing event recorded by [`capture_logs()`].
#[derive(Debug, Clone)]
pub(crate) struct CapturedEvent
{
	pub(crate) level: tracing::Level,
	pub(crate) target: String,
	pub(crate) message: String,
	pub(crate) fields: BTreeMap<&'static str, String>,
}

impl CapturedEvent
{
	pub(crate) fn field(&self, name: &str) -> Option<&str>
	{
		self.fields.get(name).map(String::as_str)
	}
}

impl Visit for CapturedEvent
{
	fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug)
	{
		if field.name() == "message" {
			self.message = format!("{value:?}");
		} else {
			self.fields.insert(field.name(), format!("{value:?}"));
		}
	}

	fn record_str(&mut self, field: &Field, value: &str)
	{
		if field.name() == "message" {
			self.message = value.to_owned();
		} else {
			self.fields.insert(field.name(), value.to_owned());
		}
	}
}

/// Shared handle to all events captured so far.
#[derive(Debug, Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<CapturedEvent>>>);

impl CapturedLogs
{
	pub(crate) fn events_with_target(&self, target: &str) -> Vec<CapturedEvent>
	{
		self.0
			.lock()
			.unwrap()
			.iter()
			.filter(|event| event.target == target)
			.cloned()
			.collect()
	}
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for CapturedLogs
{
	fn on_event(&self, event: &tracing::Event<'_>, _ctx: layer::Context<'_, S>)
	{
		let metadata = event.metadata();
		let mut captured = CapturedEvent {
			level: *metadata.level(),
			target: metadata.target().to_owned(),
			message: String::new(),
			fields: BTreeMap::new(),
		};

		event.record(&mut captured);
		self.0.lock().unwrap().push(captured);
	}
}

/// Captures all tracing events emitted on the current thread until the
/// returned guard is dropped.
///
/// Use this with single-threaded runtimes only, e.g. a plain `#[tokio::test]`.
pub(crate) fn capture_logs() -> (CapturedLogs, DefaultGuard)
{
	let logs = CapturedLogs::default();
	let subscriber = tracing_subscriber::registry().with(logs.clone());
	let guard = tracing::subscriber::set_default(subscriber);

	(logs, guard)
}
