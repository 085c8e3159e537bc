//! The HTTP capability used by the [`Authorizer`] to talk to the identity
//! provider.
//!
//! The [`Authorizer`] is generic over any [`Service`] that turns an
//! [`http::Request`] into an [`http::Response`]. In production this is
//! [`ReqwestService`]; tests plug in [`tower::service_fn`] closures instead.
//!
//! [`Authorizer`]: crate::Authorizer

use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use futures::future::BoxFuture;
use tower::Service;

/// Type-erased error used for failures coming out of the HTTP capability.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An HTTP [`Service`] backed by a [`reqwest::Client`].
///
/// Cloning this is cheap; all clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestService
{
	/// The underlying client.
	client: reqwest::Client,
}

impl ReqwestService
{
	/// Wraps an existing client.
	pub const fn new(client: reqwest::Client) -> Self
	{
		Self { client }
	}

	/// Builds a new client that gives up on requests after `timeout`.
	pub fn with_timeout(timeout: Duration) -> reqwest::Result<Self>
	{
		reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map(Self::new)
	}
}

impl From<reqwest::Client> for ReqwestService
{
	fn from(client: reqwest::Client) -> Self
	{
		Self::new(client)
	}
}

impl Service<http::Request<Bytes>> for ReqwestService
{
	type Response = http::Response<reqwest::Body>;
	type Error = reqwest::Error;
	type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

	fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>>
	{
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, request: http::Request<Bytes>) -> Self::Future
	{
		let client = self.client.clone();

		Box::pin(async move {
			let request = reqwest::Request::try_from(request)?;
			let response = client.execute(request).await?;

			Ok(http::Response::from(response))
		})
	}
}
