//! The reasons a request can fail to be authorized as an admin.

use std::time::Duration;

use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

use crate::http_client::BoxError;

/// Why [`Authorizer::authorize()`] did not let a request through.
///
/// Callers of [`Authorizer::is_admin()`] only ever see `false`; this type
/// exists so the cause can be logged and asserted on in tests.
///
/// [`Authorizer::authorize()`]: crate::Authorizer::authorize
/// [`Authorizer::is_admin()`]: crate::Authorizer::is_admin
#[derive(Debug, Error)]
pub enum Rejection
{
	/// The request did not carry an ID token cookie.
	#[error("no `{cookie}` cookie supplied")]
	NoCredential
	{
		/// Name of the cookie we looked for.
		cookie: &'static str,
	},

	/// We could not reach the identity provider, or reading its response
	/// failed.
	#[error("failed to validate id token: {source}")]
	TransportError
	{
		/// The underlying error.
		source: BoxError,
	},

	/// The identity provider did not answer in time.
	#[error("identity provider did not respond within {after:?}")]
	TimedOut
	{
		/// The timeout that elapsed.
		after: Duration,
	},

	/// The identity provider rejected the token.
	#[error("identity provider rejected id token ({status})")]
	ProviderRejected
	{
		/// The status code we got instead of `200 OK`.
		status: StatusCode,
	},

	/// The identity provider's response could not be decoded into claims.
	#[error("failed to decode claims: {0}")]
	MalformedResponse(#[from] serde_json::Error),

	/// The token was issued for a different application.
	#[error("wrong audience `{actual}`")]
	AudienceMismatch
	{
		/// The audience the token was issued for.
		actual: String,
	},

	/// The user is authenticated, but not an admin.
	#[error("{email:?} is not an administrator")]
	NotAuthorized
	{
		/// The email address of the user.
		email: String,
	},
}

impl IntoResponse for Rejection
{
	fn into_response(self) -> Response
	{
		StatusCode::UNAUTHORIZED.into_response()
	}
}
