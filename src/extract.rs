//! Extractors for handlers behind [`require_admin`].
//!
//! [`require_admin`]: crate::middleware::require_admin

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::response::{IntoResponse, Response};
use http::{request, StatusCode};
use thiserror::Error;

use crate::Claims;

/// The [`Claims`] of the admin who made the current request.
///
/// This only works for routes wrapped in [`require_admin`]; anywhere else the
/// request is rejected with `401 Unauthorized`.
///
/// [`require_admin`]: crate::middleware::require_admin
#[derive(Debug, Clone)]
pub struct Admin(pub Claims);

/// Rejection for the [`Admin`] extractor.
#[derive(Debug, Clone, Copy, Error)]
#[error("request was not authorized as an admin")]
pub struct MissingAdmin;

impl IntoResponse for MissingAdmin
{
	fn into_response(self) -> Response
	{
		StatusCode::UNAUTHORIZED.into_response()
	}
}

#[async_trait]
impl<S> FromRequestParts<S> for Admin
where
	S: Send + Sync,
{
	type Rejection = MissingAdmin;

	async fn from_request_parts(req: &mut request::Parts, _state: &S) -> Result<Self, Self::Rejection>
	{
		req.extensions
			.get::<Claims>()
			.cloned()
			.map(Self)
			.ok_or_else(|| {
				tracing::warn!(uri = %req.uri, "`Admin` extracted on a route without `require_admin`");
				MissingAdmin
			})
	}
}
