//! Middleware that only lets admins through.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use bytes::Bytes;
use http_body::Body as HttpBody;
use tower::Service;

use crate::http_client::BoxError;
use crate::{Authorizer, Rejection};

/// Rejects any request that wasn't made by an admin with
/// `401 Unauthorized`.
///
/// Authorized requests get the admin's [`Claims`] inserted into their
/// extensions, where the [`Admin`] extractor will find them.
///
/// Use this with [`axum::middleware::from_fn_with_state()`]:
///
/// ```ignore
/// let router = Router::new()
///     .route("/admin", routing::get(handler))
///     .layer(middleware::from_fn_with_state(authorizer, require_admin::<ReqwestService, _>));
/// ```
///
/// [`Claims`]: crate::Claims
/// [`Admin`]: crate::extract::Admin
#[tracing::instrument(level = "trace", skip_all, fields(uri = %request.uri()))]
pub async fn require_admin<S, B>(
	State(authorizer): State<Authorizer<S>>,
	mut request: Request,
	next: Next,
) -> Result<Response, Rejection>
where
	S: Service<http::Request<Bytes>, Response = http::Response<B>> + Clone + Send + Sync + 'static,
	S::Error: Into<BoxError>,
	S::Future: Send,
	B: HttpBody + Send,
	B::Data: Send,
	B::Error: Into<BoxError>,
{
	let claims = authorizer.authorize(request.headers()).await?;

	request.extensions_mut().insert(claims);

	Ok(next.run(request).await)
}
