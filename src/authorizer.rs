//! The [`Authorizer`] decides whether a request was made by an admin.
//!
//! The user logs in on the frontend (e.g. with Google Sign-In for Websites),
//! which stores their ID token in the [`COOKIE_NAME`] cookie. For every
//! request we then:
//!
//! 1. extract the ID token from the cookie
//! 2. send it to the identity provider's token-introspection endpoint
//! 3. decode the [`Claims`] from the response
//! 4. make sure the token was issued for us (the `aud` claim)
//! 5. look up the user's email address in the list of admins
//!
//! Nothing is cached; every call makes exactly one request to the identity
//! provider (unless the cookie is missing, in which case we don't make any).

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use axum_extra::extract::cookie::Cookie;
use bytes::Bytes;
use http::{header, HeaderMap, StatusCode};
use http_body::Body as HttpBody;
use http_body_util::{BodyExt, Limited};
use tower::{Service, ServiceExt};
use url::Url;

use crate::http_client::{BoxError, ReqwestService};
use crate::{Claims, Config, Rejection};

/// The name of the HTTP cookie that stores the user's ID token.
pub const COOKIE_NAME: &str = "id_token";

/// Google's token-introspection endpoint.
pub const TOKENINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/tokeninfo";

/// How long we wait for the identity provider by default.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound for the size of the identity provider's response body.
pub const MAX_RESPONSE_SIZE: usize = 64 * 1024;

/// Tracing target for authorization decisions.
const AUDIT_TARGET: &str = "idtoken_admin::audit";

/// Checks requests for a valid ID token belonging to an admin.
///
/// The audience and admin list are fixed at construction. Cloning is cheap
/// and clones share all configuration, as well as the HTTP client's
/// connection pool.
#[derive(Clone)]
pub struct Authorizer<S = ReqwestService>
{
	/// The client ID our tokens have to be issued for.
	audience: Arc<str>,

	/// Email addresses of all admins.
	admins: Arc<[String]>,

	/// The identity provider's token-introspection endpoint.
	tokeninfo_url: Arc<Url>,

	/// How long we wait for the identity provider before giving up.
	timeout: Duration,

	/// Used for talking to the identity provider.
	http_client: S,
}

impl<S> fmt::Debug for Authorizer<S>
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		f.debug_struct("Authorizer")
			.field("audience", &self.audience)
			.field("admins", &self.admins)
			.field("tokeninfo_url", &format_args!("{:?}", self.tokeninfo_url.as_str()))
			.field("timeout", &self.timeout)
			.finish_non_exhaustive()
	}
}

impl Authorizer
{
	/// Creates a new [`Authorizer`] that talks to Google using a default
	/// [`reqwest::Client`].
	///
	/// No validation is performed on either argument.
	pub fn new<A, I>(audience: A, admins: I) -> Self
	where
		A: Into<Arc<str>>,
		I: IntoIterator,
		I::Item: Into<String>,
	{
		Self {
			audience: audience.into(),
			admins: admins.into_iter().map(Into::into).collect(),
			tokeninfo_url: Arc::new(default_tokeninfo_url()),
			timeout: DEFAULT_TIMEOUT,
			http_client: ReqwestService::new(reqwest::Client::new()),
		}
	}

	/// Creates a new [`Authorizer`] from the runtime [`Config`].
	pub fn from_config(config: &Config) -> reqwest::Result<Self>
	{
		let http_client = ReqwestService::with_timeout(config.timeout())?;

		Ok(Self::new(config.client_id.as_str(), config.admin_emails())
			.with_tokeninfo_url(config.tokeninfo_url.clone())
			.with_timeout(config.timeout())
			.with_http_client(http_client))
	}
}

impl<S> Authorizer<S>
{
	/// Replaces the HTTP client.
	pub fn with_http_client<NewS>(self, http_client: NewS) -> Authorizer<NewS>
	{
		Authorizer {
			audience: self.audience,
			admins: self.admins,
			tokeninfo_url: self.tokeninfo_url,
			timeout: self.timeout,
			http_client,
		}
	}

	/// Replaces the token-introspection endpoint.
	pub fn with_tokeninfo_url(self, tokeninfo_url: Url) -> Self
	{
		Self { tokeninfo_url: Arc::new(tokeninfo_url), ..self }
	}

	/// Replaces the timeout for requests to the identity provider.
	pub fn with_timeout(self, timeout: Duration) -> Self
	{
		Self { timeout, ..self }
	}

	/// The client ID tokens have to be issued for.
	pub fn audience(&self) -> &str
	{
		&self.audience
	}

	/// The admins' email addresses.
	pub fn admins(&self) -> &[String]
	{
		&self.admins
	}

	/// The token-introspection endpoint.
	pub fn tokeninfo_url(&self) -> &Url
	{
		&self.tokeninfo_url
	}

	/// How long we wait for the identity provider.
	pub const fn timeout(&self) -> Duration
	{
		self.timeout
	}
}

impl<S, B> Authorizer<S>
where
	S: Service<http::Request<Bytes>, Response = http::Response<B>> + Clone + Send + Sync + 'static,
	S::Error: Into<BoxError>,
	S::Future: Send,
	B: HttpBody + Send,
	B::Data: Send,
	B::Error: Into<BoxError>,
{
	/// Returns `true` if the request was made by a logged-in admin.
	///
	/// Every kind of failure results in `false`. The reason is logged, but not
	/// returned; use [`Authorizer::authorize()`] if you need it.
	pub async fn is_admin(&self, headers: &HeaderMap) -> bool
	{
		self.authorize(headers).await.is_ok()
	}

	/// Authorizes a request and returns the admin's [`Claims`].
	#[tracing::instrument(
		level = "debug",
		name = "Authorizer::authorize",
		skip_all,
		fields(email = tracing::field::Empty),
		err(Display, level = "debug"),
	)]
	pub async fn authorize(&self, headers: &HeaderMap) -> Result<Claims, Rejection>
	{
		// Browsers send the most specific cookie first, so the first match wins.
		let id_token = headers
			.get_all(header::COOKIE)
			.into_iter()
			.flat_map(|value| value.to_str())
			.flat_map(|value| Cookie::split_parse_encoded(value.trim().to_owned()))
			.flatten()
			.find(|cookie| cookie.name() == COOKIE_NAME);

		let Some(id_token) = id_token else {
			tracing::info!(target: AUDIT_TARGET, "no cookie supplied");
			return Err(Rejection::NoCredential { cookie: COOKIE_NAME });
		};

		let claims = self.verify(id_token.value()).await?;

		tracing::Span::current().record("email", claims.email.as_str());

		if claims.audience.as_str() != &*self.audience {
			tracing::info!(target: AUDIT_TARGET, audience = %claims.audience, "wrong audience");
			return Err(Rejection::AudienceMismatch { actual: claims.audience });
		}

		if !self.admins.iter().any(|admin| *admin == claims.email) {
			tracing::info!(target: AUDIT_TARGET, email = ?claims.email, "not an administrator");
			return Err(Rejection::NotAuthorized { email: claims.email });
		}

		tracing::debug!(target: AUDIT_TARGET, email = %claims.email, "authorized admin");

		Ok(claims)
	}

	/// Sends `id_token` to the identity provider and decodes the claims it
	/// returns.
	async fn verify(&self, id_token: &str) -> Result<Claims, Rejection>
	{
		let (status, body) = self.fetch(id_token).await.inspect_err(|error| {
			tracing::info!(target: AUDIT_TARGET, %error, "failed to validate id token");
		})?;

		if status != StatusCode::OK {
			tracing::info! {
				target: AUDIT_TARGET,
				%status,
				body = %String::from_utf8_lossy(&body),
				"failed to validate id token",
			};

			return Err(Rejection::ProviderRejected { status });
		}

		let claims = serde_json::from_slice::<Claims>(&body).inspect_err(|error| {
			tracing::info!(target: AUDIT_TARGET, %error, "failed to decode claims");
		})?;

		Ok(claims)
	}

	/// Builds the request for `id_token` and sends it, giving up after
	/// `self.timeout`.
	async fn fetch(&self, id_token: &str) -> Result<(StatusCode, Bytes), Rejection>
	{
		let mut url = Url::clone(&self.tokeninfo_url);
		url.query_pairs_mut().append_pair(COOKIE_NAME, id_token);

		let request = http::Request::get(url.as_str())
			.body(Bytes::new())
			.map_err(|error| Rejection::TransportError { source: error.into() })?;

		tokio::time::timeout(self.timeout, self.send(request))
			.await
			.map_err(|_| Rejection::TimedOut { after: self.timeout })
			.and_then(|result| result)
	}

	/// Makes the actual HTTP request and buffers at most
	/// [`MAX_RESPONSE_SIZE`] bytes of the response body.
	async fn send(&self, request: http::Request<Bytes>) -> Result<(StatusCode, Bytes), Rejection>
	{
		tracing::debug!(url = %self.tokeninfo_url, "making http request to identity provider");

		let response = self
			.http_client
			.clone()
			.oneshot(request)
			.await
			.map_err(|error| Rejection::TransportError { source: error.into() })?;

		let (parts, body) = response.into_parts();
		let body = Limited::new(body, MAX_RESPONSE_SIZE)
			.collect()
			.await
			.map_err(|error| Rejection::TransportError { source: error.into() })?
			.to_bytes();

		Ok((parts.status, body))
	}
}

/// Parses [`TOKENINFO_URL`].
pub(crate) fn default_tokeninfo_url() -> Url
{
	Url::parse(TOKENINFO_URL).expect("hard-coded URL should be valid")
}
