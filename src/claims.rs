//! The [`Claims`] returned by the identity provider's token-introspection
//! endpoint.

use serde::{Deserialize, Serialize};

/// Information about a user, as asserted by the identity provider after it
/// validated their ID token.
///
/// `email` and `aud` must be present for a response to decode. `name` and
/// `picture` are only included by the provider if the `profile` scope was
/// granted, so they fall back to empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims
{
	/// The user's email address.
	pub email: String,

	/// The client ID of the application the token was issued for.
	#[serde(rename = "aud")]
	pub audience: String,

	/// The user's display name.
	#[serde(default)]
	pub name: String,

	/// URL of the user's profile picture.
	#[serde(default)]
	pub picture: String,
}
