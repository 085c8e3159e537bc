//! This module contains the [`Config`] struct - a set of configuration options
//! that will be read from the command line or the environment on startup.
//!
//! See the `.env.example` file in the root of the repository for all the
//! relevant variables and example values.

use std::convert::Infallible;
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::authorizer::{DEFAULT_TIMEOUT, TOKENINFO_URL};

/// Runtime configuration.
#[derive(Clone, clap::Parser)]
#[command(version, about)]
pub struct Config
{
	/// Address to listen on.
	#[arg(long, env = "IDTOKEN_ADMIN_ADDR", default_value_t = default_addr())]
	pub addr: SocketAddr,

	/// The OAuth client ID ID tokens have to be issued for.
	#[arg(long, env = "IDTOKEN_ADMIN_CLIENT_ID")]
	pub client_id: String,

	/// Comma-separated list of admin email addresses.
	///
	/// Whitespace around each entry is ignored, and so are empty entries.
	#[arg(
		long,
		env = "IDTOKEN_ADMIN_EMAILS",
		value_delimiter = ',',
		num_args = 0..,
		value_parser = parse_email,
	)]
	pub admins: Vec<String>,

	/// The identity provider's token-introspection endpoint.
	#[arg(long, env = "IDTOKEN_ADMIN_TOKENINFO_URL", default_value = TOKENINFO_URL)]
	pub tokeninfo_url: Url,

	/// How long to wait for the identity provider (in seconds).
	#[arg(long = "timeout", env = "IDTOKEN_ADMIN_TIMEOUT", default_value_t = DEFAULT_TIMEOUT.as_secs())]
	pub timeout_secs: u64,

	/// Directory to write audit logs to.
	///
	/// If this is not set, logs only go to stderr.
	#[arg(long, env = "IDTOKEN_ADMIN_LOG_DIR")]
	pub log_dir: Option<PathBuf>,
}

impl Config
{
	/// How long to wait for the identity provider.
	pub const fn timeout(&self) -> Duration
	{
		Duration::from_secs(self.timeout_secs)
	}

	/// The configured admin email addresses, without empty entries.
	pub fn admin_emails(&self) -> impl Iterator<Item = &str>
	{
		self.admins
			.iter()
			.map(String::as_str)
			.filter(|email| !email.is_empty())
	}
}

impl fmt::Debug for Config
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		f.debug_struct("Config")
			.field("addr", &format_args!("{}", self.addr))
			.field("client_id", &self.client_id)
			.field("admins", &self.admins)
			.field("tokeninfo_url", &format_args!("{:?}", self.tokeninfo_url.as_str()))
			.field("timeout", &self.timeout())
			.field("log_dir", &self.log_dir)
			.finish()
	}
}

/// Trims a single entry of the admin list.
fn parse_email(email: &str) -> Result<String, Infallible>
{
	Ok(email.trim().to_owned())
}

/// `127.0.0.1:8080`
fn default_addr() -> SocketAddr
{
	SocketAddr::from((Ipv4Addr::LOCALHOST, 8080))
}
