//! Example server with a single admin-only route.

use std::net::SocketAddr;

use anyhow::Context;
use axum::{middleware, routing, Json, Router};
use clap::Parser;
use idtoken_admin::extract::Admin;
use idtoken_admin::middleware::require_admin;
use idtoken_admin::{Authorizer, Claims, Config, ReqwestService};
use tokio::net::TcpListener;
use tokio::signal;

mod logging;

#[tokio::main]
async fn main() -> anyhow::Result<()>
{
	if let Err(error) = dotenvy::dotenv() {
		eprintln!("Failed to load `.env` file: {error}");
	}

	let config = Config::parse();
	let _guard = logging::init(config.log_dir.as_deref()).context("initialize logging")?;

	tracing::debug!(?config, "loaded configuration");

	let authorizer = Authorizer::from_config(&config).context("build http client")?;

	if authorizer.admins().is_empty() {
		tracing::warn!("no admins configured; every request to `/admin` will be rejected");
	}

	let app = Router::new()
		.route("/admin", routing::get(admin))
		.layer(middleware::from_fn_with_state(authorizer, require_admin::<ReqwestService, _>))
		.route("/", routing::get(|| async { "Hello, world!" }))
		.layer(idtoken_admin::trace_layer!())
		.into_make_service_with_connect_info::<SocketAddr>();

	let listener = TcpListener::bind(config.addr)
		.await
		.context("bind tcp socket")?;

	let addr = listener.local_addr().context("get tcp addr")?;
	tracing::info!(%addr, "listening for requests");

	axum::serve(listener, app)
		.with_graceful_shutdown(sigint())
		.await
		.context("run http server")
}

/// Returns the admin's claims.
async fn admin(Admin(claims): Admin) -> Json<Claims>
{
	Json(claims)
}

/// Waits for a SIGINT signal from the operating system.
#[tracing::instrument(name = "runtime::signals")]
async fn sigint()
{
	if let Err(error) = signal::ctrl_c().await {
		tracing::error!(%error, "failed to receive SIGINT");
	} else {
		tracing::warn!("received SIGINT; shutting down...");
	}
}
