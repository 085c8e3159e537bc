//! This module contains general purpose middleware.
//!
//! Middlewares are implemented as [tower services] or as functions for
//! [`axum::middleware::from_fn_with_state()`].
//!
//! [tower services]: tower::Service

pub mod logging;

mod admin;
pub use admin::require_admin;
