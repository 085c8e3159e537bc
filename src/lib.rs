#![doc = include_str!("../README.md")]
// TODO: remove once https://github.com/tokio-rs/tracing/issues/2912 lands
#![allow(clippy::blocks_in_conditions)]

mod claims;
pub use claims::Claims;

mod rejection;
pub use rejection::Rejection;

mod config;
pub use config::Config;

pub mod authorizer;
pub use authorizer::Authorizer;

pub mod http_client;
pub use http_client::ReqwestService;

pub mod middleware;
pub mod extract;

#[cfg(test)]
mod testing;
