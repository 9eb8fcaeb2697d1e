//! Application providing a REST API for managing [`User`]s of the [`Service`].
//!
//! [`User`]: service::domain::User

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod api;
pub mod args;
pub mod config;
mod context;
pub mod error;

use axum::{
    routing::{get, put},
    Extension, Router,
};
// Used in binary.
use axum_client_ip as _;
use futures as _;
use tokio as _;
use tower_http as _;
use tracing_subscriber as _;
// Used in integration tests.
#[cfg(test)]
use tower as _;

pub use self::{
    args::Args,
    config::Config,
    context::Context,
    error::{AsError, Error},
};

/// [`Service`] with filled infrastructure dependencies.
///
/// [`Service`]: service::Service
pub type Service = service::Service<service::infra::Storage>;

/// Creates a new [`Router`] serving the HTTP API of the provided [`Service`].
pub fn router(service: Service) -> Router {
    Router::new()
        .route("/users", get(api::list_users).post(api::create_user))
        .route(
            "/users/:logon_name",
            put(api::update_user).delete(api::delete_user),
        )
        .route("/health", get(api::check_health))
        .layer(Extension(service))
}
