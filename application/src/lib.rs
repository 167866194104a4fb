//! Application provides REST API for interacting with the [`Service`].

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
pub mod error;

use axum::{
    routing::{get, post},
    Extension, Router,
};
// Used in binary.
use axum_client_ip as _;
use tokio as _;
use tower_http as _;
use tracing_subscriber as _;

pub use self::{
    args::Args,
    config::Config,
    error::{AsError, Error},
};

/// [`Service`] with filled infrastructure dependencies.
///
/// [`Service`]: service::Service
pub type Service =
    service::Service<service::infra::Sqlite, service::infra::Nominatim>;

/// Builds the REST API [`Router`] backed by the provided [`Service`].
pub fn router(service: Service) -> Router {
    Router::new()
        .route("/api/rentals", get(api::rental::list).post(api::rental::create))
        .route(
            "/api/rentals/:rental_id",
            get(api::rental::get)
                .put(api::rental::update)
                .delete(api::rental::delete),
        )
        .route(
            "/api/rentals/:rental_id/ratings",
            get(api::rating::list).post(api::rating::create),
        )
        .route(
            "/api/rentals/:rental_id/ratings/:rating_id",
            get(api::rating::get)
                .put(api::rating::update)
                .delete(api::rating::delete),
        )
        .route("/api/ratings", post(api::rating::create_legacy))
        .route("/api/geocoding", post(api::geocoding::geocode))
        .route("/api/geocode", post(api::geocoding::geocode))
        .layer(Extension(service))
}

#[cfg(test)]
mod dev_deps {
    //! Used in tests only.
    use mockito as _;
    use serde_json as _;
    use tower as _;
}
