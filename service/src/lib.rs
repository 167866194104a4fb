//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
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

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;

use std::time::Duration;

use smart_default::SmartDefault;

#[cfg(doc)]
use infra::{Database, Geocoder};

pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Delay before each retry of geocoding a simplified address.
    #[default(Duration::from_secs(1))]
    pub geocoding_retry_delay: Duration,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db, Geo> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// [`Geocoder`] of this [`Service`].
    geocoder: Geo,
}

impl<Db, Geo> Service<Db, Geo> {
    /// Creates a new [`Service`] with the provided parameters.
    #[must_use]
    pub fn new(config: Config, database: Db, geocoder: Geo) -> Self {
        Self {
            config,
            database,
            geocoder,
        }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns [`Geocoder`] of this [`Service`].
    #[must_use]
    pub fn geocoder(&self) -> &Geo {
        &self.geocoder
    }
}
