//! [`Geocoder`]-related implementations.

pub mod nominatim;

use derive_more::{Display, Error as StdError, From};

pub use self::nominatim::Nominatim;

/// Geocoding operation.
pub use common::Handler as Geocoder;

/// [`Geocoder`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Request to the upstream service failed.
    #[display("Geocoding request failed: {_0}")]
    Request(reqwest::Error),

    /// Upstream service responded with something unexpected.
    #[display("Malformed geocoding response: {_0}")]
    #[from(ignore)]
    Malformed(#[error(not(source))] String),
}
