//! Geocoding REST API definitions.

use axum::Extension;
use serde::{Deserialize, Serialize};
use service::{
    domain::{geocoding::Address, rental},
    query,
    read::geocoding::Outcome,
    Query as _,
};

use crate::{api, define_error, AsError as _, Error, Service};

define_error! {
    enum GeocodingError {
        #[code = "ZERO_RESULTS"]
        #[status = UNPROCESSABLE_ENTITY]
        #[message = "Provided address could not be resolved"]
        ZeroResults,

        #[code = "GEOCODING_FAILED"]
        #[status = INTERNAL_SERVER_ERROR]
        #[message = "Geocoding service is temporarily unavailable"]
        Failed,
    }
}

/// Body of a geocoding request.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Request {
    /// Free-text address to resolve.
    pub address: Option<String>,
}

/// Geocoding response.
#[derive(Clone, Debug, Serialize)]
pub struct Response {
    /// Always `OK`, as an unresolved address is reported as an [`Error`].
    pub status: &'static str,

    /// Exactly one resolved [`Place`].
    pub results: Vec<Place>,
}

/// Resolved place.
#[derive(Clone, Debug, Serialize)]
pub struct Place {
    /// Human-readable address as formatted by the geocoder.
    pub formatted_address: String,

    /// [`Geometry`] of this [`Place`].
    pub geometry: Geometry,

    /// Address originally requested.
    pub original_address: Address,

    /// Address variant that actually resolved.
    pub matched_address: Address,
}

/// Geometry of a [`Place`].
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Geometry {
    /// Coordinates of a [`Place`].
    pub location: Coordinates,
}

/// Geographic coordinates.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub lat: rental::Latitude,

    /// Longitude in degrees.
    pub lng: rental::Longitude,
}

/// Resolves an address into coordinates, simplifying it if needed.
///
/// # Errors
///
/// If the address is missing, cannot be resolved, or the geocoder fails.
#[tracing::instrument(skip_all, fields(address = ?req.address))]
pub async fn geocode(
    Extension(service): Extension<Service>,
    api::Json(req): api::Json<Request>,
) -> Result<api::Success<Response>, Error> {
    let mut v = api::Validator::default();
    let address = v.require_text("address", req.address, Address::new);
    let address = v.finish(address)?;

    let outcome = service
        .execute(query::Geocode { address })
        .await
        .map_err(|e| {
            tracing::error!("geocoding failed: {e}");
            e.into_error()
        })?;

    match outcome {
        Outcome::Found {
            original,
            matched,
            location,
        } => Ok(api::Success::ok(
            Response {
                status: "OK",
                results: vec![Place {
                    formatted_address: location.formatted_address,
                    geometry: Geometry {
                        location: Coordinates {
                            lat: location.lat,
                            lng: location.lng,
                        },
                    },
                    original_address: original,
                    matched_address: matched,
                }],
            },
            "Address resolved",
        )),
        Outcome::NotFound => Err(GeocodingError::ZeroResults.into()),
    }
}
