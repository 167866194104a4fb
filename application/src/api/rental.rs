//! [`Rental`]-related REST API definitions.

use axum::Extension;
use common::pagination::Order;
use serde::{Deserialize, Serialize};
use service::{
    command, domain,
    domain::{
        rating::{OverallRating, Score},
        rental,
    },
    query,
    read::rental::list,
    Command as _,
};

use crate::{api, AsError, Error, Service};

/// Rental housing listing.
#[derive(Clone, Debug, Serialize)]
pub struct Rental {
    /// ID of this [`Rental`].
    pub id: rental::Id,

    /// Map-matched address.
    pub address: rental::Address,

    /// Human-entered address.
    pub descriptive_address: Option<rental::DescriptiveAddress>,

    /// Latitude in degrees.
    pub lat: rental::Latitude,

    /// Longitude in degrees.
    pub lng: rental::Longitude,

    /// Free-text description.
    pub description: Option<rental::Description>,

    /// Monthly rent.
    pub rent_price: Option<rental::RentPrice>,

    /// Type of the room.
    pub room_type: Option<rental::RoomType>,

    /// Area size.
    pub area_size: Option<rental::AreaSize>,

    /// Comma-separated facility tags.
    pub facilities: Option<rental::Facilities>,

    /// Landlord score.
    pub landlord_rating: Option<Score>,

    /// Location score.
    pub location_rating: Option<Score>,

    /// Value-for-money score.
    pub value_rating: Option<Score>,

    /// Overall rating.
    pub overall_rating: Option<OverallRating>,

    /// When this [`Rental`] was created.
    pub created_at: rental::CreationDateTime,

    /// When this [`Rental`] was modified the last time.
    pub updated_at: rental::ModificationDateTime,
}

impl From<domain::Rental> for Rental {
    fn from(rental: domain::Rental) -> Self {
        let domain::Rental {
            id,
            address,
            descriptive_address,
            lat,
            lng,
            description,
            rent_price,
            room_type,
            area_size,
            facilities,
            landlord_rating,
            location_rating,
            value_rating,
            overall_rating,
            created_at,
            updated_at,
        } = rental;

        Self {
            id,
            address,
            descriptive_address,
            lat,
            lng,
            description,
            rent_price,
            room_type,
            area_size,
            facilities,
            landlord_rating,
            location_rating,
            value_rating,
            overall_rating,
            created_at,
            updated_at,
        }
    }
}

/// Data of a created [`Rental`] or of a [`Rental`] being re-rated.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Created<Id> {
    /// ID of the created entity.
    pub id: Id,

    /// Overall rating of the [`Rental`].
    pub overall_rating: Option<OverallRating>,
}

/// Data of a deleted entity.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Deleted<Id> {
    /// ID of the deleted entity.
    pub id: Id,
}

/// Query parameters of listing [`Rental`]s.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListParams {
    /// 1-based page number.
    pub page: Option<u32>,

    /// Maximum number of [`Rental`]s on a page.
    pub limit: Option<u32>,

    /// Field to sort by.
    pub sort: Option<String>,

    /// `asc` or `desc` order.
    pub order: Option<String>,
}

impl From<ListParams> for list::Selector {
    fn from(params: ListParams) -> Self {
        let ListParams {
            page,
            limit,
            sort,
            order,
        } = params;

        Self {
            arguments: list::Arguments::new(page, limit),
            sort: sort
                .as_deref()
                .map(list::Sort::parse_lenient)
                .unwrap_or_default(),
            order: order
                .as_deref()
                .map(Order::parse_lenient)
                .unwrap_or_default(),
            filter: (),
        }
    }
}

/// Body of a [`Rental`] creation request.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateRequest {
    /// Map-matched address.
    pub address: Option<String>,

    /// Human-entered address.
    pub descriptive_address: Option<String>,

    /// Latitude in degrees.
    pub lat: Option<f64>,

    /// Longitude in degrees.
    pub lng: Option<f64>,

    /// Free-text description.
    pub description: Option<String>,

    /// Monthly rent.
    pub rent_price: Option<i64>,

    /// Type of the room.
    pub room_type: Option<String>,

    /// Area size.
    pub area_size: Option<f64>,

    /// Comma-separated facility tags.
    pub facilities: Option<String>,

    /// Landlord score.
    pub landlord_rating: Option<i64>,

    /// Location score.
    pub location_rating: Option<i64>,

    /// Value-for-money score.
    pub value_rating: Option<i64>,
}

impl TryFrom<CreateRequest> for command::CreateRental {
    type Error = Error;

    fn try_from(req: CreateRequest) -> Result<Self, Self::Error> {
        let CreateRequest {
            address,
            descriptive_address,
            lat,
            lng,
            description,
            rent_price,
            room_type,
            area_size,
            facilities,
            landlord_rating,
            location_rating,
            value_rating,
        } = req;

        let mut v = api::Validator::default();
        let address = v.require_text("address", address, rental::Address::new);
        let lat = v.require("lat", lat, rental::Latitude::new);
        let lng = v.require("lng", lng, rental::Longitude::new);
        let descriptive_address = v.text(
            "descriptive_address",
            descriptive_address,
            rental::DescriptiveAddress::new,
        );
        let description =
            v.text("description", description, rental::Description::new);
        let rent_price =
            v.optional("rent_price", rent_price, rental::RentPrice::new);
        let room_type = v.text("room_type", room_type, rental::RoomType::new);
        let area_size =
            v.optional("area_size", area_size, rental::AreaSize::new);
        let facilities =
            v.text("facilities", facilities, rental::Facilities::new);
        let landlord_rating =
            v.optional("landlord_rating", landlord_rating, Score::new);
        let location_rating =
            v.optional("location_rating", location_rating, Score::new);
        let value_rating = v.optional("value_rating", value_rating, Score::new);

        let ((address, lat), lng) = v.finish(address.zip(lat).zip(lng))?;

        Ok(Self {
            address,
            descriptive_address,
            lat,
            lng,
            description,
            rent_price,
            room_type,
            area_size,
            facilities,
            landlord_rating,
            location_rating,
            value_rating,
        })
    }
}

/// Body of a [`Rental`] partial update request.
///
/// Absent fields are left unchanged, while `null` ones are cleared.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateRequest {
    /// Map-matched address.
    pub address: Option<String>,

    /// Human-entered address.
    #[serde(deserialize_with = "api::nullable")]
    pub descriptive_address: Option<Option<String>>,

    /// Latitude in degrees.
    pub lat: Option<f64>,

    /// Longitude in degrees.
    pub lng: Option<f64>,

    /// Free-text description.
    #[serde(deserialize_with = "api::nullable")]
    pub description: Option<Option<String>>,

    /// Monthly rent.
    #[serde(deserialize_with = "api::nullable")]
    pub rent_price: Option<Option<i64>>,

    /// Type of the room.
    #[serde(deserialize_with = "api::nullable")]
    pub room_type: Option<Option<String>>,

    /// Area size.
    #[serde(deserialize_with = "api::nullable")]
    pub area_size: Option<Option<f64>>,

    /// Comma-separated facility tags.
    #[serde(deserialize_with = "api::nullable")]
    pub facilities: Option<Option<String>>,

    /// Landlord score.
    #[serde(deserialize_with = "api::nullable")]
    pub landlord_rating: Option<Option<i64>>,

    /// Location score.
    #[serde(deserialize_with = "api::nullable")]
    pub location_rating: Option<Option<i64>>,

    /// Value-for-money score.
    #[serde(deserialize_with = "api::nullable")]
    pub value_rating: Option<Option<i64>>,
}

impl TryFrom<UpdateRequest> for rental::Patch {
    type Error = Error;

    fn try_from(req: UpdateRequest) -> Result<Self, Self::Error> {
        let UpdateRequest {
            address,
            descriptive_address,
            lat,
            lng,
            description,
            rent_price,
            room_type,
            area_size,
            facilities,
            landlord_rating,
            location_rating,
            value_rating,
        } = req;

        let mut v = api::Validator::default();
        let patch = Self {
            address: v.optional(
                "address",
                address.map(|s| s.trim().to_owned()),
                rental::Address::new,
            ),
            descriptive_address: v.nullable_text(
                "descriptive_address",
                descriptive_address,
                rental::DescriptiveAddress::new,
            ),
            lat: v.optional("lat", lat, rental::Latitude::new),
            lng: v.optional("lng", lng, rental::Longitude::new),
            description: v.nullable_text(
                "description",
                description,
                rental::Description::new,
            ),
            rent_price: v.nullable(
                "rent_price",
                rent_price,
                rental::RentPrice::new,
            ),
            room_type: v.nullable_text(
                "room_type",
                room_type,
                rental::RoomType::new,
            ),
            area_size: v.nullable(
                "area_size",
                area_size,
                rental::AreaSize::new,
            ),
            facilities: v.nullable_text(
                "facilities",
                facilities,
                rental::Facilities::new,
            ),
            landlord_rating: v.nullable(
                "landlord_rating",
                landlord_rating,
                Score::new,
            ),
            location_rating: v.nullable(
                "location_rating",
                location_rating,
                Score::new,
            ),
            value_rating: v.nullable("value_rating", value_rating, Score::new),
        };
        v.finish(Some(patch))
    }
}

/// Lists a page of [`Rental`]s.
///
/// # Errors
///
/// If the storage fails.
#[tracing::instrument(skip_all, fields(page = ?params.page))]
pub async fn list(
    Extension(service): Extension<Service>,
    api::Query(params): api::Query<ListParams>,
) -> Result<api::Success<Vec<Rental>>, Error> {
    let page = service
        .execute(query::rentals::List::by(params.into()))
        .await
        .map_err(AsError::into_error)?;

    Ok(api::Success::ok(
        page.items.into_iter().map(Into::into).collect(),
        "Rentals fetched",
    ))
}

/// Fetches a single [`Rental`].
///
/// # Errors
///
/// If the [`Rental`] doesn't exist, or the storage fails.
#[tracing::instrument(skip_all, fields(rental.id = %id))]
pub async fn get(
    Extension(service): Extension<Service>,
    api::Path(id): api::Path<rental::Id>,
) -> Result<api::Success<Rental>, Error> {
    service
        .execute(query::rental::ById::by(id))
        .await
        .map_err(AsError::into_error)?
        .ok_or_else(|| api::NotFoundError::Rental.into())
        .map(|r| api::Success::ok(r.into(), "Rental fetched"))
}

/// Creates a new [`Rental`].
///
/// # Errors
///
/// If the request is invalid, or the storage fails.
#[tracing::instrument(skip_all)]
pub async fn create(
    Extension(service): Extension<Service>,
    api::Json(req): api::Json<CreateRequest>,
) -> Result<api::Success<Created<rental::Id>>, Error> {
    let rental = service
        .execute(command::CreateRental::try_from(req)?)
        .await
        .map_err(AsError::into_error)?;

    tracing::info!(rental.id = %rental.id, "created `Rental`");

    Ok(api::Success::created(
        Created {
            id: rental.id,
            overall_rating: rental.overall_rating,
        },
        "Rental created",
    ))
}

/// Partially updates a [`Rental`].
///
/// # Errors
///
/// If the request is invalid, the [`Rental`] doesn't exist, or the storage
/// fails.
#[tracing::instrument(skip_all, fields(rental.id = %id))]
pub async fn update(
    Extension(service): Extension<Service>,
    api::Path(id): api::Path<rental::Id>,
    api::Json(req): api::Json<UpdateRequest>,
) -> Result<api::Success<Rental>, Error> {
    service
        .execute(command::UpdateRental {
            rental_id: id,
            patch: req.try_into()?,
        })
        .await
        .map_err(AsError::into_error)
        .map(|r| api::Success::ok(r.into(), "Rental updated"))
}

/// Deletes a [`Rental`] along with its ratings.
///
/// # Errors
///
/// If the [`Rental`] doesn't exist, or the storage fails.
#[tracing::instrument(skip_all, fields(rental.id = %id))]
pub async fn delete(
    Extension(service): Extension<Service>,
    api::Path(id): api::Path<rental::Id>,
) -> Result<api::Success<Deleted<rental::Id>>, Error> {
    service
        .execute(command::DeleteRental { rental_id: id })
        .await
        .map_err(AsError::into_error)
        .map(|()| api::Success::ok(Deleted { id }, "Rental deleted"))
}

impl AsError for command::update_rental::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::RentalNotExists(_) => Some(api::NotFoundError::Rental.into()),
        }
    }
}

impl AsError for command::delete_rental::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::RentalNotExists(_) => Some(api::NotFoundError::Rental.into()),
        }
    }
}

#[cfg(test)]
mod spec {
    use service::{command, read::rental::list};

    use super::{CreateRequest, ListParams, UpdateRequest};

    #[test]
    fn requires_address_and_coordinates() {
        let req: CreateRequest = serde_json::from_value(serde_json::json!({
            "address": "台北市信義區信義路五段7號",
            "lng": 121.5654,
        }))
        .unwrap();

        let err = command::CreateRental::try_from(req).unwrap_err();

        assert_eq!(err.message, "Missing required fields: lat");
    }

    #[test]
    fn rejects_out_of_range_values() {
        let req: CreateRequest = serde_json::from_value(serde_json::json!({
            "address": "somewhere",
            "lat": 95.0,
            "lng": 121.5,
            "landlord_rating": 6,
        }))
        .unwrap();

        let err = command::CreateRental::try_from(req).unwrap_err();

        assert_eq!(err.message, "Invalid fields: lat, landlord_rating");
    }

    #[test]
    fn normalizes_facilities_and_blank_texts() {
        let req: CreateRequest = serde_json::from_value(serde_json::json!({
            "address": "somewhere",
            "lat": 25.0,
            "lng": 121.5,
            "facilities": " 冷氣, ,網路",
            "description": "   ",
        }))
        .unwrap();

        let cmd = command::CreateRental::try_from(req).unwrap();

        assert_eq!(cmd.facilities.unwrap().to_string(), "冷氣,網路");
        assert!(cmd.description.is_none());
    }

    #[test]
    fn distinguishes_cleared_and_untouched_fields() {
        let req: UpdateRequest = serde_json::from_value(serde_json::json!({
            "description": null,
            "rent_price": 12000,
        }))
        .unwrap();

        let patch = service::domain::rental::Patch::try_from(req).unwrap();

        assert!(patch.address.is_none());
        assert!(matches!(patch.description, Some(None)));
        assert!(matches!(patch.rent_price, Some(Some(_))));
        assert!(patch.room_type.is_none());
    }

    #[test]
    fn builds_selector_leniently() {
        let selector = list::Selector::from(ListParams {
            page: Some(2),
            limit: Some(500),
            sort: Some("nonsense".into()),
            order: Some("ASC".into()),
        });

        assert_eq!(selector.arguments.limit(), 100);
        assert_eq!(selector.arguments.offset(), 100);
        assert_eq!(selector.sort, list::Sort::CreatedAt);
        assert_eq!(selector.order, common::pagination::Order::Ascending);
    }
}
