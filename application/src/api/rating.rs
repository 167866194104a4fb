//! [`Rating`]-related REST API definitions.

use axum::Extension;
use serde::{Deserialize, Serialize};
use service::{
    command, domain,
    domain::{
        rating::{self, OverallRating, Score},
        rental,
    },
    query, Command as _,
};

use crate::{
    api::{
        self,
        rental::{Created, Deleted},
    },
    AsError, Error, Service,
};

/// Single reviewer's rating of a rental.
#[derive(Clone, Debug, Serialize)]
pub struct Rating {
    /// ID of this [`Rating`].
    pub id: rating::Id,

    /// ID of the rated rental.
    pub rental_id: rental::Id,

    /// Display name of the reviewer.
    pub user_name: Option<rating::UserName>,

    /// Landlord score.
    pub landlord_rating: Score,

    /// Location score.
    pub location_rating: Score,

    /// Value-for-money score.
    pub value_rating: Score,

    /// Mean of the three scores.
    pub overall_rating: OverallRating,

    /// Comment of the reviewer.
    pub comment: Option<rating::Comment>,

    /// When this [`Rating`] was created.
    pub created_at: rating::CreationDateTime,

    /// When this [`Rating`] was modified the last time.
    pub updated_at: rating::ModificationDateTime,
}

impl From<domain::Rating> for Rating {
    fn from(rating: domain::Rating) -> Self {
        let domain::Rating {
            id,
            rental_id,
            user_name,
            landlord_rating,
            location_rating,
            value_rating,
            overall_rating,
            comment,
            created_at,
            updated_at,
        } = rating;

        Self {
            id,
            rental_id,
            user_name,
            landlord_rating,
            location_rating,
            value_rating,
            overall_rating,
            comment,
            created_at,
            updated_at,
        }
    }
}

/// Body of a [`Rating`] creation request.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateRequest {
    /// Display name of the reviewer.
    pub user_name: Option<String>,

    /// Landlord score.
    pub landlord_rating: Option<i64>,

    /// Location score.
    pub location_rating: Option<i64>,

    /// Value-for-money score.
    pub value_rating: Option<i64>,

    /// Comment of the reviewer.
    pub comment: Option<String>,
}

impl CreateRequest {
    /// Validates this [`CreateRequest`] into a [`command::CreateRating`] of
    /// the rental with the provided ID.
    ///
    /// # Errors
    ///
    /// If any of the scores is missing or invalid.
    pub fn into_command(
        self,
        rental_id: rental::Id,
    ) -> Result<command::CreateRating, Error> {
        self.validate(api::Validator::default(), Some(rental_id))
    }

    /// Validates this [`CreateRequest`] along with the already validated
    /// `rental_id`, reporting all the problems via the provided
    /// [`api::Validator`].
    fn validate(
        self,
        mut v: api::Validator,
        rental_id: Option<rental::Id>,
    ) -> Result<command::CreateRating, Error> {
        let Self {
            user_name,
            landlord_rating,
            location_rating,
            value_rating,
            comment,
        } = self;

        let landlord_rating =
            v.require("landlord_rating", landlord_rating, Score::new);
        let location_rating =
            v.require("location_rating", location_rating, Score::new);
        let value_rating = v.require("value_rating", value_rating, Score::new);
        let user_name = v.text("user_name", user_name, rating::UserName::new);
        let comment = v.text("comment", comment, rating::Comment::new);

        let (((rental_id, landlord_rating), location_rating), value_rating) =
            v.finish(
                rental_id
                    .zip(landlord_rating)
                    .zip(location_rating)
                    .zip(value_rating),
            )?;

        Ok(command::CreateRating {
            rental_id,
            user_name,
            landlord_rating,
            location_rating,
            value_rating,
            comment,
        })
    }
}

/// Body of a [`Rating`] creation request carrying the rental ID.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct LegacyCreateRequest {
    /// ID of the rental to rate.
    pub rental_id: Option<rental::Id>,

    /// Rest of the request.
    #[serde(flatten)]
    pub rating: CreateRequest,
}

/// Body of a [`Rating`] partial update request.
///
/// Absent fields are left unchanged, while `null` ones are cleared.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateRequest {
    /// Display name of the reviewer.
    #[serde(deserialize_with = "api::nullable")]
    pub user_name: Option<Option<String>>,

    /// Landlord score.
    pub landlord_rating: Option<i64>,

    /// Location score.
    pub location_rating: Option<i64>,

    /// Value-for-money score.
    pub value_rating: Option<i64>,

    /// Comment of the reviewer.
    #[serde(deserialize_with = "api::nullable")]
    pub comment: Option<Option<String>>,
}

impl TryFrom<UpdateRequest> for rating::Patch {
    type Error = Error;

    fn try_from(req: UpdateRequest) -> Result<Self, Self::Error> {
        let UpdateRequest {
            user_name,
            landlord_rating,
            location_rating,
            value_rating,
            comment,
        } = req;

        let mut v = api::Validator::default();
        let patch = Self {
            user_name: v.nullable_text(
                "user_name",
                user_name,
                rating::UserName::new,
            ),
            landlord_rating: v.optional(
                "landlord_rating",
                landlord_rating,
                Score::new,
            ),
            location_rating: v.optional(
                "location_rating",
                location_rating,
                Score::new,
            ),
            value_rating: v.optional("value_rating", value_rating, Score::new),
            comment: v.nullable_text("comment", comment, rating::Comment::new),
        };
        v.finish(Some(patch))
    }
}

/// Lists [`Rating`]s of a rental, newest first.
///
/// # Errors
///
/// If the storage fails.
#[tracing::instrument(skip_all, fields(rental.id = %rental_id))]
pub async fn list(
    Extension(service): Extension<Service>,
    api::Path(rental_id): api::Path<rental::Id>,
) -> Result<api::Success<Vec<Rating>>, Error> {
    service
        .execute(query::ratings::ByRental::by(rental_id))
        .await
        .map_err(AsError::into_error)
        .map(|ratings| {
            api::Success::ok(
                ratings.into_iter().map(Into::into).collect(),
                "Ratings fetched",
            )
        })
}

/// Fetches a single [`Rating`] of a rental.
///
/// # Errors
///
/// If the [`Rating`] doesn't exist, or the storage fails.
#[tracing::instrument(
    skip_all,
    fields(rental.id = %rental_id, rating.id = %rating_id),
)]
pub async fn get(
    Extension(service): Extension<Service>,
    api::Path((rental_id, rating_id)): api::Path<(rental::Id, rating::Id)>,
) -> Result<api::Success<Rating>, Error> {
    service
        .execute(query::rating::ById::by((rental_id, rating_id)))
        .await
        .map_err(AsError::into_error)?
        .ok_or_else(|| api::NotFoundError::Rating.into())
        .map(|r| api::Success::ok(r.into(), "Rating fetched"))
}

/// Rates a rental.
///
/// # Errors
///
/// If the request is invalid, the rental doesn't exist, or the storage
/// fails.
#[tracing::instrument(skip_all, fields(rental.id = %rental_id))]
pub async fn create(
    Extension(service): Extension<Service>,
    api::Path(rental_id): api::Path<rental::Id>,
    api::Json(req): api::Json<CreateRequest>,
) -> Result<api::Success<Created<rating::Id>>, Error> {
    execute_create(&service, req.into_command(rental_id)?).await
}

/// Rates a rental whose ID is provided in the request body.
///
/// # Errors
///
/// If the request is invalid, the rental doesn't exist, or the storage
/// fails.
#[tracing::instrument(skip_all, fields(rental.id = ?req.rental_id))]
pub async fn create_legacy(
    Extension(service): Extension<Service>,
    api::Json(req): api::Json<LegacyCreateRequest>,
) -> Result<api::Success<Created<rating::Id>>, Error> {
    let LegacyCreateRequest { rental_id, rating } = req;

    let mut v = api::Validator::default();
    let rental_id = v.require("rental_id", rental_id, Some);
    let cmd = rating.validate(v, rental_id)?;

    execute_create(&service, cmd).await
}

/// Executes the provided [`command::CreateRating`].
async fn execute_create(
    service: &Service,
    cmd: command::CreateRating,
) -> Result<api::Success<Created<rating::Id>>, Error> {
    let command::create_rating::Output { rating, rental } = service
        .execute(cmd)
        .await
        .map_err(AsError::into_error)?;

    tracing::info!(rating.id = %rating.id, "created `Rating`");

    Ok(api::Success::created(
        Created {
            id: rating.id,
            overall_rating: rental.overall_rating,
        },
        "Rating created",
    ))
}

/// Partially updates a [`Rating`] of a rental.
///
/// # Errors
///
/// If the request is invalid, the [`Rating`] doesn't exist, or the storage
/// fails.
#[tracing::instrument(
    skip_all,
    fields(rental.id = %rental_id, rating.id = %rating_id),
)]
pub async fn update(
    Extension(service): Extension<Service>,
    api::Path((rental_id, rating_id)): api::Path<(rental::Id, rating::Id)>,
    api::Json(req): api::Json<UpdateRequest>,
) -> Result<api::Success<Rating>, Error> {
    service
        .execute(command::UpdateRating {
            rental_id,
            rating_id,
            patch: req.try_into()?,
        })
        .await
        .map_err(AsError::into_error)
        .map(|r| api::Success::ok(r.into(), "Rating updated"))
}

/// Deletes a [`Rating`] of a rental.
///
/// # Errors
///
/// If the [`Rating`] doesn't exist, or the storage fails.
#[tracing::instrument(
    skip_all,
    fields(rental.id = %rental_id, rating.id = %rating_id),
)]
pub async fn delete(
    Extension(service): Extension<Service>,
    api::Path((rental_id, rating_id)): api::Path<(rental::Id, rating::Id)>,
) -> Result<api::Success<Deleted<rating::Id>>, Error> {
    service
        .execute(command::DeleteRating {
            rental_id,
            rating_id,
        })
        .await
        .map_err(AsError::into_error)
        .map(|()| api::Success::ok(Deleted { id: rating_id }, "Rating deleted"))
}

impl AsError for command::create_rating::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::RentalNotExists(_) => Some(api::NotFoundError::Rental.into()),
        }
    }
}

impl AsError for command::update_rating::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::RatingNotExists(_) => Some(api::NotFoundError::Rating.into()),
        }
    }
}

impl AsError for command::delete_rating::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::RatingNotExists(_) => Some(api::NotFoundError::Rating.into()),
        }
    }
}
