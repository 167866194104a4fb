//! [`Command`] for creating a new [`Rental`].

use common::{operations::Insert, DateTime};
use tracerr::Traced;

use crate::{
    domain::{
        rating::{OverallRating, Score},
        rental::{self, Rental},
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Rental`].
///
/// [`Rental::overall_rating`] is computed only when all three sub-ratings are
/// provided.
#[derive(Clone, Debug)]
pub struct CreateRental {
    /// [`rental::Address`] of the new [`Rental`].
    pub address: rental::Address,

    /// [`rental::DescriptiveAddress`] of the new [`Rental`].
    pub descriptive_address: Option<rental::DescriptiveAddress>,

    /// [`rental::Latitude`] of the new [`Rental`].
    pub lat: rental::Latitude,

    /// [`rental::Longitude`] of the new [`Rental`].
    pub lng: rental::Longitude,

    /// [`rental::Description`] of the new [`Rental`].
    pub description: Option<rental::Description>,

    /// [`rental::RentPrice`] of the new [`Rental`].
    pub rent_price: Option<rental::RentPrice>,

    /// [`rental::RoomType`] of the new [`Rental`].
    pub room_type: Option<rental::RoomType>,

    /// [`rental::AreaSize`] of the new [`Rental`].
    pub area_size: Option<rental::AreaSize>,

    /// [`rental::Facilities`] of the new [`Rental`].
    pub facilities: Option<rental::Facilities>,

    /// Initial landlord [`Score`].
    pub landlord_rating: Option<Score>,

    /// Initial location [`Score`].
    pub location_rating: Option<Score>,

    /// Initial value-for-money [`Score`].
    pub value_rating: Option<Score>,
}

impl From<CreateRental> for rental::New {
    fn from(cmd: CreateRental) -> Self {
        let CreateRental {
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
        } = cmd;

        let overall_rating = landlord_rating
            .zip(location_rating)
            .zip(value_rating)
            .map(|((l, loc), v)| OverallRating::of(l, loc, v));

        Self {
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
            created_at: DateTime::now().coerce(),
        }
    }
}

impl<Db, Geo> Command<CreateRental> for Service<Db, Geo>
where
    Db: Database<
        Insert<rental::New>,
        Ok = Rental,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Rental;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateRental) -> Result<Self::Ok, Self::Err> {
        self.database()
            .execute(Insert(rental::New::from(cmd)))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`CreateRental`] [`Command`] execution.
pub type ExecutionError = database::Error;
