//! [`Command`] for rating a [`Rental`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        rating::{self, OverallRating, Score},
        rental, Rating, Rental,
    },
    infra::{database, Database},
    Service,
};

use super::{recompute_rental_rating::recompute_in, Command};

/// [`Command`] for rating a [`Rental`].
///
/// The cached ratings of the [`Rental`] are recomputed within the same
/// transaction.
#[derive(Clone, Debug)]
pub struct CreateRating {
    /// ID of the [`Rental`] to rate.
    pub rental_id: rental::Id,

    /// [`rating::UserName`] of the reviewer.
    pub user_name: Option<rating::UserName>,

    /// Landlord [`Score`].
    pub landlord_rating: Score,

    /// Location [`Score`].
    pub location_rating: Score,

    /// Value-for-money [`Score`].
    pub value_rating: Score,

    /// [`rating::Comment`] of the reviewer.
    pub comment: Option<rating::Comment>,
}

/// Output of [`CreateRating`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Created [`Rating`].
    pub rating: Rating,

    /// Rated [`Rental`] with its recomputed ratings.
    pub rental: Rental,
}

impl<Db, Geo> Command<CreateRating> for Service<Db, Geo>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Rental>, rental::Id>>,
            Ok = Option<Rental>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Rating>, rental::Id>>,
            Ok = Vec<Rating>,
            Err = Traced<database::Error>,
        > + Database<
            Insert<rating::New>,
            Ok = Rating,
            Err = Traced<database::Error>,
        > + Database<Update<Rental>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateRating) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateRating {
            rental_id,
            user_name,
            landlord_rating,
            location_rating,
            value_rating,
            comment,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let exists = tx
            .execute(Select(By::<Option<Rental>, _>::new(rental_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .is_some();
        if !exists {
            return Err(tracerr::new!(E::RentalNotExists(rental_id)));
        }

        let rating = tx
            .execute(Insert(rating::New {
                rental_id,
                user_name,
                landlord_rating,
                location_rating,
                value_rating,
                overall_rating: OverallRating::of(
                    landlord_rating,
                    location_rating,
                    value_rating,
                ),
                comment,
                created_at: DateTime::now().coerce(),
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let rental = recompute_in(&tx, rental_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RentalNotExists(rental_id))
            .map_err(tracerr::wrap!())?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(Output { rating, rental })
    }
}

/// Error of [`CreateRating`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Rental`] with the provided ID does not exist.
    #[display("`Rental(id: {_0})` does not exist")]
    RentalNotExists(#[error(not(source))] rental::Id),
}
