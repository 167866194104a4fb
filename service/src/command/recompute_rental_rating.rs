//! [`Command`] for recomputing the cached ratings of a [`Rental`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{rental, Rating, Rental},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for recomputing the cached ratings of a [`Rental`] out of all
/// its [`Rating`]s.
#[derive(Clone, Copy, Debug)]
pub struct RecomputeRentalRating {
    /// ID of the [`Rental`] to recompute ratings of.
    pub rental_id: rental::Id,
}

impl<Db, Geo> Command<RecomputeRentalRating> for Service<Db, Geo>
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
        > + Database<Update<Rental>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Rental;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RecomputeRentalRating,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RecomputeRentalRating { rental_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
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

        Ok(rental)
    }
}

/// Recomputes the cached ratings of the [`Rental`] with the provided ID
/// within the provided transaction.
///
/// Leaves the [`Rental`] untouched if it has no [`Rating`]s. Returns [`None`]
/// if the [`Rental`] doesn't exist.
pub(crate) async fn recompute_in<Tx>(
    tx: &Tx,
    rental_id: rental::Id,
) -> Result<Option<Rental>, Traced<database::Error>>
where
    Tx: Database<
            Select<By<Option<Rental>, rental::Id>>,
            Ok = Option<Rental>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Rating>, rental::Id>>,
            Ok = Vec<Rating>,
            Err = Traced<database::Error>,
        > + Database<Update<Rental>, Err = Traced<database::Error>>,
{
    let Some(mut rental) = tx
        .execute(Select(By::<Option<Rental>, _>::new(rental_id)))
        .await
        .map_err(tracerr::wrap!())?
    else {
        return Ok(None);
    };

    let ratings = tx
        .execute(Select(By::<Vec<Rating>, _>::new(rental_id)))
        .await
        .map_err(tracerr::wrap!())?;

    if let Some(aggregate) = rental::Aggregate::of(&ratings) {
        rental.apply_aggregate(aggregate);
        rental.updated_at = DateTime::now().coerce();

        tx.execute(Update(rental.clone()))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;
    }

    Ok(Some(rental))
}

/// Error of [`RecomputeRentalRating`] [`Command`] execution.
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
