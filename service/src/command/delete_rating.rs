//! [`Command`] for deleting a [`Rating`].

use common::operations::{
    By, Commit, Delete, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{rating, rental, Rating, Rental},
    infra::{database, Database},
    Service,
};

use super::{recompute_rental_rating::recompute_in, Command};

/// [`Command`] for deleting a [`Rating`] of a [`Rental`].
///
/// Recomputing the [`Rental`] ratings after its last [`Rating`] is deleted
/// leaves its cached ratings as they were.
#[derive(Clone, Copy, Debug)]
pub struct DeleteRating {
    /// ID of the [`Rental`] the [`Rating`] belongs to.
    pub rental_id: rental::Id,

    /// ID of the [`Rating`] to delete.
    pub rating_id: rating::Id,
}

impl<Db, Geo> Command<DeleteRating> for Service<Db, Geo>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Rating>, (rental::Id, rating::Id)>>,
            Ok = Option<Rating>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Rating, rating::Id>>,
            Ok = bool,
            Err = Traced<database::Error>,
        > + Database<
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
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteRating) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteRating {
            rental_id,
            rating_id,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let exists = tx
            .execute(Select(By::<Option<Rating>, _>::new((
                rental_id, rating_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .is_some();
        if !exists {
            return Err(tracerr::new!(E::RatingNotExists(rating_id)));
        }

        _ = tx
            .execute(Delete(By::<Rating, _>::new(rating_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        _ = recompute_in(&tx, rental_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(())
    }
}

/// Error of [`DeleteRating`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Rating`] with the provided ID does not exist for the [`Rental`].
    #[display("`Rating(id: {_0})` does not exist")]
    RatingNotExists(#[error(not(source))] rating::Id),
}
