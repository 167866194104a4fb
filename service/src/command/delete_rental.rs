//! [`Command`] for deleting a [`Rental`] along with its [`Rating`]s.

use common::operations::{
    By, Commit, Delete, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{rental, Rating, Rental},
    infra::{database, Database},
    Service,
};

use super::{recompute_rental_rating::recompute_in, Command};

/// [`Command`] for deleting a [`Rental`] along with all its [`Rating`]s.
#[derive(Clone, Copy, Debug)]
pub struct DeleteRental {
    /// ID of the [`Rental`] to delete.
    pub rental_id: rental::Id,
}

impl<Db, Geo> Command<DeleteRental> for Service<Db, Geo>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Delete<By<Vec<Rating>, rental::Id>>,
            Ok = u64,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Rental, rental::Id>>,
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

    async fn execute(&self, cmd: DeleteRental) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteRental { rental_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let ratings = tx
            .execute(Delete(By::<Vec<Rating>, _>::new(rental_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // No `Rating`s are left, so the cached ones stay untouched.
        _ = recompute_in(&tx, rental_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let existed = tx
            .execute(Delete(By::<Rental, _>::new(rental_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !existed {
            return Err(tracerr::new!(E::RentalNotExists(rental_id)));
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tracing::debug!(%rental_id, ratings, "deleted `Rental`");

        Ok(())
    }
}

/// Error of [`DeleteRental`] [`Command`] execution.
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
