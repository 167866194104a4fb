//! [`Command`] for partially updating a [`Rental`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{rental, Rental},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for partially updating a [`Rental`].
#[derive(Clone, Debug)]
pub struct UpdateRental {
    /// ID of the [`Rental`] to update.
    pub rental_id: rental::Id,

    /// [`rental::Patch`] to apply.
    pub patch: rental::Patch,
}

impl<Db, Geo> Command<UpdateRental> for Service<Db, Geo>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Rental>, rental::Id>>,
            Ok = Option<Rental>,
            Err = Traced<database::Error>,
        > + Database<Update<Rental>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Rental;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateRental) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateRental { rental_id, patch } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut rental = tx
            .execute(Select(By::<Option<Rental>, _>::new(rental_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RentalNotExists(rental_id))
            .map_err(tracerr::wrap!())?;

        patch.apply(&mut rental);
        rental.updated_at = DateTime::now().coerce();

        tx.execute(Update(rental.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(rental)
    }
}

/// Error of [`UpdateRental`] [`Command`] execution.
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
