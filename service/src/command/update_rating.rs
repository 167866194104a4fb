//! [`Command`] for partially updating a [`Rating`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{rating, rental, Rating, Rental},
    infra::{database, Database},
    Service,
};

use super::{recompute_rental_rating::recompute_in, Command};

/// [`Command`] for partially updating a [`Rating`] of a [`Rental`].
#[derive(Clone, Debug)]
pub struct UpdateRating {
    /// ID of the [`Rental`] the [`Rating`] belongs to.
    pub rental_id: rental::Id,

    /// ID of the [`Rating`] to update.
    pub rating_id: rating::Id,

    /// [`rating::Patch`] to apply.
    pub patch: rating::Patch,
}

impl<Db, Geo> Command<UpdateRating> for Service<Db, Geo>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Rating>, (rental::Id, rating::Id)>>,
            Ok = Option<Rating>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Rental>, rental::Id>>,
            Ok = Option<Rental>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Rating>, rental::Id>>,
            Ok = Vec<Rating>,
            Err = Traced<database::Error>,
        > + Database<Update<Rating>, Err = Traced<database::Error>>
        + Database<Update<Rental>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Rating;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateRating) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateRating {
            rental_id,
            rating_id,
            patch,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut rating = tx
            .execute(Select(By::<Option<Rating>, _>::new((
                rental_id, rating_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RatingNotExists(rating_id))
            .map_err(tracerr::wrap!())?;

        patch.apply(&mut rating);
        rating.updated_at = DateTime::now().coerce();

        tx.execute(Update(rating.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        _ = recompute_in(&tx, rental_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(rating)
    }
}

/// Error of [`UpdateRating`] [`Command`] execution.
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
