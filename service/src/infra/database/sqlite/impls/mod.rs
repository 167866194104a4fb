//! [`Database`] implementations.

#![allow(
    clippy::items_after_statements,
    reason = "`const SQL` after statements"
)]

mod rating;
mod rental;

use common::operations::{Commit, Transact};
use tracerr::Traced;

use crate::infra::{database, Database};

use super::{NonTx, Sqlite, Tx};

impl Database<Transact> for Sqlite<NonTx> {
    type Ok = Sqlite<Tx>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Tx::begin(&self.0.pool)
            .await
            .map(Sqlite)
            .map_err(tracerr::wrap!())
    }
}

impl Database<Transact> for Sqlite<Tx> {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Sqlite<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        self.commit().await.map_err(tracerr::wrap!())
    }
}
