//! [`Tx`] client definitions.

use std::{fmt, sync::Arc};

use sqlx::{Sqlite, SqlitePool, Transaction};
use tokio::sync::Mutex;
use tracerr::Traced;

use crate::infra::database::{
    self,
    sqlite::{
        self,
        connection::{Query, Row},
        Connection,
    },
};

/// Transactional SQLite database client.
///
/// Rolls back the transaction once the last clone is dropped without being
/// [committed](Tx::commit).
#[derive(Clone)]
pub struct Tx {
    /// Started transaction, if it hasn't been committed yet.
    inner: Arc<Mutex<Option<Transaction<'static, Sqlite>>>>,
}

impl fmt::Debug for Tx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tx").finish_non_exhaustive()
    }
}

impl Tx {
    /// Starts a new [`Tx`] on a connection acquired from the provided
    /// [`SqlitePool`].
    ///
    /// # Errors
    ///
    /// If failed to start a transaction.
    pub(crate) async fn begin(
        pool: &SqlitePool,
    ) -> Result<Self, Traced<database::Error>> {
        let tx = pool
            .begin()
            .await
            .map_err(tracerr::from_and_wrap!(=> sqlite::Error))
            .map_err(tracerr::map_from)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(Some(tx))),
        })
    }

    /// Commits this [`Tx`] client.
    ///
    /// # Errors
    ///
    /// If failed to commit transaction of this [`Tx`] client.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let Some(tx) = self.inner.lock().await.take() else {
            // Already committed, so nothing to do.
            return Ok(());
        };
        tx.commit()
            .await
            .map_err(tracerr::from_and_wrap!(=> sqlite::Error))
            .map_err(tracerr::map_from)
    }
}

impl Connection for Tx {
    async fn fetch_all<'q>(
        &self,
        query: Query<'q>,
    ) -> Result<Vec<Row>, Traced<database::Error>> {
        let mut guard = self.inner.lock().await;
        let tx = guard
            .as_mut()
            .ok_or(sqlite::Error::TransactionFinished)
            .map_err(tracerr::wrap!())
            .map_err(tracerr::map_from)?;
        query
            .fetch_all(&mut **tx)
            .await
            .map_err(tracerr::from_and_wrap!(=> sqlite::Error))
            .map_err(tracerr::map_from)
    }

    async fn fetch_optional<'q>(
        &self,
        query: Query<'q>,
    ) -> Result<Option<Row>, Traced<database::Error>> {
        let mut guard = self.inner.lock().await;
        let tx = guard
            .as_mut()
            .ok_or(sqlite::Error::TransactionFinished)
            .map_err(tracerr::wrap!())
            .map_err(tracerr::map_from)?;
        query
            .fetch_optional(&mut **tx)
            .await
            .map_err(tracerr::from_and_wrap!(=> sqlite::Error))
            .map_err(tracerr::map_from)
    }

    async fn exec<'q>(
        &self,
        query: Query<'q>,
    ) -> Result<u64, Traced<database::Error>> {
        let mut guard = self.inner.lock().await;
        let tx = guard
            .as_mut()
            .ok_or(sqlite::Error::TransactionFinished)
            .map_err(tracerr::wrap!())
            .map_err(tracerr::map_from)?;
        query
            .execute(&mut **tx)
            .await
            .map(|r| r.rows_affected())
            .map_err(tracerr::from_and_wrap!(=> sqlite::Error))
            .map_err(tracerr::map_from)
    }
}
