//! [`NonTx`] client definitions.

use sqlx::SqlitePool;
use tracerr::Traced;

use crate::infra::database::{
    self,
    sqlite::{
        self,
        connection::{Query, Row},
        Connection,
    },
};

/// Non-transactional SQLite database client.
#[derive(Clone, Debug)]
pub struct NonTx {
    /// [`SqlitePool`] to acquire connections from.
    pub(crate) pool: SqlitePool,
}

impl NonTx {
    /// Creates a new [`NonTx`] client from the provided [`SqlitePool`].
    #[must_use]
    pub(crate) fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl Connection for NonTx {
    async fn fetch_all<'q>(
        &self,
        query: Query<'q>,
    ) -> Result<Vec<Row>, Traced<database::Error>> {
        query
            .fetch_all(&self.pool)
            .await
            .map_err(tracerr::from_and_wrap!(=> sqlite::Error))
            .map_err(tracerr::map_from)
    }

    async fn fetch_optional<'q>(
        &self,
        query: Query<'q>,
    ) -> Result<Option<Row>, Traced<database::Error>> {
        query
            .fetch_optional(&self.pool)
            .await
            .map_err(tracerr::from_and_wrap!(=> sqlite::Error))
            .map_err(tracerr::map_from)
    }

    async fn exec<'q>(
        &self,
        query: Query<'q>,
    ) -> Result<u64, Traced<database::Error>> {
        query
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected())
            .map_err(tracerr::from_and_wrap!(=> sqlite::Error))
            .map_err(tracerr::map_from)
    }
}
