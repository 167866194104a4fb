//! [`Connection`] definitions.

use std::future::Future;

use sqlx::{sqlite::SqliteArguments, Sqlite};
use tracerr::Traced;

use crate::infra::database;

pub use sqlx::{sqlite::SqliteRow as Row, Error};

/// Prepared SQL query with its bound arguments.
pub type Query<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// Generic database connection.
pub trait Connection {
    /// Executes the provided [`Query`] and returns all the resulting rows.
    ///
    /// # Errors
    ///
    /// If failed to execute the [`Query`].
    fn fetch_all<'q>(
        &self,
        query: Query<'q>,
    ) -> impl Future<Output = Result<Vec<Row>, Traced<database::Error>>>;

    /// Executes the provided [`Query`] and returns the optional first
    /// resulting row.
    ///
    /// # Errors
    ///
    /// If failed to execute the [`Query`].
    fn fetch_optional<'q>(
        &self,
        query: Query<'q>,
    ) -> impl Future<Output = Result<Option<Row>, Traced<database::Error>>>;

    /// Executes the provided [`Query`] and returns the number of affected
    /// rows.
    ///
    /// # Errors
    ///
    /// If failed to execute the [`Query`].
    fn exec<'q>(
        &self,
        query: Query<'q>,
    ) -> impl Future<Output = Result<u64, Traced<database::Error>>>;
}
