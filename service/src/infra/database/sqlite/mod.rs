//! SQLite [`Database`] implementation.

pub mod client;
pub mod connection;
mod impls;

use std::{path::Path, str::FromStr as _};

use derive_more::{Deref, Display, Error as StdError, From};
use sqlx::{
    migrate::MigrateError,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracerr::Traced;

use crate::infra::database;
#[cfg(doc)]
use crate::infra::Database;

pub use self::{
    client::{NonTx, Tx},
    connection::Connection,
};

/// SQLite [`Database`] client.
#[derive(Clone, Debug, Deref)]
pub struct Sqlite<T = NonTx>(T);

impl Sqlite {
    /// Path designating an in-memory [`Sqlite`] database.
    pub const IN_MEMORY: &'static str = ":memory:";

    /// Opens a new [`Sqlite`] database file located at the provided `path`,
    /// creating it if it doesn't exist.
    ///
    /// All the operations are serialized through a single connection.
    ///
    /// # Errors
    ///
    /// If failed to open the database.
    pub async fn new(
        path: impl AsRef<Path>,
    ) -> Result<Self, Traced<database::Error>> {
        let path = path.as_ref();
        let options = if path == Path::new(Self::IN_MEMORY) {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(tracerr::from_and_wrap!(=> Error))
                .map_err(tracerr::map_from)?
        } else {
            SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
        }
        .foreign_keys(true);

        // In-memory database lives only as long as its connection does.
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        Ok(Self(NonTx::from_pool(pool)))
    }

    /// Applies all the pending migrations to this [`Sqlite`] database.
    ///
    /// # Errors
    ///
    /// If any of the migrations fails.
    pub async fn migrate(&self) -> Result<(), Traced<database::Error>> {
        sqlx::migrate!("../migrations")
            .run(&self.0.pool)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }

    /// Closes this [`Sqlite`] database, waiting for the in-flight operations
    /// to finish.
    pub async fn close(&self) {
        self.0.pool.close().await;
    }
}

/// SQLite database [`Error`].
#[derive(Debug, Display, StdError, From)]
pub enum Error {
    /// [`Connection`] error.
    #[display("`Connection` error: {_0}")]
    Connection(connection::Error),

    /// Error of applying migrations.
    #[display("Failed to migrate: {_0}")]
    Migration(MigrateError),

    /// [`Tx`] has been already committed.
    #[display("Transaction is already finished")]
    #[from(ignore)]
    TransactionFinished,
}
