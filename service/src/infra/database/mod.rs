//! [`Database`]-related implementations.

#[cfg(feature = "sqlite")]
pub mod sqlite;

use derive_more::{Display, Error as StdError, From};

#[cfg(feature = "sqlite")]
pub use self::sqlite::Sqlite;

/// Database operation.
pub use common::Handler as Database;

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "sqlite")]
    /// [`Sqlite`] error.
    Sqlite(sqlite::Error),
}
