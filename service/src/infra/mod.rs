//! Infrastructure layer.

pub mod database;
pub mod geocoder;

pub use self::{
    database::Database,
    geocoder::{Geocoder, Nominatim},
};
#[cfg(feature = "sqlite")]
pub use self::database::{sqlite, Sqlite};
