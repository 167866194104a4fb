//! [`Handler`] abstractions.

use std::future::Future;

/// Anything executable with some `Args`: commands, queries, database and
/// geocoder operations.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided `args`.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
