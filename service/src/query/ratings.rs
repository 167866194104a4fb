//! [`Query`] collection related to the multiple [`Rating`]s.

use common::operations::By;

use crate::domain::{rental, Rating};
#[cfg(doc)]
use crate::{domain::Rental, Query};

use super::DatabaseQuery;

/// Queries all [`Rating`]s of a [`Rental`], the newest first.
pub type ByRental = DatabaseQuery<By<Vec<Rating>, rental::Id>>;
