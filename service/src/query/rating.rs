//! [`Query`] collection related to a single [`Rating`].

use common::operations::By;

use crate::domain::{rating, rental, Rating};
#[cfg(doc)]
use crate::{domain::Rental, Query};

use super::DatabaseQuery;

/// Queries a [`Rating`] by its [`rating::Id`] under the [`Rental`] with the
/// provided [`rental::Id`].
pub type ById = DatabaseQuery<By<Option<Rating>, (rental::Id, rating::Id)>>;
