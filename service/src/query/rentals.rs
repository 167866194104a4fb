//! [`Query`] collection related to the multiple [`Rental`]s.

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::{domain::Rental, Query};

use super::DatabaseQuery;

/// Queries a [`Page`] of [`Rental`]s.
///
/// [`Page`]: read::rental::list::Page
pub type List =
    DatabaseQuery<By<read::rental::list::Page, read::rental::list::Selector>>;
