//! Geocoding-related read definitions.

use crate::domain::geocoding::{Address, Location};

/// Outcome of geocoding an [`Address`].
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// [`Address`] has been resolved into a [`Location`].
    Found {
        /// [`Address`] originally requested to be geocoded.
        original: Address,

        /// [`Address`] variant that actually resolved.
        ///
        /// Differs from the `original` one if it has been simplified.
        matched: Address,

        /// Resolved [`Location`].
        location: Location,
    },

    /// Neither the [`Address`] nor any of its simplifications resolved.
    NotFound,
}
