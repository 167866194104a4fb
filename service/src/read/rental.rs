//! [`Rental`]-related read definitions.

use derive_more::{From, Into};

#[cfg(doc)]
use crate::domain::Rental;

/// Total number of stored [`Rental`]s.
#[derive(Clone, Copy, Debug, Default, Eq, From, Hash, Into, PartialEq)]
pub struct TotalCount(u64);

impl TotalCount {
    /// Indicates whether there are no [`Rental`]s stored at all.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

pub mod list {
    //! [`Rental`] list definitions.

    use common::define_pagination;
    use strum::{AsRefStr, EnumString};

    use crate::domain::Rental;

    define_pagination!(Sort, Node, Filter);

    /// Node in a [`Page`].
    pub type Node = Rental;

    /// Filter for [`Selector`].
    ///
    /// [`Rental`] lists are not filtered.
    pub type Filter = ();

    /// Field a [`Rental`] list is sorted by.
    #[derive(
        AsRefStr, Clone, Copy, Debug, Default, EnumString, Eq, Hash, PartialEq,
    )]
    #[strum(serialize_all = "snake_case")]
    pub enum Sort {
        /// By [`Rental::created_at`].
        #[default]
        CreatedAt,

        /// By [`Rental::updated_at`].
        UpdatedAt,

        /// By [`Rental::rent_price`].
        RentPrice,

        /// By [`Rental::overall_rating`].
        OverallRating,

        /// By [`Rental::address`].
        Address,
    }

    impl Sort {
        /// Parses a [`Sort`] leniently, falling back to [`Sort::CreatedAt`]
        /// for unknown fields.
        #[must_use]
        pub fn parse_lenient(s: &str) -> Self {
            s.trim().parse().unwrap_or_default()
        }

        /// Returns the column this [`Sort`] orders by.
        #[must_use]
        pub fn column(&self) -> &'static str {
            match self {
                Self::CreatedAt => "created_at",
                Self::UpdatedAt => "updated_at",
                Self::RentPrice => "rent_price",
                Self::OverallRating => "overall_rating",
                Self::Address => "address",
            }
        }
    }

    #[cfg(test)]
    mod spec {
        use super::Sort;

        #[test]
        fn parses_allowed_fields() {
            assert_eq!(Sort::parse_lenient("rent_price"), Sort::RentPrice);
            assert_eq!(
                Sort::parse_lenient("overall_rating"),
                Sort::OverallRating,
            );
            assert_eq!(Sort::parse_lenient("address"), Sort::Address);
            assert_eq!(Sort::RentPrice.as_ref(), "rent_price");
        }

        #[test]
        fn falls_back_to_creation_date() {
            assert_eq!(Sort::parse_lenient("id; DROP TABLE"), Sort::CreatedAt);
            assert_eq!(Sort::parse_lenient(""), Sort::CreatedAt);
        }
    }
}
