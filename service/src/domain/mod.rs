//! Domain definitions.

/// Defines a validated text newtype.
///
/// Valid values are non-empty, contain no leading or trailing whitespace, and
/// are at most `max_len` characters long.
macro_rules! define_text {
    ($(#[$meta:meta])* $name:ident, max_len = $max:literal) => {
        $(#[$meta])*
        #[derive(
            ::derive_more::AsRef,
            Clone,
            Debug,
            ::derive_more::Display,
            Eq,
            Hash,
            PartialEq,
            ::serde::Serialize,
        )]
        #[cfg_attr(
            feature = "sqlite",
            derive(::sqlx::Type),
            sqlx(transparent)
        )]
        #[as_ref(forward)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!(
                "Maximum number of characters in a [`", stringify!($name), "`]."
            )]
            pub const MAX_LEN: usize = $max;

            #[doc = concat!(
                "Creates a new [`", stringify!($name), "`] if the given ",
                "`value` is valid."
            )]
            #[must_use]
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let value = value.into();
                Self::check(&value).then_some(Self(value))
            }

            #[doc = concat!(
                "Checks whether the given `value` is a valid [`",
                stringify!($name), "`]."
            )]
            fn check(value: impl AsRef<str>) -> bool {
                let value = value.as_ref();
                value.trim() == value
                    && !value.is_empty()
                    && value.chars().count() <= Self::MAX_LEN
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = &'static str;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s).ok_or(concat!("invalid `", stringify!($name), "`"))
            }
        }
    };
}

pub mod geocoding;
pub mod rating;
pub mod rental;

pub use self::{rating::Rating, rental::Rental};
