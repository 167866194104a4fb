//! Date and time utilities.

use std::{cmp::Ordering, marker::PhantomData};

use derive_more::{Debug, Display, Error};
use time::{format_description::well_known::Rfc3339, UtcOffset};

/// Untyped date and time.
pub type DateTime = DateTimeOf;

/// UTC date and time, tagged with the kind of moment it describes.
#[derive(Debug)]
pub struct DateTimeOf<Of: ?Sized = ()> {
    /// Inner representation of the date and time.
    inner: time::OffsetDateTime,

    /// Type parameter describing the kind of date and time.
    #[debug(skip)]
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> DateTimeOf<Of> {
    /// Creates a new [`DateTime`] representing the current date and time.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn now() -> Self {
        let inner = time::OffsetDateTime::now_utc();
        Self {
            _of: PhantomData,
            inner: inner
                .replace_microsecond(inner.microsecond())
                .expect("infallible"),
        }
    }

    /// Creates a new [`DateTime`] from the provided [RFC 3339] string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid [RFC 3339] date and time.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub fn from_rfc3339(input: &str) -> Result<Self, ParseError> {
        use ParseError as E;

        time::OffsetDateTime::parse(input, &Rfc3339)
            .map_err(E::Parse)?
            .try_into()
            .map_err(E::ComponentRange)
    }

    /// Returns the [`DateTime`] as an [RFC 3339] string.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.inner.format(&Rfc3339).unwrap_or_else(|e| {
            panic!("cannot format `DateTime` as RFC 3339: {e}")
        })
    }

    /// Coerces one kind of [`DateTime`] into another.
    #[must_use]
    pub fn coerce<NewOf: ?Sized>(self) -> DateTimeOf<NewOf> {
        DateTimeOf {
            inner: self.inner,
            _of: PhantomData,
        }
    }
}

/// Error of parsing [`DateTime`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum ParseError {
    /// Failed to parse the string into an [`DateTime`].
    Parse(time::error::Parse),

    /// Parsed [`DateTime`] has an out of range component.
    ComponentRange(time::error::ComponentRange),
}

impl<Of: ?Sized> Copy for DateTimeOf<Of> {}
impl<Of: ?Sized> Clone for DateTimeOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for DateTimeOf<Of> {}
impl<Of: ?Sized> PartialEq for DateTimeOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Of: ?Sized> Ord for DateTimeOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<Of: ?Sized> PartialOrd for DateTimeOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Of: ?Sized> TryFrom<time::OffsetDateTime> for DateTimeOf<Of> {
    type Error = time::error::ComponentRange;

    fn try_from(dt: time::OffsetDateTime) -> Result<Self, Self::Error> {
        dt.to_offset(UtcOffset::UTC)
            .replace_microsecond(dt.microsecond())
            .map(|inner| Self {
                inner,
                _of: PhantomData,
            })
    }
}

impl<Of: ?Sized> From<DateTimeOf<Of>> for time::OffsetDateTime {
    fn from(dt: DateTimeOf<Of>) -> Self {
        dt.inner
    }
}

#[cfg(feature = "sqlite")]
mod sqlite {
    //! Module providing integration with [`sqlx`] SQLite driver.

    use sqlx::{
        encode::IsNull,
        error::BoxDynError,
        sqlite::{SqliteTypeInfo, SqliteValueRef},
        Decode, Encode, Sqlite, Type,
    };

    use super::DateTimeOf;

    impl<Of: ?Sized> Type<Sqlite> for DateTimeOf<Of> {
        fn type_info() -> SqliteTypeInfo {
            <time::OffsetDateTime as Type<Sqlite>>::type_info()
        }

        fn compatible(ty: &SqliteTypeInfo) -> bool {
            <time::OffsetDateTime as Type<Sqlite>>::compatible(ty)
        }
    }

    impl<'q, Of: ?Sized> Encode<'q, Sqlite> for DateTimeOf<Of> {
        fn encode_by_ref(
            &self,
            buf: &mut <Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
        ) -> Result<IsNull, BoxDynError> {
            <time::OffsetDateTime as Encode<'q, Sqlite>>::encode_by_ref(
                &self.inner,
                buf,
            )
        }
    }

    impl<'r, Of: ?Sized> Decode<'r, Sqlite> for DateTimeOf<Of> {
        fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
            <time::OffsetDateTime as Decode<'r, Sqlite>>::decode(value)?
                .try_into()
                .map_err(Into::into)
        }
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.
    //!
    //! [`DateTimeOf`] is represented as an [RFC 3339] string.
    //!
    //! [RFC 3339]: https://tools.ietf.org/html/rfc3339

    use ::serde::{
        de::Error as _, Deserialize, Deserializer, Serialize, Serializer,
    };

    use super::DateTimeOf;

    impl<Of: ?Sized> Serialize for DateTimeOf<Of> {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(&self.to_rfc3339())
        }
    }

    impl<'de, Of: ?Sized> Deserialize<'de> for DateTimeOf<Of> {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            Self::from_rfc3339(&s).map_err(D::Error::custom)
        }
    }
}

#[cfg(test)]
mod spec {
    use super::DateTime;

    #[test]
    fn rfc3339_round_trip_keeps_microseconds() {
        let dt = DateTime::from_rfc3339("2024-05-01T10:20:30.123456Z").unwrap();

        assert_eq!(dt.to_rfc3339(), "2024-05-01T10:20:30.123456Z");
    }

    #[test]
    fn normalizes_offset_to_utc() {
        let taipei = DateTime::from_rfc3339("2024-05-01T18:00:00+08:00").unwrap();
        let utc = DateTime::from_rfc3339("2024-05-01T10:00:00Z").unwrap();

        assert_eq!(taipei, utc);
        assert_eq!(taipei.to_rfc3339(), "2024-05-01T10:00:00Z");
    }

    #[test]
    fn rejects_garbage() {
        assert!(DateTime::from_rfc3339("yesterday").is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_string() {
        let dt = DateTime::from_rfc3339("2024-05-01T10:00:00Z").unwrap();

        assert_eq!(
            serde_json::to_string(&dt).unwrap(),
            r#""2024-05-01T10:00:00Z""#,
        );
    }
}
