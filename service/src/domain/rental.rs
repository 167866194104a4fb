//! [`Rental`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};

use super::rating::{OverallRating, Rating, Score};

/// Rental housing listing.
#[derive(Clone, Debug)]
pub struct Rental {
    /// ID of this [`Rental`].
    pub id: Id,

    /// Map-matched [`Address`] of this [`Rental`].
    pub address: Address,

    /// Human-entered [`DescriptiveAddress`] of this [`Rental`], if any.
    pub descriptive_address: Option<DescriptiveAddress>,

    /// [`Latitude`] of this [`Rental`].
    pub lat: Latitude,

    /// [`Longitude`] of this [`Rental`].
    pub lng: Longitude,

    /// Free-text [`Description`] of this [`Rental`], if any.
    pub description: Option<Description>,

    /// Monthly [`RentPrice`] of this [`Rental`], if known.
    pub rent_price: Option<RentPrice>,

    /// [`RoomType`] of this [`Rental`], if known.
    pub room_type: Option<RoomType>,

    /// [`AreaSize`] of this [`Rental`], if known.
    pub area_size: Option<AreaSize>,

    /// [`Facilities`] of this [`Rental`], if any.
    pub facilities: Option<Facilities>,

    /// Cached landlord [`Score`] of this [`Rental`].
    pub landlord_rating: Option<Score>,

    /// Cached location [`Score`] of this [`Rental`].
    pub location_rating: Option<Score>,

    /// Cached value-for-money [`Score`] of this [`Rental`].
    pub value_rating: Option<Score>,

    /// Cached [`OverallRating`] of this [`Rental`].
    pub overall_rating: Option<OverallRating>,

    /// [`DateTime`] when this [`Rental`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Rental`] was modified the last time.
    pub updated_at: ModificationDateTime,
}

impl Rental {
    /// Overwrites the cached ratings of this [`Rental`] with the provided
    /// [`Aggregate`].
    pub fn apply_aggregate(&mut self, aggregate: Aggregate) {
        let Aggregate {
            landlord_rating,
            location_rating,
            value_rating,
            overall_rating,
        } = aggregate;

        self.landlord_rating = Some(landlord_rating);
        self.location_rating = Some(location_rating);
        self.value_rating = Some(value_rating);
        self.overall_rating = Some(overall_rating);
    }

    /// Recomputes [`OverallRating`] of this [`Rental`] from its own
    /// sub-ratings, if all of them are present.
    fn refresh_overall_rating(&mut self) {
        if let (Some(landlord), Some(location), Some(value)) =
            (self.landlord_rating, self.location_rating, self.value_rating)
        {
            self.overall_rating =
                Some(OverallRating::of(landlord, location, value));
        }
    }
}

/// ID of a [`Rental`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type), sqlx(transparent))]
pub struct Id(i64);

define_text! {
    /// Map-matched address of a [`Rental`].
    Address, max_len = 512
}

define_text! {
    /// Human-entered address of a [`Rental`], as typed by its reviewer.
    DescriptiveAddress, max_len = 512
}

define_text! {
    /// Free-text description of a [`Rental`].
    Description, max_len = 4096
}

define_text! {
    /// Room type of a [`Rental`] (e.g. `套房`).
    RoomType, max_len = 64
}

/// Latitude of a [`Rental`] in degrees.
#[derive(Clone, Copy, Debug, Display, Into, PartialEq, PartialOrd, Serialize)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type), sqlx(transparent))]
pub struct Latitude(f64);

impl Latitude {
    /// Creates a new [`Latitude`] if the given `degrees` are within
    /// `[-90, 90]`.
    #[must_use]
    pub fn new(degrees: f64) -> Option<Self> {
        (degrees.is_finite() && (-90.0..=90.0).contains(&degrees))
            .then_some(Self(degrees))
    }
}

/// Longitude of a [`Rental`] in degrees.
#[derive(Clone, Copy, Debug, Display, Into, PartialEq, PartialOrd, Serialize)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type), sqlx(transparent))]
pub struct Longitude(f64);

impl Longitude {
    /// Creates a new [`Longitude`] if the given `degrees` are within
    /// `[-180, 180]`.
    #[must_use]
    pub fn new(degrees: f64) -> Option<Self> {
        (degrees.is_finite() && (-180.0..=180.0).contains(&degrees))
            .then_some(Self(degrees))
    }
}

/// Monthly rent price of a [`Rental`].
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type), sqlx(transparent))]
pub struct RentPrice(i64);

impl RentPrice {
    /// Creates a new [`RentPrice`] if the given `price` is non-negative.
    #[must_use]
    pub fn new(price: i64) -> Option<Self> {
        (price >= 0).then_some(Self(price))
    }
}

/// Floor area of a [`Rental`].
#[derive(Clone, Copy, Debug, Display, Into, PartialEq, PartialOrd, Serialize)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type), sqlx(transparent))]
pub struct AreaSize(f64);

impl AreaSize {
    /// Creates a new [`AreaSize`] if the given `size` is a non-negative
    /// finite number.
    #[must_use]
    pub fn new(size: f64) -> Option<Self> {
        (size.is_finite() && size >= 0.0).then_some(Self(size))
    }
}

/// Comma-separated list of facility tags of a [`Rental`].
#[derive(Clone, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type), sqlx(transparent))]
pub struct Facilities(String);

impl Facilities {
    /// Maximum number of characters in [`Facilities`].
    pub const MAX_LEN: usize = 1024;

    /// Creates new [`Facilities`] out of the given comma-separated `tags`.
    ///
    /// Tags are trimmed and empty ones are dropped. Returns [`None`] if no
    /// tags are left, or the result is too long.
    #[must_use]
    pub fn new(tags: impl AsRef<str>) -> Option<Self> {
        let normalized = tags
            .as_ref()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(",");
        (!normalized.is_empty() && normalized.chars().count() <= Self::MAX_LEN)
            .then_some(Self(normalized))
    }
}

impl AsRef<str> for Facilities {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Data of a new [`Rental`] to be persisted.
#[derive(Clone, Debug)]
pub struct New {
    /// [`Address`] of the new [`Rental`].
    pub address: Address,

    /// [`DescriptiveAddress`] of the new [`Rental`].
    pub descriptive_address: Option<DescriptiveAddress>,

    /// [`Latitude`] of the new [`Rental`].
    pub lat: Latitude,

    /// [`Longitude`] of the new [`Rental`].
    pub lng: Longitude,

    /// [`Description`] of the new [`Rental`].
    pub description: Option<Description>,

    /// [`RentPrice`] of the new [`Rental`].
    pub rent_price: Option<RentPrice>,

    /// [`RoomType`] of the new [`Rental`].
    pub room_type: Option<RoomType>,

    /// [`AreaSize`] of the new [`Rental`].
    pub area_size: Option<AreaSize>,

    /// [`Facilities`] of the new [`Rental`].
    pub facilities: Option<Facilities>,

    /// Initial landlord [`Score`] of the new [`Rental`].
    pub landlord_rating: Option<Score>,

    /// Initial location [`Score`] of the new [`Rental`].
    pub location_rating: Option<Score>,

    /// Initial value-for-money [`Score`] of the new [`Rental`].
    pub value_rating: Option<Score>,

    /// Initial [`OverallRating`] of the new [`Rental`].
    pub overall_rating: Option<OverallRating>,

    /// [`DateTime`] when the new [`Rental`] is created.
    pub created_at: CreationDateTime,
}

/// Partial modification of a [`Rental`].
///
/// [`None`] leaves a field unchanged. For nullable fields `Some(None)` clears
/// the field.
#[derive(Clone, Debug, Default)]
pub struct Patch {
    /// New [`Address`].
    pub address: Option<Address>,

    /// New [`DescriptiveAddress`].
    pub descriptive_address: Option<Option<DescriptiveAddress>>,

    /// New [`Latitude`].
    pub lat: Option<Latitude>,

    /// New [`Longitude`].
    pub lng: Option<Longitude>,

    /// New [`Description`].
    pub description: Option<Option<Description>>,

    /// New [`RentPrice`].
    pub rent_price: Option<Option<RentPrice>>,

    /// New [`RoomType`].
    pub room_type: Option<Option<RoomType>>,

    /// New [`AreaSize`].
    pub area_size: Option<Option<AreaSize>>,

    /// New [`Facilities`].
    pub facilities: Option<Option<Facilities>>,

    /// New landlord [`Score`].
    pub landlord_rating: Option<Option<Score>>,

    /// New location [`Score`].
    pub location_rating: Option<Option<Score>>,

    /// New value-for-money [`Score`].
    pub value_rating: Option<Option<Score>>,
}

impl Patch {
    /// Indicates whether this [`Patch`] touches any of the sub-ratings.
    #[must_use]
    pub fn touches_ratings(&self) -> bool {
        self.landlord_rating.is_some()
            || self.location_rating.is_some()
            || self.value_rating.is_some()
    }

    /// Applies this [`Patch`] to the provided [`Rental`].
    ///
    /// Doesn't touch [`Rental::updated_at`].
    pub fn apply(self, rental: &mut Rental) {
        let touches_ratings = self.touches_ratings();
        let Self {
            address,
            descriptive_address,
            lat,
            lng,
            description,
            rent_price,
            room_type,
            area_size,
            facilities,
            landlord_rating,
            location_rating,
            value_rating,
        } = self;

        if let Some(v) = address {
            rental.address = v;
        }
        if let Some(v) = descriptive_address {
            rental.descriptive_address = v;
        }
        if let Some(v) = lat {
            rental.lat = v;
        }
        if let Some(v) = lng {
            rental.lng = v;
        }
        if let Some(v) = description {
            rental.description = v;
        }
        if let Some(v) = rent_price {
            rental.rent_price = v;
        }
        if let Some(v) = room_type {
            rental.room_type = v;
        }
        if let Some(v) = area_size {
            rental.area_size = v;
        }
        if let Some(v) = facilities {
            rental.facilities = v;
        }
        if let Some(v) = landlord_rating {
            rental.landlord_rating = v;
        }
        if let Some(v) = location_rating {
            rental.location_rating = v;
        }
        if let Some(v) = value_rating {
            rental.value_rating = v;
        }

        if touches_ratings {
            rental.refresh_overall_rating();
        }
    }
}

/// Aggregated ratings of a [`Rental`], computed from all its [`Rating`]s.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aggregate {
    /// Rounded mean of the landlord [`Score`]s.
    pub landlord_rating: Score,

    /// Rounded mean of the location [`Score`]s.
    pub location_rating: Score,

    /// Rounded mean of the value-for-money [`Score`]s.
    pub value_rating: Score,

    /// Exact mean of the [`Rating`]s' own [`OverallRating`]s.
    pub overall_rating: OverallRating,
}

impl Aggregate {
    /// Aggregates the provided [`Rating`]s.
    ///
    /// Returns [`None`] if there are no [`Rating`]s.
    #[must_use]
    pub fn of(ratings: &[Rating]) -> Option<Self> {
        let mean_of = |score: fn(&Rating) -> Score| {
            Score::mean(ratings.iter().map(score))
        };

        Some(Self {
            landlord_rating: mean_of(|r| r.landlord_rating)?,
            location_rating: mean_of(|r| r.location_rating)?,
            value_rating: mean_of(|r| r.value_rating)?,
            overall_rating: OverallRating::mean(
                ratings.iter().map(|r| r.overall_rating),
            )?,
        })
    }
}

/// [`DateTime`] when a [`Rental`] was created.
pub type CreationDateTime = DateTimeOf<(Rental, unit::Creation)>;

/// [`DateTime`] when a [`Rental`] was modified.
pub type ModificationDateTime = DateTimeOf<(Rental, unit::Modification)>;

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::domain::{rating, Rating};

    use super::{
        Address, Aggregate, AreaSize, Facilities, Id, Latitude, Longitude,
        Patch, RentPrice, Rental,
    };
    use crate::domain::rating::{OverallRating, Score};

    fn score(v: u8) -> Score {
        Score::new(v).unwrap()
    }

    fn rating(landlord: u8, location: u8, value: u8) -> Rating {
        let (landlord, location, value) =
            (score(landlord), score(location), score(value));
        let now = DateTime::now();
        Rating {
            id: rating::Id::from(1),
            rental_id: Id::from(1),
            user_name: None,
            landlord_rating: landlord,
            location_rating: location,
            value_rating: value,
            overall_rating: OverallRating::of(landlord, location, value),
            comment: None,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        }
    }

    fn rental() -> Rental {
        let now = DateTime::now();
        Rental {
            id: Id::from(1),
            address: Address::new("台北市信義區信義路五段7號").unwrap(),
            descriptive_address: None,
            lat: Latitude::new(25.0330).unwrap(),
            lng: Longitude::new(121.5654).unwrap(),
            description: None,
            rent_price: None,
            room_type: None,
            area_size: None,
            facilities: None,
            landlord_rating: None,
            location_rating: None,
            value_rating: None,
            overall_rating: None,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        }
    }

    #[test]
    fn validates_coordinates() {
        assert!(Latitude::new(90.0).is_some());
        assert!(Latitude::new(-90.0).is_some());
        assert!(Latitude::new(90.1).is_none());
        assert!(Latitude::new(f64::NAN).is_none());
        assert!(Longitude::new(180.0).is_some());
        assert!(Longitude::new(-180.5).is_none());
        assert!(Longitude::new(f64::INFINITY).is_none());
    }

    #[test]
    fn rejects_negative_price_and_area() {
        assert!(RentPrice::new(0).is_some());
        assert!(RentPrice::new(-1).is_none());
        assert!(AreaSize::new(15.5).is_some());
        assert!(AreaSize::new(-0.5).is_none());
    }

    #[test]
    fn rejects_untrimmed_or_empty_address() {
        assert!(Address::new("").is_none());
        assert!(Address::new(" 台北市 ").is_none());
        assert!(Address::new("a".repeat(513)).is_none());
        assert!(Address::new("台".repeat(512)).is_some());
    }

    #[test]
    fn normalizes_facilities() {
        let facilities = Facilities::new(" 冷氣, ,網路").unwrap();

        assert_eq!(facilities.as_ref(), "冷氣,網路");
        assert!(Facilities::new(" , ").is_none());
    }

    #[test]
    fn aggregates_nothing_out_of_no_ratings() {
        assert_eq!(Aggregate::of(&[]), None);
    }

    #[test]
    fn aggregates_single_rating() {
        let agg = Aggregate::of(&[rating(4, 5, 3)]).unwrap();

        assert_eq!(agg.landlord_rating, score(4));
        assert_eq!(agg.location_rating, score(5));
        assert_eq!(agg.value_rating, score(3));
        assert_eq!(f64::from(agg.overall_rating), 4.0);
    }

    #[test]
    fn aggregates_with_half_up_rounding() {
        let agg = Aggregate::of(&[rating(4, 5, 3), rating(5, 4, 4)]).unwrap();

        assert_eq!(agg.landlord_rating, score(5));
        assert_eq!(agg.location_rating, score(5));
        assert_eq!(agg.value_rating, score(4));
        let overall = f64::from(agg.overall_rating);
        assert!((overall - (4.0 + 13.0 / 3.0) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn patch_leaves_absent_fields_unchanged() {
        let mut rental = rental();
        rental.rent_price = RentPrice::new(25000);

        Patch {
            area_size: Some(AreaSize::new(12.0)),
            ..Patch::default()
        }
        .apply(&mut rental);

        assert_eq!(rental.rent_price, RentPrice::new(25000));
        assert_eq!(rental.area_size, AreaSize::new(12.0));
        assert_eq!(rental.address.to_string(), "台北市信義區信義路五段7號");
    }

    #[test]
    fn patch_clears_nullable_fields() {
        let mut rental = rental();
        rental.rent_price = RentPrice::new(25000);

        Patch {
            rent_price: Some(None),
            ..Patch::default()
        }
        .apply(&mut rental);

        assert_eq!(rental.rent_price, None);
    }

    #[test]
    fn patch_recomputes_overall_once_all_ratings_present() {
        let mut rental = rental();

        Patch {
            landlord_rating: Some(Some(score(4))),
            location_rating: Some(Some(score(5))),
            ..Patch::default()
        }
        .apply(&mut rental);
        assert_eq!(rental.overall_rating, None);

        Patch {
            value_rating: Some(Some(score(3))),
            ..Patch::default()
        }
        .apply(&mut rental);
        assert_eq!(rental.overall_rating.map(f64::from), Some(4.0));
    }
}
