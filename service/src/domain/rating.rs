//! [`Rating`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};

use super::rental;

/// Single reviewer's rating of a [`Rental`].
///
/// [`Rental`]: super::Rental
#[derive(Clone, Debug)]
pub struct Rating {
    /// ID of this [`Rating`].
    pub id: Id,

    /// ID of the rated [`Rental`].
    ///
    /// [`Rental`]: super::Rental
    pub rental_id: rental::Id,

    /// [`UserName`] of the reviewer, if they left one.
    pub user_name: Option<UserName>,

    /// Landlord [`Score`].
    pub landlord_rating: Score,

    /// Location [`Score`].
    pub location_rating: Score,

    /// Value-for-money [`Score`].
    pub value_rating: Score,

    /// [`OverallRating`] of the three [`Score`]s.
    pub overall_rating: OverallRating,

    /// [`Comment`] of the reviewer, if any.
    pub comment: Option<Comment>,

    /// [`DateTime`] when this [`Rating`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Rating`] was modified the last time.
    pub updated_at: ModificationDateTime,
}

/// ID of a [`Rating`].
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
    /// Display name of a [`Rating`] author.
    UserName, max_len = 64
}

define_text! {
    /// Free-text comment of a [`Rating`].
    Comment, max_len = 4096
}

/// Sub-rating score in `[1, 5]`.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type), sqlx(transparent))]
pub struct Score(u8);

impl Score {
    /// Lowest possible [`Score`].
    pub const MIN: u8 = 1;

    /// Highest possible [`Score`].
    pub const MAX: u8 = 5;

    /// Creates a new [`Score`] if the given `value` is within `[1, 5]`.
    #[must_use]
    pub fn new<N: TryInto<u8>>(value: N) -> Option<Self> {
        let value = value.try_into().ok()?;
        (Self::MIN..=Self::MAX)
            .contains(&value)
            .then_some(Self(value))
    }

    /// Computes the mean of the provided [`Score`]s, rounded half up.
    ///
    /// Returns [`None`] if there are no [`Score`]s.
    #[must_use]
    pub fn mean(scores: impl IntoIterator<Item = Self>) -> Option<Self> {
        let (sum, count) = scores
            .into_iter()
            .fold((0_u64, 0_u32), |(sum, count), s| {
                (sum + u64::from(s.0), count + 1)
            });
        if count == 0 {
            return None;
        }

        #[expect(clippy::cast_precision_loss, reason = "small numbers")]
        let mean = sum as f64 / f64::from(count);
        Self::from_mean(mean)
    }

    /// Rounds the provided `mean` half up into a [`Score`].
    ///
    /// Means of [`Score`]s are always positive, so rounding half away from
    /// zero is the same as rounding half up.
    #[must_use]
    pub fn from_mean(mean: f64) -> Option<Self> {
        let rounded = mean.round();
        if !(f64::from(Self::MIN)..=f64::from(Self::MAX)).contains(&rounded) {
            return None;
        }
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "checked to be within `[1, 5]`"
        )]
        let value = rounded as u8;
        Self::new(value)
    }
}

/// Mean of sub-rating [`Score`]s.
#[derive(Clone, Copy, Debug, Display, Into, PartialEq, PartialOrd, Serialize)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type), sqlx(transparent))]
pub struct OverallRating(f64);

impl OverallRating {
    /// Computes the [`OverallRating`] of the three sub-rating [`Score`]s.
    #[must_use]
    pub fn of(landlord: Score, location: Score, value: Score) -> Self {
        let sum = f64::from(landlord.0)
            + f64::from(location.0)
            + f64::from(value.0);
        Self(sum / 3.0)
    }

    /// Computes the exact mean of the provided [`OverallRating`]s.
    ///
    /// Returns [`None`] if there are no [`OverallRating`]s.
    #[must_use]
    pub fn mean(ratings: impl IntoIterator<Item = Self>) -> Option<Self> {
        let (sum, count) = ratings
            .into_iter()
            .fold((0.0, 0_u32), |(sum, count), r| (sum + r.0, count + 1));
        (count > 0).then(|| Self(sum / f64::from(count)))
    }
}

/// Data of a new [`Rating`] to be persisted.
#[derive(Clone, Debug)]
pub struct New {
    /// ID of the rated [`Rental`].
    ///
    /// [`Rental`]: super::Rental
    pub rental_id: rental::Id,

    /// [`UserName`] of the reviewer.
    pub user_name: Option<UserName>,

    /// Landlord [`Score`].
    pub landlord_rating: Score,

    /// Location [`Score`].
    pub location_rating: Score,

    /// Value-for-money [`Score`].
    pub value_rating: Score,

    /// [`OverallRating`] of the three [`Score`]s.
    pub overall_rating: OverallRating,

    /// [`Comment`] of the reviewer.
    pub comment: Option<Comment>,

    /// [`DateTime`] when the new [`Rating`] is created.
    pub created_at: CreationDateTime,
}

/// Partial modification of a [`Rating`].
///
/// [`None`] leaves a field unchanged. For nullable fields `Some(None)` clears
/// the field.
#[derive(Clone, Debug, Default)]
pub struct Patch {
    /// New [`UserName`].
    pub user_name: Option<Option<UserName>>,

    /// New landlord [`Score`].
    pub landlord_rating: Option<Score>,

    /// New location [`Score`].
    pub location_rating: Option<Score>,

    /// New value-for-money [`Score`].
    pub value_rating: Option<Score>,

    /// New [`Comment`].
    pub comment: Option<Option<Comment>>,
}

impl Patch {
    /// Applies this [`Patch`] to the provided [`Rating`], recomputing its
    /// [`OverallRating`] out of the merged [`Score`]s.
    ///
    /// Doesn't touch [`Rating::updated_at`].
    pub fn apply(self, rating: &mut Rating) {
        let Self {
            user_name,
            landlord_rating,
            location_rating,
            value_rating,
            comment,
        } = self;

        if let Some(v) = user_name {
            rating.user_name = v;
        }
        if let Some(v) = landlord_rating {
            rating.landlord_rating = v;
        }
        if let Some(v) = location_rating {
            rating.location_rating = v;
        }
        if let Some(v) = value_rating {
            rating.value_rating = v;
        }
        if let Some(v) = comment {
            rating.comment = v;
        }

        rating.overall_rating = OverallRating::of(
            rating.landlord_rating,
            rating.location_rating,
            rating.value_rating,
        );
    }
}

/// [`DateTime`] when a [`Rating`] was created.
pub type CreationDateTime = DateTimeOf<(Rating, unit::Creation)>;

/// [`DateTime`] when a [`Rating`] was modified.
pub type ModificationDateTime = DateTimeOf<(Rating, unit::Modification)>;

#[cfg(test)]
mod spec {
    use super::{OverallRating, Score};

    #[test]
    fn accepts_scores_within_range_only() {
        assert!(Score::new(0).is_none());
        assert!(Score::new(1).is_some());
        assert!(Score::new(5).is_some());
        assert!(Score::new(6).is_none());
        assert!(Score::new(-3_i64).is_none());
        assert!(Score::new(300_i64).is_none());
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(Score::from_mean(4.5), Score::new(5));
        assert_eq!(Score::from_mean(4.49), Score::new(4));
        assert_eq!(Score::from_mean(1.5), Score::new(2));
        assert_eq!(Score::from_mean(0.4), None);
    }

    #[test]
    fn computes_mean_of_scores() {
        let scores = [4, 5].map(|v| Score::new(v).unwrap());

        assert_eq!(Score::mean(scores), Score::new(5));
        assert_eq!(Score::mean([]), None);
    }

    #[test]
    fn computes_overall_as_exact_third() {
        let s = |v| Score::new(v).unwrap();

        assert_eq!(f64::from(OverallRating::of(s(4), s(5), s(3))), 4.0);
        assert_eq!(
            f64::from(OverallRating::of(s(5), s(4), s(4))),
            13.0 / 3.0,
        );
    }

    #[test]
    fn computes_exact_mean_of_overalls() {
        let s = |v| Score::new(v).unwrap();
        let overalls = [
            OverallRating::of(s(4), s(5), s(3)),
            OverallRating::of(s(5), s(4), s(4)),
        ];

        let mean = f64::from(OverallRating::mean(overalls).unwrap());

        assert!((mean - 4.166_666_666).abs() < 1e-6);
        assert_eq!(OverallRating::mean([]), None);
    }
}
