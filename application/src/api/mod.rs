//! REST API definitions.

pub mod geocoding;
pub mod rating;
pub mod rental;

use axum::{
    extract::{FromRequest, FromRequestParts},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{define_error, Error};

define_error! {
    enum NotFoundError {
        #[code = "RENTAL_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "`Rental` with the provided ID does not exist"]
        Rental,

        #[code = "RATING_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "`Rating` with the provided ID does not exist"]
        Rating,
    }
}

/// JSON envelope every API response is wrapped into.
#[derive(Clone, Debug, Serialize)]
pub struct Envelope<T> {
    /// Indicator whether the request succeeded.
    pub success: bool,

    /// Payload of a successful response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Human-readable message.
    pub message: String,

    /// Code of the [`Error`], if the request failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl<T> Envelope<T> {
    /// Creates a new successful [`Envelope`] with the provided `data`.
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            error: None,
        }
    }

    /// Creates a new failed [`Envelope`] with the provided [`Error`] `code`.
    ///
    /// [`Error`]: crate::Error
    pub fn failure(message: impl Into<String>, code: &'static str) -> Self {
        Self {
            success: false,
            data: None,
            message: message.into(),
            error: Some(code),
        }
    }
}

impl<T: Serialize> Envelope<T> {
    /// Converts this [`Envelope`] into a [`Response`] with the provided
    /// [`http::StatusCode`].
    pub fn into_response_with(self, status: http::StatusCode) -> Response {
        (status, axum::Json(self)).into_response()
    }
}

/// Successful API response.
#[derive(Clone, Debug)]
pub struct Success<T> {
    /// [`http::StatusCode`] of this [`Success`].
    pub status: http::StatusCode,

    /// Returned data.
    pub data: T,

    /// Human-readable message.
    pub message: &'static str,
}

impl<T> Success<T> {
    /// Creates a new `200 OK` [`Success`].
    pub fn ok(data: T, message: &'static str) -> Self {
        Self {
            status: http::StatusCode::OK,
            data,
            message,
        }
    }

    /// Creates a new `201 Created` [`Success`].
    pub fn created(data: T, message: &'static str) -> Self {
        Self {
            status: http::StatusCode::CREATED,
            data,
            message,
        }
    }
}

impl<T: Serialize> IntoResponse for Success<T> {
    fn into_response(self) -> Response {
        let Self {
            status,
            data,
            message,
        } = self;
        Envelope::success(data, message).into_response_with(status)
    }
}

/// [`axum::Json`] extractor rejecting with an [`Error`].
#[derive(Clone, Copy, Debug, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct Json<T>(pub T);

/// [`axum::extract::Path`] extractor rejecting with an [`Error`].
#[derive(Clone, Copy, Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct Path<T>(pub T);

/// [`axum::extract::Query`] extractor rejecting with an [`Error`].
#[derive(Clone, Copy, Debug, Default, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct Query<T>(pub T);

/// Deserializes a field distinguishing an explicit `null` from an absent
/// one.
///
/// Must be used along with `#[serde(default)]`.
///
/// # Errors
///
/// If the present value cannot be deserialized.
pub fn nullable<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Collector of missing and invalid request fields.
#[derive(Debug, Default)]
pub struct Validator {
    /// Names of the required fields being absent.
    missing: Vec<&'static str>,

    /// Names of the fields having invalid values.
    invalid: Vec<&'static str>,
}

impl Validator {
    /// Parses the required `value` of the `field`.
    pub fn require<T, U>(
        &mut self,
        field: &'static str,
        value: Option<T>,
        parse: impl FnOnce(T) -> Option<U>,
    ) -> Option<U> {
        if value.is_none() {
            self.missing.push(field);
        }
        self.optional(field, value, parse)
    }

    /// Parses the optional `value` of the `field`.
    pub fn optional<T, U>(
        &mut self,
        field: &'static str,
        value: Option<T>,
        parse: impl FnOnce(T) -> Option<U>,
    ) -> Option<U> {
        let parsed = parse(value?);
        if parsed.is_none() {
            self.invalid.push(field);
        }
        parsed
    }

    /// Parses the required text `value` of the `field`.
    ///
    /// The text is trimmed, and a blank one is treated as an absent one.
    pub fn require_text<U>(
        &mut self,
        field: &'static str,
        value: Option<String>,
        parse: impl FnOnce(String) -> Option<U>,
    ) -> Option<U> {
        self.require(field, value.and_then(non_blank), parse)
    }

    /// Parses the optional text `value` of the `field`.
    ///
    /// The text is trimmed, and a blank one is treated as an absent one.
    pub fn text<U>(
        &mut self,
        field: &'static str,
        value: Option<String>,
        parse: impl FnOnce(String) -> Option<U>,
    ) -> Option<U> {
        self.optional(field, value.and_then(non_blank), parse)
    }

    /// Parses the present `value` of the nullable `field`.
    ///
    /// [`None`] is returned for an absent `value`, and `Some(None)` for a
    /// `null` one.
    pub fn nullable<T, U>(
        &mut self,
        field: &'static str,
        value: Option<Option<T>>,
        parse: impl FnOnce(T) -> Option<U>,
    ) -> Option<Option<U>> {
        match value? {
            None => Some(None),
            Some(v) => self.optional(field, Some(v), parse).map(Some),
        }
    }

    /// Parses the present `value` of the nullable text `field`.
    ///
    /// The text is trimmed, and a blank one is treated as `null`.
    pub fn nullable_text<U>(
        &mut self,
        field: &'static str,
        value: Option<Option<String>>,
        parse: impl FnOnce(String) -> Option<U>,
    ) -> Option<Option<U>> {
        self.nullable(field, value.map(|v| v.and_then(non_blank)), parse)
    }

    /// Finishes validation returning the parsed `required` values.
    ///
    /// # Errors
    ///
    /// If any field is missing or invalid.
    pub fn finish<T>(self, required: Option<T>) -> Result<T, Error> {
        let Self { missing, invalid } = self;

        if !missing.is_empty() {
            return Err(Error {
                code: "MISSING_FIELDS",
                ..Error::bad_request(&format_args!(
                    "Missing required fields: {}",
                    missing.join(", "),
                ))
            });
        }
        if !invalid.is_empty() {
            return Err(Error {
                code: "INVALID_FIELDS",
                ..Error::bad_request(&format_args!(
                    "Invalid fields: {}",
                    invalid.join(", "),
                ))
            });
        }
        required.ok_or_else(|| Error::internal(&"unvalidated required field"))
    }
}

/// Trims the provided `text`, returning [`None`] if nothing is left.
fn non_blank(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == text.len() {
        Some(text)
    } else {
        Some(trimmed.to_owned())
    }
}

#[cfg(test)]
mod spec {
    use super::Validator;

    #[test]
    fn names_missing_fields_first() {
        let mut v = Validator::default();
        let address = v.require("address", Some(" "), |s| {
            (!s.trim().is_empty()).then_some(s)
        });
        let lat = v.require("lat", None::<f64>, Some);

        let err = v.finish(address.zip(lat)).unwrap_err();

        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Missing required fields: lat");
    }

    #[test]
    fn names_invalid_fields() {
        let mut v = Validator::default();
        let lat = v.require("lat", Some(91.0), |d: f64| {
            (-90.0..=90.0).contains(&d).then_some(d)
        });
        let price = v.optional("rent_price", Some(-1), |p: i64| {
            (p >= 0).then_some(p)
        });

        let err = v.finish(lat).unwrap_err();

        assert!(price.is_none());
        assert_eq!(err.message, "Invalid fields: lat, rent_price");
    }

    #[test]
    fn distinguishes_null_from_absent() {
        let mut v = Validator::default();

        assert_eq!(v.nullable("a", None::<Option<u8>>, Some), None);
        assert_eq!(v.nullable("b", Some(None::<u8>), Some), Some(None));
        assert_eq!(
            v.nullable_text("c", Some(Some("  ".to_owned())), Some),
            Some(None),
        );
        v.finish(Some(())).unwrap();
    }

    #[test]
    fn trims_text_before_parsing() {
        let mut v = Validator::default();
        let name = v.require_text("user_name", Some(" Amy ".to_owned()), |s| {
            (s.trim() == s).then_some(s)
        });
        let comment = v.text("comment", Some("\t".to_owned()), Some);
        let room =
            v.nullable_text("room_type", Some(Some(" 套房".into())), Some);

        assert_eq!(name.as_deref(), Some("Amy"));
        assert_eq!(comment, None);
        assert_eq!(room, Some(Some("套房".to_owned())));
        v.finish(Some(())).unwrap();
    }

    #[test]
    fn treats_blank_required_text_as_missing() {
        let mut v = Validator::default();
        let address = v.require_text("address", Some("  ".to_owned()), Some);

        let err = v.finish(address).unwrap_err();

        assert_eq!(err.message, "Missing required fields: address");
    }
}
