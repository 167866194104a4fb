//! [`Error`]-related definitions.

use std::fmt;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    response::{IntoResponse, Response},
};
use derive_more::Error as StdError;
use itertools::Itertools as _;
use service::infra::{database, geocoder};
use tracerr::{Trace, Traced};

use crate::api;

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status_code:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        #[repr(u16)]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self {
                            code: $code,
                            status_code: ::http::StatusCode::$status_code,
                            message: $message.to_string(),
                            backtrace: None,
                        },
                    )*
                }
            }
        }
    };
}

/// REST API [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// [`http::StatusCode`] of this [`Error`].
    pub status_code: http::StatusCode,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// [`Code`] of an internal server [`Error`].
    pub const INTERNAL: Code = "INTERNAL_SERVER_ERROR";

    /// Message of an internal server [`Error`] exposed to clients.
    const INTERNAL_MESSAGE: &'static str = "Internal server error";

    /// Create a new [`Error`] representing an internal server error.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: Self::INTERNAL,
            status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            backtrace: None,
        }
    }

    /// Creates a new [`Error`] representing a malformed request.
    #[must_use]
    pub fn bad_request(msg: &impl ToString) -> Self {
        Self {
            code: "BAD_REQUEST",
            status_code: http::StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            backtrace: None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            status_code: _,
            backtrace,
            message,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("\n{trace}"))),
        )
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if self.status_code.is_server_error() {
            tracing::error!("{self}");
        }

        let Self {
            code,
            status_code,
            backtrace: _,
            message,
        } = self;

        // Internal details are never exposed to clients.
        let message = if code == Self::INTERNAL {
            Self::INTERNAL_MESSAGE.to_owned()
        } else {
            message
        };

        api::Envelope::<()>::failure(message, code)
            .into_response_with(status_code)
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError + fmt::Display> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }

    fn as_error(&self) -> Error {
        let mut error = self.as_ref().as_error();
        error.backtrace = Some(self.trace().clone());
        error
    }
}

impl AsError for JsonRejection {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::bad_request(&self.body_text()))
    }
}

impl AsError for PathRejection {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::bad_request(&self.body_text()))
    }
}

impl AsError for QueryRejection {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::bad_request(&self.body_text()))
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        rejection.into_error()
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        rejection.into_error()
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        rejection.into_error()
    }
}

impl AsError for database::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

impl AsError for geocoder::Error {
    fn try_as_error(&self) -> Option<Error> {
        Some(api::geocoding::GeocodingError::Failed.into())
    }
}

#[cfg(test)]
mod spec {
    use axum::response::{IntoResponse as _, Response};
    use serde_json::Value;
    use service::infra::geocoder;

    use super::{AsError as _, Error};

    async fn body_of(resp: Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn hides_internal_message() {
        let resp = Error::internal(&"connection reset").into_response();

        assert_eq!(resp.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "INTERNAL_SERVER_ERROR");
        assert_eq!(body["message"], "Internal server error");
        assert!(!body.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn reports_geocoder_failure_generically() {
        let err = geocoder::Error::Malformed("unexpected `<html>`".into())
            .into_error();

        assert_eq!(err.code, "GEOCODING_FAILED");
        let resp = err.into_response();
        assert_eq!(resp.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(resp).await;
        assert_eq!(
            body["message"],
            "Geocoding service is temporarily unavailable",
        );
        assert!(!body.to_string().contains("<html>"));
    }

    #[test]
    fn displays_code_and_message() {
        let err = Error::bad_request(&"Missing required fields: lat");

        assert_eq!(
            err.to_string(),
            "[BAD_REQUEST]: Missing required fields: lat",
        );
    }
}
