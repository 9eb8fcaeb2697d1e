//! [`Error`]-related definitions.

use std::fmt;

use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    response::{IntoResponse, Response},
};
use derive_more::{Display, Error as StdError};
use itertools::Itertools as _;
use serde::Serialize;
use service::{command, infra::database, query};
use tracerr::{Trace, Traced};

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[kind = $kind:ident]
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
                        $name::$variant => Self::new(
                            $crate::error::Kind::$kind,
                            ::http::StatusCode::$status_code,
                            $message,
                        ),
                    )*
                }
            }
        }
    };
}

/// Kind of an [`Error`].
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Kind {
    /// Query string parameter is malformed or out of range.
    InvalidParameter,

    /// Request body is malformed or violates validation rules.
    ValidationError,

    /// Requested resource doesn't exist.
    NotFound,

    /// Requested page is beyond the last one.
    PageNotFound,

    /// Resource with the same identity already exists.
    Conflict,

    /// Storage operation failed.
    StorageError,

    /// Dependency is unavailable.
    Unavailable,

    /// Unexpected internal failure.
    Internal,
}

/// HTTP API [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Kind`] of this [`Error`].
    pub kind: Kind,

    /// [`http::StatusCode`] of this [`Error`].
    pub status_code: http::StatusCode,

    /// [`Error`] message exposed to the client.
    pub message: String,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// Internal details of this [`Error`], never exposed to the client.
    pub details: Option<String>,
}

impl Error {
    /// Creates a new [`Error`] with the provided parameters.
    #[must_use]
    pub fn new(
        kind: Kind,
        status_code: http::StatusCode,
        message: impl ToString,
    ) -> Self {
        Self {
            kind,
            status_code,
            message: message.to_string(),
            backtrace: None,
            details: None,
        }
    }

    /// Create a new [`Error`] representing an internal server error.
    ///
    /// The client only sees the provided `description`, while the `cause` is
    /// logged.
    #[must_use]
    pub fn internal(description: &str, cause: &impl ToString) -> Self {
        Self {
            details: Some(cause.to_string()),
            ..Self::new(
                Kind::Internal,
                http::StatusCode::INTERNAL_SERVER_ERROR,
                description,
            )
        }
    }

    /// Creates a new [`Error`] representing a failed storage operation.
    #[must_use]
    pub fn storage(cause: &impl ToString) -> Self {
        Self {
            kind: Kind::StorageError,
            ..Self::internal("storage operation failed", cause)
        }
    }

    /// Creates a new [`Error`] representing a malformed request body.
    #[must_use]
    pub fn unmarshalling(cause: &impl Display) -> Self {
        Self::new(
            Kind::ValidationError,
            http::StatusCode::BAD_REQUEST,
            format!("unmarshalling http request body: {cause}"),
        )
    }

    /// Logs this [`Error`] at the level matching its
    /// [`http::StatusCode`].
    fn log(&self) {
        let status_code = self.status_code.as_u16();
        if self.status_code.is_server_error() {
            tracing::error!(
                status_code,
                kind = %self.kind,
                details = self.details.as_deref(),
                "writing non-2xx HTTP response: {self}",
            );
        } else {
            tracing::info!(
                status_code,
                kind = %self.kind,
                message = %self.message,
                "writing non-2xx HTTP response",
            );
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            kind,
            status_code: _,
            message,
            backtrace,
            details,
        } = self;

        write!(
            f,
            "[{kind}]: {message}{}{}",
            details.iter().format_with("", |d, f| f(&format_args!(": {d}"))),
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("\n{trace}"))),
        )
    }
}

/// JSON body of an [`Error`] response.
#[derive(Debug, Serialize)]
struct Body<'e> {
    /// HTTP status code.
    code: u16,

    /// Message describing the error.
    message: &'e str,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        self.log();

        let body = serde_json::to_vec(&Body {
            code: self.status_code.as_u16(),
            message: &self.message,
        })
        .unwrap_or_else(|e| {
            tracing::error!("marshalling error response into JSON: {e}");
            vec![]
        });

        (
            self.status_code,
            [(
                http::header::CONTENT_TYPE,
                http::HeaderValue::from_static("application/json"),
            )],
            body,
        )
            .into_response()
    }
}

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal("internal server error", &self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }

    fn as_error(&self) -> Error
    where
        Self: Display,
    {
        let mut error = self.try_as_error().unwrap_or_else(|| {
            Error::internal("internal server error", &self)
        });
        error.backtrace = Some(self.trace().clone());
        error
    }
}

impl AsError for database::Error {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::storage(self))
    }
}

impl AsError for PathRejection {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::new(
            Kind::InvalidParameter,
            http::StatusCode::BAD_REQUEST,
            self.body_text(),
        ))
    }
}

impl AsError for QueryRejection {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::new(
            Kind::InvalidParameter,
            http::StatusCode::BAD_REQUEST,
            self.body_text(),
        ))
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

impl AsError for command::create_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Invalid(e) => Some(Error::new(
                Kind::ValidationError,
                http::StatusCode::BAD_REQUEST,
                e,
            )),
            Self::LogonNameTaken(_) => Some(Error::new(
                Kind::Conflict,
                http::StatusCode::BAD_REQUEST,
                self,
            )),
        }
    }
}

impl AsError for command::update_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Invalid(e) => Some(Error::new(
                Kind::ValidationError,
                http::StatusCode::BAD_REQUEST,
                e,
            )),
            Self::UserNotExists(_) => Some(Error::new(
                Kind::NotFound,
                http::StatusCode::NOT_FOUND,
                self,
            )),
        }
    }
}

impl AsError for command::delete_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::UserNotExists(_) => Some(Error::new(
                Kind::NotFound,
                http::StatusCode::NOT_FOUND,
                self,
            )),
        }
    }
}

impl AsError for query::users::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PageNotFound(_) => Some(Error::new(
                Kind::PageNotFound,
                http::StatusCode::NOT_FOUND,
                self,
            )),
        }
    }
}

impl AsError for query::health::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        let message = match self {
            Self::Db(_) => "storage is unreachable",
            Self::Timeout => "storage health check timed out",
        };
        Some(Error {
            details: Some(self.to_string()),
            ..Error::new(
                Kind::Unavailable,
                http::StatusCode::SERVICE_UNAVAILABLE,
                message,
            )
        })
    }
}
