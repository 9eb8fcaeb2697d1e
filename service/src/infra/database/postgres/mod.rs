//! Postgres [`Database`] implementation.
//!
//! Expects the following schema to be present:
//! ```sql
//! CREATE TABLE users (
//!     user_id    SERIAL PRIMARY KEY,
//!     logon_name VARCHAR(20)  NOT NULL UNIQUE,
//!     full_name  VARCHAR(100) NOT NULL,
//!     email      VARCHAR(100) NOT NULL
//! );
//! ```

pub mod connection;
mod impls;
mod like_pattern;

use deadpool_postgres::Runtime;
use derive_more::{Display, Error as StdError, From};
use tokio_postgres::{error::SqlState, NoTls};
use tracerr::Traced;

use crate::infra::database;
#[cfg(doc)]
use crate::infra::Database;

pub use self::{connection::Connection, like_pattern::LikePattern};

pub use deadpool_postgres::{Config, PoolConfig};

/// Postgres [`Database`] client.
///
/// Takes a pooled [`Connection`] for every executed operation.
#[derive(Clone, Debug)]
pub struct Postgres {
    /// [`connection::Pool`] to take [`Connection`]s from.
    pool: connection::Pool,
}

impl Postgres {
    /// Creates a new [`Postgres`] client with the provided [`Config`].
    ///
    /// No connection is established until the first operation.
    ///
    /// # Errors
    ///
    /// If failed to create a new [`Postgres`] client.
    pub fn new(conf: &Config) -> Result<Self, Traced<database::Error>> {
        let pool = conf
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(Self { pool })
    }

    /// Takes a [`Connection`] from the [`connection::Pool`].
    pub(crate) async fn connection(
        &self,
    ) -> Result<connection::Client, Traced<database::Error>> {
        self.pool
            .get()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }
}

/// Postgres database [`Error`].
#[derive(Debug, Display, StdError, From)]
pub enum Error {
    /// [`Connection`] error.
    #[display("`Connection` error: {_0}")]
    #[from]
    Connection(connection::Error),

    /// Error of creating a new [`connection::Pool`] client.
    #[display("Failed to create a new `connection::Pool`: {_0}")]
    #[from]
    PoolCreationError(connection::PoolCreationError),

    /// [`connection::Pool`] error.
    #[display("`connection::Pool` error: {_0}")]
    #[from]
    PoolError(connection::PoolError),

    /// Statement expected to return a row returned nothing.
    #[display("`{_0}` returned no row")]
    NoRowReturned(#[error(not(source))] &'static str),
}

impl Error {
    /// Checks if the error is a unique violation of the specified constraint.
    #[must_use]
    pub fn is_unique_violation(&self, constraint: Option<&str>) -> bool {
        match self {
            Self::Connection(e) => {
                e.code() == Some(&SqlState::UNIQUE_VIOLATION)
                    && constraint.map_or(true, |c| {
                        e.as_db_error().and_then(|e| e.constraint()) == Some(c)
                    })
            }
            Self::PoolError(..)
            | Self::PoolCreationError(..)
            | Self::NoRowReturned(..) => false,
        }
    }
}

#[cfg(test)]
mod spec {
    use super::Error;

    #[test]
    fn missing_returned_row_is_not_unique_violation() {
        let err = Error::NoRowReturned("INSERT INTO users");

        assert!(!err.is_unique_violation(None));
        assert_eq!(err.to_string(), "`INSERT INTO users` returned no row");
    }
}
