//! [`Query`] checking health of the [`Service`].

use common::operations::Perform;
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    infra::{database, Database},
    Service,
};

use super::Query;

/// Checks whether the [`Database`] is reachable within the configured
/// timeout.
#[derive(Clone, Copy, Debug, Default)]
pub struct Check;

impl<Db> Query<Check> for Service<Db>
where
    Db: Database<
        Perform<database::Ping>,
        Ok = (),
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, _: Check) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let timeout = self.config().health_check_timeout;
        tokio::time::timeout(
            timeout,
            self.database().execute(Perform(database::Ping)),
        )
        .await
        .map_err(|_| tracerr::new!(E::Timeout))?
        .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`Check`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Database`] didn't respond in time.
    #[display("`Database` health check timed out")]
    Timeout,
}
