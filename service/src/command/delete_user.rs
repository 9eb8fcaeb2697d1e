//! [`Command`] for deleting a [`User`].

use common::operations::{By, Delete, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::{database, Database},
    query,
    read::user::list::{Filter, TotalCount},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`User`] by its [`user::LogonName`].
#[derive(Clone, Debug)]
pub struct DeleteUser {
    /// [`user::LogonName`] of the [`User`] to delete.
    pub logon_name: user::LogonName,
}

impl<Db> Command<DeleteUser> for Service<Db>
where
    Db: Database<
            Select<By<TotalCount, Filter>>,
            Ok = TotalCount,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<User, user::LogonName>>,
            Ok = (),
            Err = Traced<database::Error>,
        >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteUser { logon_name } = cmd;

        let exists = self
            .execute(query::user::Exists(logon_name.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !exists {
            return Err(tracerr::new!(E::UserNotExists(logon_name)));
        }

        self.database()
            .execute(Delete(By::<User, _>::new(logon_name)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`DeleteUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] with the provided [`user::LogonName`] doesn't exist.
    #[display("'{_0}' does not exist. No deletion required")]
    UserNotExists(#[error(not(source))] user::LogonName),
}
