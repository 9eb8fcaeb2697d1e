//! [`Query`] collection related to a single [`User`].

use common::operations::{By, Select};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::user,
    infra::{database, Database},
    read::user::list::{Filter, TotalCount},
    Service,
};

use super::{users, Query};

/// Queries whether a [`User`] with the provided [`user::LogonName`] exists.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Exists(pub user::LogonName);

impl<Db> Query<Exists> for Service<Db>
where
    Db: Database<
        Select<By<TotalCount, Filter>>,
        Ok = TotalCount,
        Err = Traced<database::Error>,
    >,
{
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Exists(logon_name): Exists,
    ) -> Result<Self::Ok, Self::Err> {
        let count = self
            .execute(users::Count(Filter::LogonName(logon_name)))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(usize::from(count) > 0)
    }
}
