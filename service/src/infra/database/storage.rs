//! [`Storage`] definition.

use common::operations::{By, Delete, Insert, Perform, Select, Update};
use derive_more::From;
use tracerr::Traced;

#[cfg(feature = "memory")]
use super::Memory;
#[cfg(feature = "postgres")]
use super::Postgres;
use crate::{
    domain::{
        user::{self, NewUser, Patch},
        User,
    },
    infra::database::{self, Database, Ping},
    read::user::list::{Filter, Selector, TotalCount},
};

/// [`Database`] chosen at runtime.
#[derive(Clone, Debug, From)]
pub enum Storage {
    /// [`Postgres`] database.
    #[cfg(feature = "postgres")]
    Postgres(Postgres),

    /// [`Memory`] database.
    #[cfg(feature = "memory")]
    Memory(Memory),
}

/// Implements a [`Database`] operation for [`Storage`] by delegating it to
/// the underlying database.
macro_rules! delegate {
    ($op:ty => $ok:ty) => {
        impl Database<$op> for Storage {
            type Ok = $ok;
            type Err = Traced<database::Error>;

            async fn execute(&self, op: $op) -> Result<Self::Ok, Self::Err> {
                match self {
                    #[cfg(feature = "postgres")]
                    Self::Postgres(db) => {
                        db.execute(op).await.map_err(tracerr::wrap!())
                    }
                    #[cfg(feature = "memory")]
                    Self::Memory(db) => {
                        db.execute(op).await.map_err(tracerr::wrap!())
                    }
                }
            }
        }
    };
}

delegate!(Select<By<TotalCount, Filter>> => TotalCount);
delegate!(Select<By<Vec<User>, Selector>> => Vec<User>);
delegate!(Insert<NewUser> => User);
delegate!(Update<Patch> => Option<User>);
delegate!(Delete<By<User, user::LogonName>> => ());
delegate!(Perform<Ping> => ());
