//! [`Database`] implementations.
//!
//! [`Database`]: crate::infra::Database

#![expect(
    clippy::items_after_statements,
    reason = "`const SQL` after statements"
)]

mod user;

use common::operations::Perform;
use tracerr::Traced;

use crate::infra::{
    database::{self, Ping},
    postgres::Connection as _,
    Database,
};

use super::Postgres;

impl Database<Perform<Ping>> for Postgres {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Perform<Ping>) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "SELECT 1";
        self.exec(SQL, &[]).await.map_err(tracerr::wrap!()).map(drop)
    }
}
