//! [`User`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        user::{self, NewUser, Patch},
        User,
    },
    infra::{
        database::{
            self,
            postgres::{self, Connection, LikePattern},
            Postgres,
        },
        Database,
    },
    read::user::list::{Filter, Selector, TotalCount},
};

/// SQL condition built out of a [`Filter`].
#[derive(Debug)]
enum Condition {
    /// No condition.
    All,

    /// Full name matches the [`LikePattern`].
    FullNameLike(LikePattern),

    /// Logon name equals the [`user::LogonName`].
    LogonName(user::LogonName),
}

impl From<Filter> for Condition {
    fn from(filter: Filter) -> Self {
        match filter {
            Filter::All => Self::All,
            Filter::FullName(part) => {
                Self::FullNameLike(LikePattern::contains(&part))
            }
            Filter::LogonName(name) => Self::LogonName(name),
        }
    }
}

impl Condition {
    /// Returns the parameter of this [`Condition`], if any.
    fn param(&self) -> Option<&(dyn ToSql + Sync)> {
        match self {
            Self::All => None,
            Self::FullNameLike(pattern) => Some(pattern),
            Self::LogonName(name) => Some(name),
        }
    }

    /// Returns the SQL `WHERE` clause of this [`Condition`] referring its
    /// parameter by the provided `idx`.
    fn sql(&self, idx: usize) -> String {
        match self {
            Self::All => String::new(),
            Self::FullNameLike(_) => {
                format!("WHERE full_name LIKE ${idx}::VARCHAR")
            }
            Self::LogonName(_) => format!("WHERE logon_name = ${idx}::VARCHAR"),
        }
    }
}

/// Converts the provided [`Row`] into a [`User`].
fn user_from_row(row: &Row) -> User {
    User {
        id: row.get("user_id"),
        logon_name: row.get("logon_name"),
        full_name: row.get("full_name"),
        email: row.get("email"),
    }
}

impl Database<Select<By<TotalCount, Filter>>> for Postgres {
    type Ok = TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<TotalCount, Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let condition = Condition::from(by.into_inner());

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];
        let filtering = condition.param().map(|p| {
            ps.push(p);
            ps.len()
        });

        let sql = format!(
            "SELECT COUNT(*) \
             FROM users \
             {filtering}",
            filtering = filtering.into_iter().format_with("", |idx, f| {
                f(&condition.sql(idx))
            }),
        );
        let count = self
            .query_opt(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .map_or(0, |row| row.get::<_, i64>(0));

        Ok(usize::try_from(count).unwrap_or_default().into())
    }
}

impl Database<Select<By<Vec<User>, Selector>>> for Postgres {
    type Ok = Vec<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<User>, Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Selector { arguments, filter } = by.into_inner();
        let condition = Condition::from(filter);

        let offset = i64::try_from(arguments.offset()).unwrap_or(i64::MAX);
        let limit = i64::try_from(arguments.limit()).unwrap_or(i64::MAX);

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&offset, &limit];
        let filtering = condition.param().map(|p| {
            ps.push(p);
            ps.len()
        });

        let sql = format!(
            "SELECT user_id, logon_name, full_name, email \
             FROM users \
             {filtering} \
             ORDER BY user_id \
             OFFSET $1::INT8 \
             LIMIT $2::INT8",
            filtering = filtering.into_iter().format_with("", |idx, f| {
                f(&condition.sql(idx))
            }),
        );
        Ok(self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(user_from_row)
            .collect())
    }
}

impl Database<Insert<NewUser>> for Postgres {
    type Ok = User;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(user): Insert<NewUser>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            INSERT INTO users (logon_name, full_name, email) \
            VALUES ($1::VARCHAR, $2::VARCHAR, $3::VARCHAR) \
            RETURNING user_id";
        let id = self
            .query_opt(SQL, &[&user.logon_name, &user.full_name, &user.email])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| row.get::<_, user::Id>("user_id"))
            .ok_or(postgres::Error::NoRowReturned("INSERT INTO users"))
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;
        Ok(user.with_id(id))
    }
}

impl Database<Update<Patch>> for Postgres {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(patch): Update<Patch>,
    ) -> Result<Self::Ok, Self::Err> {
        let Patch { logon_name, change } = patch;

        const SQL: &str = "\
            UPDATE users \
            SET full_name = COALESCE($2::VARCHAR, full_name), \
                email = COALESCE($3::VARCHAR, email) \
            WHERE logon_name = $1::VARCHAR \
            RETURNING user_id, logon_name, full_name, email";
        Ok(self
            .query_opt(SQL, &[&logon_name, &change.full_name(), &change.email()])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(user_from_row))
    }
}

impl Database<Delete<By<User, user::LogonName>>> for Postgres {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<User, user::LogonName>>,
    ) -> Result<Self::Ok, Self::Err> {
        let logon_name = by.into_inner();

        const SQL: &str = "\
            DELETE FROM users \
            WHERE logon_name = $1::VARCHAR";
        self.exec(SQL, &[&logon_name])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
