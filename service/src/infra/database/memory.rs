//! In-memory [`Database`] implementation.

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use common::operations::{By, Delete, Insert, Perform, Select, Update};
use derive_more::{Display, Error as StdError};
use tokio::sync::RwLock;
use tracerr::Traced;

use crate::{
    domain::{
        user::{self, NewUser, Patch},
        User,
    },
    infra::database::{self, Database, Ping},
    read::user::list::{Filter, Selector, TotalCount},
};

/// In-memory [`Database`].
///
/// Clones share the same underlying storage.
#[derive(Clone, Debug)]
pub struct Memory {
    /// Stored [`User`]s.
    state: Arc<RwLock<State>>,

    /// Indicator whether this [`Memory`] accepts operations.
    available: Arc<AtomicBool>,
}

/// Contents of a [`Memory`] database.
#[derive(Debug, Default)]
struct State {
    /// Last assigned [`user::Id`].
    last_id: i32,

    /// Stored [`User`]s ordered by their [`user::Id`]s.
    users: BTreeMap<user::Id, User>,
}

impl State {
    /// Stores the provided [`NewUser`] assigning a new [`user::Id`] to it.
    fn insert(&mut self, user: NewUser) -> Result<User, Error> {
        if self.users.values().any(|u| u.logon_name == user.logon_name) {
            return Err(Error::UniqueViolation(user.logon_name));
        }
        self.last_id += 1;
        let user = user.with_id(self.last_id.into());
        drop(self.users.insert(user.id, user.clone()));
        Ok(user)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self {
            state: Arc::default(),
            available: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl Memory {
    /// Creates a new empty [`Memory`] database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new [`Memory`] database pre-populated with the provided
    /// [`NewUser`]s, assigning their [`user::Id`]s sequentially.
    ///
    /// # Errors
    ///
    /// If the provided [`NewUser`]s have duplicated [`user::LogonName`]s.
    pub fn from_users(
        users: impl IntoIterator<Item = NewUser>,
    ) -> Result<Self, Error> {
        let mut state = State::default();
        for user in users {
            _ = state.insert(user)?;
        }
        Ok(Self {
            state: Arc::new(RwLock::new(state)),
            ..Self::default()
        })
    }

    /// Makes this [`Memory`] database (un)available, emulating an outage.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Checks whether this [`Memory`] database is available.
    fn ensure_available(&self) -> Result<(), Traced<database::Error>> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(tracerr::new!(database::Error::from(Error::Unavailable)))
        }
    }
}

/// [`Memory`] database error.
#[derive(Clone, Debug, Display, StdError)]
pub enum Error {
    /// [`Memory`] database is unavailable.
    #[display("`Memory` database is unavailable")]
    Unavailable,

    /// [`user::LogonName`] is already stored.
    #[display("`{_0}` logon name is already stored")]
    UniqueViolation(#[error(not(source))] user::LogonName),
}

impl Error {
    /// Checks whether this [`Error`] is a uniqueness violation.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }
}

impl Database<Select<By<TotalCount, Filter>>> for Memory {
    type Ok = TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<TotalCount, Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.ensure_available().map_err(tracerr::wrap!())?;

        let filter = by.into_inner();
        let state = self.state.read().await;
        Ok(state.users.values().filter(|u| filter.matches(u)).count().into())
    }
}

impl Database<Select<By<Vec<User>, Selector>>> for Memory {
    type Ok = Vec<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<User>, Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.ensure_available().map_err(tracerr::wrap!())?;

        let Selector { arguments, filter } = by.into_inner();
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .filter(|u| filter.matches(u))
            .skip(arguments.offset())
            .take(arguments.limit())
            .cloned()
            .collect())
    }
}

impl Database<Insert<NewUser>> for Memory {
    type Ok = User;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(user): Insert<NewUser>,
    ) -> Result<Self::Ok, Self::Err> {
        self.ensure_available().map_err(tracerr::wrap!())?;

        self.state
            .write()
            .await
            .insert(user)
            .map_err(tracerr::from_and_wrap!(=> database::Error))
    }
}

impl Database<Update<Patch>> for Memory {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(patch): Update<Patch>,
    ) -> Result<Self::Ok, Self::Err> {
        self.ensure_available().map_err(tracerr::wrap!())?;

        let mut state = self.state.write().await;
        Ok(state
            .users
            .values_mut()
            .find(|u| u.logon_name == patch.logon_name)
            .map(|user| {
                patch.apply(user);
                user.clone()
            }))
    }
}

impl Database<Delete<By<User, user::LogonName>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<User, user::LogonName>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.ensure_available().map_err(tracerr::wrap!())?;

        let logon_name = by.into_inner();
        self.state
            .write()
            .await
            .users
            .retain(|_, u| u.logon_name != logon_name);
        Ok(())
    }
}

impl Database<Perform<Ping>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Perform<Ping>) -> Result<Self::Ok, Self::Err> {
        self.ensure_available().map_err(tracerr::wrap!())
    }
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Delete, Insert, Perform, Select, Update};

    use crate::{
        domain::user::{Email, FullName, LogonName, NewUser, Patch},
        infra::database::{Database as _, Ping},
        read::user::list::{Arguments, Filter, Selector, TotalCount},
    };

    use super::Memory;

    fn new_user(n: usize) -> NewUser {
        NewUser {
            logon_name: LogonName::new(format!("t{n}")).unwrap(),
            full_name: FullName::new(format!("Test User {n}")).unwrap(),
            email: Email::new("test@email.com").unwrap(),
        }
    }

    #[tokio::test]
    async fn assigns_sequential_ids() {
        let db = Memory::from_users((1..=2).map(new_user)).unwrap();

        let user = db.execute(Insert(new_user(3))).await.unwrap();
        assert_eq!(i32::from(user.id), 3);

        let count = db
            .execute(Select(By::<TotalCount, _>::new(Filter::All)))
            .await
            .unwrap();
        assert_eq!(usize::from(count), 3);
    }

    #[tokio::test]
    async fn rejects_duplicated_logon_name() {
        assert!(Memory::from_users([new_user(1), new_user(1)]).is_err());

        let db = Memory::from_users([new_user(1)]).unwrap();
        let err = db.execute(Insert(new_user(1))).await.unwrap_err();
        assert!(err.as_ref().is_unique_violation());
    }

    #[tokio::test]
    async fn selects_filtered_pages() {
        let db = Memory::from_users((1..=12).map(new_user)).unwrap();

        let page = db
            .execute(Select(By::<Vec<_>, _>::new(Selector {
                arguments: Arguments::new(2, 5).unwrap(),
                filter: Filter::All,
            })))
            .await
            .unwrap();
        let logons = page
            .iter()
            .map(|u| u.logon_name.to_string())
            .collect::<Vec<_>>();
        assert_eq!(logons, ["t6", "t7", "t8", "t9", "t10"]);

        let count = db
            .execute(Select(By::<TotalCount, _>::new(Filter::FullName(
                "User 1".into(),
            ))))
            .await
            .unwrap();
        assert_eq!(usize::from(count), 4);
    }

    #[tokio::test]
    async fn updates_and_deletes() {
        let db = Memory::from_users([new_user(1)]).unwrap();
        let logon = LogonName::new("t1").unwrap();

        let patch = Patch::new(
            logon.clone(),
            None,
            Some(Email::new("new@email.com").unwrap()),
        )
        .unwrap();
        let updated = db.execute(Update(patch)).await.unwrap().unwrap();
        assert_eq!(AsRef::<str>::as_ref(&updated.email), "new@email.com");
        assert_eq!(AsRef::<str>::as_ref(&updated.full_name), "Test User 1");

        db.execute(Delete(By::new(logon.clone()))).await.unwrap();
        let patch = Patch::new(
            logon,
            Some(FullName::new("Other").unwrap()),
            None,
        )
        .unwrap();
        assert!(db.execute(Update(patch)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn emulates_outage() {
        let db = Memory::new();
        assert!(db.execute(Perform(Ping)).await.is_ok());

        db.set_available(false);
        assert!(db.execute(Perform(Ping)).await.is_err());
        assert!(db.execute(Insert(new_user(1))).await.is_err());

        db.set_available(true);
        assert!(db.execute(Insert(new_user(1))).await.is_ok());
    }
}
