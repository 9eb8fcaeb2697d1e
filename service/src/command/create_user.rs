//! [`Command`] for creating a new [`User`].

use common::operations::{By, Insert, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        user::{
            self,
            validation::{self, Field, ValidationError},
            Draft, NewUser,
        },
        User,
    },
    infra::{database, Database},
    query,
    read::user::list::{Filter, TotalCount},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`User`] out of a client-supplied
/// [`Draft`].
#[derive(Clone, Debug)]
pub struct CreateUser {
    /// [`Draft`] of a new [`User`].
    pub draft: Draft,
}

impl<Db> Command<CreateUser> for Service<Db>
where
    Db: Database<
            Select<By<TotalCount, Filter>>,
            Ok = TotalCount,
            Err = Traced<database::Error>,
        > + Database<Insert<NewUser>, Ok = User, Err = Traced<database::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateUser { draft } = cmd;

        validation::validate_field_lengths(&draft)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        validation::reject_user_id(&draft)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        validation::require_fields(&draft)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let Draft {
            logon_name,
            full_name,
            email,
            ..
        } = draft;
        let email = validation::required(Field::Email, email)
            .and_then(|e| validation::validate_email(&e))
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let logon_name = validation::logon_name(logon_name)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let full_name = validation::full_name(full_name)
            .map_err(tracerr::from_and_wrap!(=> E))?
            .ok_or(E::Invalid(ValidationError::Missing(Field::FullName)))
            .map_err(tracerr::wrap!())?;

        let taken = self
            .execute(query::user::Exists(logon_name.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if taken {
            return Err(tracerr::new!(E::LogonNameTaken(logon_name)));
        }

        let new = NewUser {
            logon_name: logon_name.clone(),
            full_name,
            email,
        };
        match self.database().execute(Insert(new)).await {
            Ok(user) => Ok(user),
            // Concurrently created `User` with the same `user::LogonName`.
            Err(e) if e.as_ref().is_unique_violation() => {
                Err(tracerr::new!(E::LogonNameTaken(logon_name)))
            }
            Err(e) => Err(e).map_err(tracerr::map_from_and_wrap!(=> E)),
        }
    }
}

/// Error of [`CreateUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Draft`] is invalid.
    #[display("{_0}")]
    #[from]
    Invalid(ValidationError),

    /// [`user::LogonName`] is already taken.
    #[display("logon_name '{_0}' already taken. Please choose another one")]
    LogonNameTaken(#[error(not(source))] user::LogonName),
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Insert, Select};
    use tracerr::Traced;

    use crate::{
        domain::{
            user::{
                validation::{Field, ValidationError},
                Draft, Email, FullName, LogonName, NewUser,
            },
            User,
        },
        infra::{database, Database, Memory},
        read::user::list::{Filter, TotalCount},
        Command as _, Config, Service,
    };

    use super::{CreateUser, ExecutionError};

    /// [`Memory`] never seeing existing [`User`]s when counting, as if
    /// they were created concurrently after the check.
    #[derive(Debug)]
    struct Racy(Memory);

    impl Database<Select<By<TotalCount, Filter>>> for Racy {
        type Ok = TotalCount;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            _: Select<By<TotalCount, Filter>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(0_usize.into())
        }
    }

    impl Database<Insert<NewUser>> for Racy {
        type Ok = User;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            op: Insert<NewUser>,
        ) -> Result<Self::Ok, Self::Err> {
            self.0.execute(op).await
        }
    }

    fn service() -> Service<Memory> {
        let db = Memory::from_users([NewUser {
            logon_name: LogonName::new("t1").unwrap(),
            full_name: FullName::new("Test User 1").unwrap(),
            email: Email::new("test@email.com").unwrap(),
        }])
        .unwrap();
        Service::new(Config::default(), db)
    }

    fn draft(logon_name: &str) -> Draft {
        Draft {
            user_id: None,
            logon_name: Some(logon_name.into()),
            full_name: Some("Test User".into()),
            email: Some("test@email.com".into()),
        }
    }

    #[tokio::test]
    async fn creates_user_with_assigned_id() {
        let svc = service();

        let user = svc
            .execute(CreateUser { draft: draft("t2") })
            .await
            .unwrap();
        assert_eq!(i32::from(user.id), 2);
        assert_eq!(user.logon_name.to_string(), "t2");
    }

    #[tokio::test]
    async fn rejects_taken_logon_name() {
        let svc = service();

        let err = svc
            .execute(CreateUser { draft: draft("t1") })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::LogonNameTaken(_)));
        assert!(err.as_ref().to_string().contains("already taken"));
    }

    #[tokio::test]
    async fn translates_storage_unique_violation() {
        let db = Memory::from_users([NewUser {
            logon_name: LogonName::new("t1").unwrap(),
            full_name: FullName::new("Test User 1").unwrap(),
            email: Email::new("test@email.com").unwrap(),
        }])
        .unwrap();
        let svc = Service::new(Config::default(), Racy(db));

        let err = svc
            .execute(CreateUser { draft: draft("t1") })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::LogonNameTaken(_)));
        assert_eq!(
            err.as_ref().to_string(),
            "logon_name 't1' already taken. Please choose another one",
        );

        assert!(svc
            .execute(CreateUser { draft: draft("t2") })
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn validates_in_order() {
        let svc = service();

        let mut d = draft(&"a".repeat(21));
        d.user_id = Some(5);
        let err = svc.execute(CreateUser { draft: d }).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::Invalid(ValidationError::TooLong {
                field: Field::LogonName,
                ..
            }),
        ));

        let mut d = draft("t2");
        d.user_id = Some(5);
        d.email = Some("invalid".into());
        let err = svc.execute(CreateUser { draft: d }).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::Invalid(ValidationError::UserIdSupplied),
        ));

        let mut d = draft("t2");
        d.email = Some("invalid".into());
        let err = svc.execute(CreateUser { draft: d }).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::Invalid(ValidationError::InvalidEmail(_)),
        ));

        let mut d = draft("t2");
        d.full_name = None;
        let err = svc.execute(CreateUser { draft: d }).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::Invalid(ValidationError::Missing(Field::FullName)),
        ));
    }

    #[tokio::test]
    async fn accepts_zero_user_id() {
        let svc = service();

        let mut d = draft("t3");
        d.user_id = Some(0);
        assert!(svc.execute(CreateUser { draft: d }).await.is_ok());
    }
}
