//! [`Command`] for partially updating an existing [`User`].

use common::operations::Update;
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        user::{
            self,
            validation::{self, ValidationError},
            Draft, Patch,
        },
        User,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating [`user::FullName`] and/or [`user::Email`] of an
/// existing [`User`].
#[derive(Clone, Debug)]
pub struct UpdateUser {
    /// [`user::LogonName`] of the [`User`] to update.
    pub logon_name: user::LogonName,

    /// [`Draft`] with the fields to update.
    ///
    /// Empty fields are treated as absent.
    pub draft: Draft,
}

impl<Db> Command<UpdateUser> for Service<Db>
where
    Db: Database<Update<Patch>, Ok = Option<User>, Err = Traced<database::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateUser { logon_name, draft } = cmd;

        validation::validate_field_lengths(&draft)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        validation::reject_identity_fields(&draft)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let Draft {
            full_name, email, ..
        } = draft;
        let email = validation::non_empty(email)
            .map(|e| validation::validate_email(&e))
            .transpose()
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let full_name = validation::full_name(full_name)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let patch = Patch::new(logon_name.clone(), full_name, email)
            .ok_or(E::Invalid(ValidationError::NoUpdatableFields))
            .map_err(tracerr::wrap!())?;

        tracing::debug!(%logon_name, ?patch.change, "updating user");

        self.database()
            .execute(Update(patch))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(logon_name))
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`UpdateUser`] [`Command`] execution.
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

    /// [`User`] with the provided [`user::LogonName`] doesn't exist.
    #[display("'{_0}' does not exist. No action required")]
    UserNotExists(#[error(not(source))] user::LogonName),
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::user::{
            validation::ValidationError, Draft, Email, FullName, LogonName,
            NewUser,
        },
        infra::Memory,
        Command as _, Config, Service,
    };

    use super::{ExecutionError, UpdateUser};

    fn service() -> Service<Memory> {
        let db = Memory::from_users([NewUser {
            logon_name: LogonName::new("testuser9").unwrap(),
            full_name: FullName::new("Test User 9").unwrap(),
            email: Email::new("test@email.com").unwrap(),
        }])
        .unwrap();
        Service::new(Config::default(), db)
    }

    fn update(logon_name: &str, draft: Draft) -> UpdateUser {
        UpdateUser {
            logon_name: LogonName::new(logon_name).unwrap(),
            draft,
        }
    }

    #[tokio::test]
    async fn updates_only_email() {
        let svc = service();

        let user = svc
            .execute(update(
                "testuser9",
                Draft {
                    email: Some("new@email.com".into()),
                    ..Draft::default()
                },
            ))
            .await
            .unwrap();
        assert_eq!(user.email.to_string(), "new@email.com");
        assert_eq!(user.full_name.to_string(), "Test User 9");
    }

    #[tokio::test]
    async fn treats_empty_fields_as_absent() {
        let svc = service();

        let user = svc
            .execute(update(
                "testuser9",
                Draft {
                    full_name: Some("New Name".into()),
                    email: Some(String::new()),
                    ..Draft::default()
                },
            ))
            .await
            .unwrap();
        assert_eq!(user.full_name.to_string(), "New Name");
        assert_eq!(user.email.to_string(), "test@email.com");

        let err = svc
            .execute(update(
                "testuser9",
                Draft {
                    full_name: Some(String::new()),
                    ..Draft::default()
                },
            ))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::Invalid(ValidationError::NoUpdatableFields),
        ));
    }

    #[tokio::test]
    async fn rejects_identity_fields() {
        let svc = service();

        let err = svc
            .execute(update(
                "testuser9",
                Draft {
                    user_id: Some(1),
                    email: Some("new@email.com".into()),
                    ..Draft::default()
                },
            ))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::Invalid(ValidationError::IdentityFieldsSupplied),
        ));
    }

    #[tokio::test]
    async fn reports_missing_user() {
        let svc = service();

        let err = svc
            .execute(update(
                "unknown",
                Draft {
                    email: Some("new@email.com".into()),
                    ..Draft::default()
                },
            ))
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::UserNotExists(_)));
        assert_eq!(
            err.as_ref().to_string(),
            "'unknown' does not exist. No action required",
        );
    }
}
