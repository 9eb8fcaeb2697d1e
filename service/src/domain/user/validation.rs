//! Pure validation of [`Draft`] [`User`]s.
//!
//! [`User`]: super::User

use derive_more::{Display, Error};

use super::{Draft, Email, FullName, LogonName};

/// Field of a [`Draft`] being validated.
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    /// [`LogonName`] field.
    LogonName,

    /// [`FullName`] field.
    FullName,

    /// [`Email`] field.
    Email,
}

impl Field {
    /// Returns maximum length of this [`Field`] in characters.
    #[must_use]
    pub const fn max_length(self) -> usize {
        match self {
            Self::LogonName => LogonName::MAX_LENGTH,
            Self::FullName => FullName::MAX_LENGTH,
            Self::Email => Email::MAX_LENGTH,
        }
    }
}

/// Error of [`Draft`] validation.
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum ValidationError {
    /// [`Field`] exceeds its maximum length.
    #[display("{field} maximum length is {max}. Currently {actual}")]
    TooLong {
        /// Offending [`Field`].
        field: Field,

        /// Maximum allowed length.
        max: usize,

        /// Current length.
        actual: usize,
    },

    /// Required [`Field`] is absent or empty.
    #[display("{_0} is a required field")]
    Missing(#[error(not(source))] Field),

    /// Email address has an invalid format.
    #[display("'{_0}' not a valid email address field")]
    InvalidEmail(#[error(not(source))] String),

    /// Client tried to assign a `user_id`.
    #[display("user_id must not be supplied, it is assigned by the server")]
    UserIdSupplied,

    /// Client tried to change identity fields.
    #[display(
        "logon_name and user_id are not supported request body fields for \
         this operation"
    )]
    IdentityFieldsSupplied,

    /// Nothing to update.
    #[display("no updatable fields supplied")]
    NoUpdatableFields,
}

/// Returns the provided `value` if it's non-empty.
#[must_use]
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Checks that none of the [`Draft`] fields exceeds its maximum length.
///
/// # Errors
///
/// With [`ValidationError::TooLong`] naming the first offending [`Field`].
pub fn validate_field_lengths(draft: &Draft) -> Result<(), ValidationError> {
    let fields = [
        (Field::LogonName, &draft.logon_name),
        (Field::FullName, &draft.full_name),
        (Field::Email, &draft.email),
    ];
    for (field, value) in fields {
        let actual = value.as_deref().map_or(0, |v| v.chars().count());
        if actual > field.max_length() {
            return Err(ValidationError::TooLong {
                field,
                max: field.max_length(),
                actual,
            });
        }
    }
    Ok(())
}

/// Checks that the provided `address` is a well-formed [`Email`].
///
/// # Errors
///
/// With [`ValidationError::InvalidEmail`] if the `address` doesn't match
/// the `local-part@domain` grammar.
pub fn validate_email(address: &str) -> Result<Email, ValidationError> {
    if address.chars().count() > Email::MAX_LENGTH {
        return Err(ValidationError::TooLong {
            field: Field::Email,
            max: Email::MAX_LENGTH,
            actual: address.chars().count(),
        });
    }
    Email::new(address)
        .ok_or_else(|| ValidationError::InvalidEmail(address.to_owned()))
}

/// Checks that the client didn't assign a non-zero `user_id`.
///
/// # Errors
///
/// With [`ValidationError::UserIdSupplied`] otherwise.
pub fn reject_user_id(draft: &Draft) -> Result<(), ValidationError> {
    match draft.user_id {
        None | Some(0) => Ok(()),
        Some(_) => Err(ValidationError::UserIdSupplied),
    }
}

/// Checks that neither `user_id` nor `logon_name` is present in the
/// [`Draft`].
///
/// # Errors
///
/// With [`ValidationError::IdentityFieldsSupplied`] otherwise.
pub fn reject_identity_fields(draft: &Draft) -> Result<(), ValidationError> {
    if draft.user_id.is_some() || draft.logon_name.is_some() {
        return Err(ValidationError::IdentityFieldsSupplied);
    }
    Ok(())
}

/// Checks that all the [`Draft`] fields required for creation are present
/// and non-empty.
///
/// # Errors
///
/// With [`ValidationError::Missing`] naming the first absent [`Field`].
pub fn require_fields(draft: &Draft) -> Result<(), ValidationError> {
    let fields = [
        (Field::LogonName, &draft.logon_name),
        (Field::FullName, &draft.full_name),
        (Field::Email, &draft.email),
    ];
    for (field, value) in fields {
        if value.as_deref().map_or(true, str::is_empty) {
            return Err(ValidationError::Missing(field));
        }
    }
    Ok(())
}

/// Returns the non-empty `value` of a required [`Field`].
///
/// # Errors
///
/// With [`ValidationError::Missing`] if the `value` is absent or empty.
pub fn required(
    field: Field,
    value: Option<String>,
) -> Result<String, ValidationError> {
    non_empty(value).ok_or(ValidationError::Missing(field))
}

/// Parses a required [`LogonName`].
///
/// # Errors
///
/// If the `value` is absent, empty or too long.
pub fn logon_name(value: Option<String>) -> Result<LogonName, ValidationError> {
    let value = required(Field::LogonName, value)?;
    let actual = value.chars().count();
    LogonName::new(value).ok_or(ValidationError::TooLong {
        field: Field::LogonName,
        max: LogonName::MAX_LENGTH,
        actual,
    })
}

/// Parses an optional [`FullName`], treating an empty one as absent.
///
/// # Errors
///
/// If the `value` is too long.
pub fn full_name(
    value: Option<String>,
) -> Result<Option<FullName>, ValidationError> {
    non_empty(value)
        .map(|v| {
            let actual = v.chars().count();
            FullName::new(v).ok_or(ValidationError::TooLong {
                field: Field::FullName,
                max: FullName::MAX_LENGTH,
                actual,
            })
        })
        .transpose()
}

#[cfg(test)]
mod spec {
    use super::{
        full_name, logon_name, reject_identity_fields, reject_user_id,
        require_fields, validate_email, validate_field_lengths, Field,
        ValidationError,
    };
    use crate::domain::user::Draft;

    fn draft() -> Draft {
        Draft {
            user_id: None,
            logon_name: Some("t1".into()),
            full_name: Some("Test User 1".into()),
            email: Some("test@email.com".into()),
        }
    }

    #[test]
    fn accepts_fields_within_limits() {
        assert_eq!(validate_field_lengths(&draft()), Ok(()));
        assert_eq!(validate_field_lengths(&Draft::default()), Ok(()));
    }

    #[test]
    fn reports_too_long_field() {
        let mut d = draft();
        d.logon_name = Some("a".repeat(21));
        assert_eq!(
            validate_field_lengths(&d),
            Err(ValidationError::TooLong {
                field: Field::LogonName,
                max: 20,
                actual: 21,
            }),
        );

        let mut d = draft();
        d.full_name = Some("b".repeat(101));
        let err = validate_field_lengths(&d).unwrap_err();
        assert_eq!(
            err.to_string(),
            "full_name maximum length is 100. Currently 101",
        );

        let mut d = draft();
        d.email = Some(format!("{}@email.com", "c".repeat(100)));
        assert!(matches!(
            validate_field_lengths(&d),
            Err(ValidationError::TooLong {
                field: Field::Email,
                ..
            }),
        ));
    }

    #[test]
    fn counts_characters_not_bytes() {
        let mut d = draft();
        d.logon_name = Some("ü".repeat(20));
        assert_eq!(validate_field_lengths(&d), Ok(()));
    }

    #[test]
    fn validates_email_format() {
        assert!(validate_email("test@email.com").is_ok());
        assert_eq!(
            validate_email("not-an-email"),
            Err(ValidationError::InvalidEmail("not-an-email".into())),
        );
        assert!(validate_email("").is_err());
    }

    #[test]
    fn rejects_client_assigned_id() {
        let mut d = draft();
        assert_eq!(reject_user_id(&d), Ok(()));

        d.user_id = Some(0);
        assert_eq!(reject_user_id(&d), Ok(()));

        d.user_id = Some(7);
        assert_eq!(reject_user_id(&d), Err(ValidationError::UserIdSupplied));
    }

    #[test]
    fn rejects_identity_fields() {
        let d = Draft {
            email: Some("new@email.com".into()),
            ..Draft::default()
        };
        assert_eq!(reject_identity_fields(&d), Ok(()));

        assert_eq!(
            reject_identity_fields(&draft()),
            Err(ValidationError::IdentityFieldsSupplied),
        );
        assert_eq!(
            reject_identity_fields(&Draft {
                user_id: Some(3),
                ..Draft::default()
            }),
            Err(ValidationError::IdentityFieldsSupplied),
        );
    }

    #[test]
    fn requires_creation_fields() {
        assert_eq!(require_fields(&draft()), Ok(()));

        let mut d = draft();
        d.full_name = Some(String::new());
        assert_eq!(
            require_fields(&d),
            Err(ValidationError::Missing(Field::FullName)),
        );

        assert_eq!(
            require_fields(&Draft::default()),
            Err(ValidationError::Missing(Field::LogonName)),
        );
    }

    #[test]
    fn parses_fields() {
        assert!(logon_name(Some("t1".into())).is_ok());
        assert_eq!(
            logon_name(Some(String::new())),
            Err(ValidationError::Missing(Field::LogonName)),
        );
        assert_eq!(
            logon_name(None).unwrap_err().to_string(),
            "logon_name is a required field",
        );

        assert_eq!(full_name(None), Ok(None));
        assert_eq!(full_name(Some(String::new())), Ok(None));
        assert!(full_name(Some("Test".into())).unwrap().is_some());
    }
}
