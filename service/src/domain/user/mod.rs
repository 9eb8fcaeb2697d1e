//! [`User`] definitions.

pub mod validation;

use std::{str::FromStr, sync::LazyLock};

use derive_more::{AsRef, Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;

/// Platform user.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct User {
    /// ID of this [`User`], assigned by the storage.
    pub id: Id,

    /// [`LogonName`] of this [`User`].
    pub logon_name: LogonName,

    /// [`FullName`] of this [`User`].
    pub full_name: FullName,

    /// [`Email`] of this [`User`].
    pub email: Email,
}

/// ID of a [`User`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    From,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(i32);

/// Logon name of a [`User`].
///
/// Unique across all [`User`]s and immutable once created.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Into, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct LogonName(String);

impl LogonName {
    /// Maximum length of a [`LogonName`] in characters.
    pub const MAX_LENGTH: usize = 20;

    /// Creates a new [`LogonName`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`LogonName`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        !name.is_empty() && name.chars().count() <= Self::MAX_LENGTH
    }
}

impl FromStr for LogonName {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `LogonName`")
    }
}

/// Full name of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, Into, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct FullName(String);

impl FullName {
    /// Maximum length of a [`FullName`] in characters.
    pub const MAX_LENGTH: usize = 100;

    /// Creates a new [`FullName`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`FullName`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        !name.is_empty() && name.chars().count() <= Self::MAX_LENGTH
    }
}

impl FromStr for FullName {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `FullName`")
    }
}

/// Email address of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, Into, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Email(String);

impl Email {
    /// Maximum length of an [`Email`] in characters.
    pub const MAX_LENGTH: usize = 100;

    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        (address.chars().count() <= Self::MAX_LENGTH
            && Self::check(&address))
        .then_some(Self(address))
    }

    /// Checks whether the given `address` has a valid [`Email`] format.
    ///
    /// Length is not checked.
    pub(crate) fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(
                "^([^\\x00-\\x20\\x22\\x28\\x29\\x2c\\x2e\\x3a-\
                     \\x3c\\x3e\\x40\\x5b-\\x5d\\x7f-\\xff]+\
                  |\\x22([^\\x0d\\x22\\x5c\\x80-\\xff]\
                  |\\x5c[\\x00-\\x7f])*\\x22)\
                  (\\x2e([^\\x00-\\x20\\x22\\x28\\x29\\x2c\\x2e\\x3a-\
                           \\x3c\\x3e\\x40\\x5b-\\x5d\\x7f-\\xff]+\
                        |\\x22([^\\x0d\\x22\\x5c\\x80-\\xff]\
                        |\\x5c[\\x00-\\x7f])*\\x22))*\\x40\
                  ([^\\x00-\\x20\\x22\\x28\\x29\\x2c\\x2e\\x3a-\
                     \\x3c\\x3e\\x40\\x5b-\\x5d\\x7f-\\xff]+\
                  |\\x5b([^\\x0d\\x5b-\\x5d\\x80-\\xff]\
                        |\\x5c[\\x00-\\x7f])*\\x5d)\
                  (\\x2e([^\\x00-\\x20\\x22\\x28\\x29\\x2c\\x2e\\x3a-\
                           \\x3c\\x3e\\x40\\x5b-\\x5d\\x7f-\\xff]+\
                        |\\x5b([^\\x0d\\x5b-\\x5d\\x80-\\xff]\
                        |\\x5c[\\x00-\\x7f])*\\x5d))*$",
            )
            .expect("valid regex")
        });

        REGEX.is_match(address.as_ref())
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

/// Candidate [`User`] as supplied by a client, before any validation.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Draft {
    /// Client-supplied ID, which is never accepted.
    pub user_id: Option<i64>,

    /// Raw [`LogonName`], if any.
    pub logon_name: Option<String>,

    /// Raw [`FullName`], if any.
    pub full_name: Option<String>,

    /// Raw [`Email`], if any.
    pub email: Option<String>,
}

/// Validated [`User`] to be inserted, without an [`Id`] yet.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewUser {
    /// [`LogonName`] of the new [`User`].
    pub logon_name: LogonName,

    /// [`FullName`] of the new [`User`].
    pub full_name: FullName,

    /// [`Email`] of the new [`User`].
    pub email: Email,
}

impl NewUser {
    /// Turns this [`NewUser`] into a [`User`] with the provided [`Id`].
    #[must_use]
    pub fn with_id(self, id: Id) -> User {
        let Self {
            logon_name,
            full_name,
            email,
        } = self;
        User {
            id,
            logon_name,
            full_name,
            email,
        }
    }
}

/// Partial update of an existing [`User`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Patch {
    /// [`LogonName`] of the [`User`] to update.
    pub logon_name: LogonName,

    /// [`Change`] to apply.
    pub change: Change,
}

impl Patch {
    /// Creates a new [`Patch`] out of the provided optional fields.
    ///
    /// [`None`] is returned if there is nothing to update.
    #[must_use]
    pub fn new(
        logon_name: LogonName,
        full_name: Option<FullName>,
        email: Option<Email>,
    ) -> Option<Self> {
        let change = match (full_name, email) {
            (Some(full_name), Some(email)) => Change::Both { full_name, email },
            (Some(full_name), None) => Change::FullName(full_name),
            (None, Some(email)) => Change::Email(email),
            (None, None) => return None,
        };
        Some(Self { logon_name, change })
    }

    /// Applies this [`Patch`] to the provided [`User`].
    pub fn apply(self, user: &mut User) {
        match self.change {
            Change::Both { full_name, email } => {
                user.full_name = full_name;
                user.email = email;
            }
            Change::FullName(full_name) => user.full_name = full_name,
            Change::Email(email) => user.email = email,
        }
    }
}

/// Set of [`User`] fields changed by a [`Patch`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Change {
    /// Both [`FullName`] and [`Email`] are changed.
    Both {
        /// New [`FullName`].
        full_name: FullName,

        /// New [`Email`].
        email: Email,
    },

    /// Only [`FullName`] is changed.
    FullName(FullName),

    /// Only [`Email`] is changed.
    Email(Email),
}

impl Change {
    /// Returns the new [`FullName`], if it's changed.
    #[must_use]
    pub fn full_name(&self) -> Option<&FullName> {
        match self {
            Self::Both { full_name, .. } | Self::FullName(full_name) => {
                Some(full_name)
            }
            Self::Email(_) => None,
        }
    }

    /// Returns the new [`Email`], if it's changed.
    #[must_use]
    pub fn email(&self) -> Option<&Email> {
        match self {
            Self::Both { email, .. } | Self::Email(email) => Some(email),
            Self::FullName(_) => None,
        }
    }
}

#[cfg(test)]
mod spec {
    use super::{Change, Email, FullName, LogonName, Patch};

    #[test]
    fn logon_name_length() {
        assert!(LogonName::new("t1").is_some());
        assert!(LogonName::new("a".repeat(20)).is_some());
        assert!(LogonName::new("a".repeat(21)).is_none());
        assert!(LogonName::new("").is_none());
    }

    #[test]
    fn email_format() {
        assert!(Email::new("test@email.com").is_some());
        assert!(Email::new("first.last@sub.example.org").is_some());
        assert!(Email::new("not-an-email").is_none());
        assert!(Email::new("@email.com").is_none());
        assert!(Email::new("test@").is_none());
        assert!(Email::new("").is_none());
        assert!(Email::new(format!("{}@email.com", "a".repeat(95))).is_none());
    }

    #[test]
    fn patch_requires_a_change() {
        let name = LogonName::new("testuser9").unwrap();

        assert!(Patch::new(name.clone(), None, None).is_none());

        let patch = Patch::new(
            name.clone(),
            None,
            Some(Email::new("new@email.com").unwrap()),
        )
        .unwrap();
        assert_eq!(patch.change.full_name(), None);
        assert_eq!(
            patch.change.email().map(AsRef::<str>::as_ref),
            Some("new@email.com"),
        );

        let patch = Patch::new(
            name,
            Some(FullName::new("Test User").unwrap()),
            Some(Email::new("new@email.com").unwrap()),
        )
        .unwrap();
        assert!(matches!(patch.change, Change::Both { .. }));
    }
}
