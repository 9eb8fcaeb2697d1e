//! [`User`] read model definition.
//!
//! [`User`]: crate::domain::User

pub mod list {
    //! [`User`]s list definitions.

    use common::define_pagination;
    use derive_more::{Display, From, Into};

    use crate::domain::{user, User};

    define_pagination!(User, Filter);

    /// Filter for [`Selector`].
    ///
    /// Filtering by both [`user::FullName`] and [`user::LogonName`] at once
    /// is not supported.
    #[derive(Clone, Debug, Default, Eq, PartialEq)]
    pub enum Filter {
        /// No filtering.
        #[default]
        All,

        /// [`User`]s whose full name contains the provided substring.
        FullName(String),

        /// [`User`] with exactly the provided [`user::LogonName`].
        LogonName(user::LogonName),
    }

    impl Filter {
        /// Creates a new [`Filter`] out of the provided optional criteria.
        ///
        /// [`None`] is returned if both criteria are provided.
        #[must_use]
        pub fn new(
            full_name: Option<String>,
            logon_name: Option<user::LogonName>,
        ) -> Option<Self> {
            match (full_name, logon_name) {
                (Some(_), Some(_)) => None,
                (Some(name), None) => Some(Self::FullName(name)),
                (None, Some(logon)) => Some(Self::LogonName(logon)),
                (None, None) => Some(Self::All),
            }
        }

        /// Checks whether the provided [`User`] matches this [`Filter`].
        #[must_use]
        pub fn matches(&self, user: &User) -> bool {
            match self {
                Self::All => true,
                Self::FullName(part) => {
                    AsRef::<str>::as_ref(&user.full_name).contains(part.as_str())
                }
                Self::LogonName(logon) => &user.logon_name == logon,
            }
        }
    }

    /// Total count of [`User`]s matching a [`Filter`].
    #[derive(
        Clone, Copy, Debug, Display, Eq, From, Hash, Into, Ord, PartialEq,
        PartialOrd,
    )]
    pub struct TotalCount(usize);

    #[cfg(test)]
    mod spec {
        use super::Filter;
        use crate::domain::user::LogonName;

        #[test]
        fn rejects_both_criteria() {
            let logon = LogonName::new("t1").unwrap();

            assert_eq!(Filter::new(None, None), Some(Filter::All));
            assert_eq!(
                Filter::new(Some("Test".into()), None),
                Some(Filter::FullName("Test".into())),
            );
            assert_eq!(
                Filter::new(None, Some(logon.clone())),
                Some(Filter::LogonName(logon.clone())),
            );
            assert_eq!(Filter::new(Some("Test".into()), Some(logon)), None);
        }
    }
}
