//! [`User`]-related definitions.

use serde::{Deserialize, Serialize};
use service::domain::{self, user::Draft};

/// A [`User`] as exposed via the HTTP API.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct User {
    /// ID of this [`User`], omitted when zero.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub user_id: i32,

    /// Unique logon name of this [`User`].
    pub logon_name: String,

    /// Full name of this [`User`].
    pub full_name: String,

    /// Email address of this [`User`].
    pub email: String,
}

/// Checks whether the provided ID is zero.
#[expect(clippy::trivially_copy_pass_by_ref, reason = "serde signature")]
fn is_zero(id: &i32) -> bool {
    *id == 0
}

impl From<domain::User> for User {
    fn from(user: domain::User) -> Self {
        Self {
            user_id: user.id.into(),
            logon_name: user.logon_name.into(),
            full_name: user.full_name.into(),
            email: user.email.into(),
        }
    }
}

/// Request body of creating or updating a [`User`].
///
/// Every field is optional, so the validation rules decide what's required.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Payload {
    /// Client-supplied ID.
    pub user_id: Option<i64>,

    /// Logon name.
    pub logon_name: Option<String>,

    /// Full name.
    pub full_name: Option<String>,

    /// Email address.
    pub email: Option<String>,
}

impl From<Payload> for Draft {
    fn from(payload: Payload) -> Self {
        let Payload {
            user_id,
            logon_name,
            full_name,
            email,
        } = payload;
        Self {
            user_id,
            logon_name,
            full_name,
            email,
        }
    }
}

pub mod list {
    //! [`User`]s list definitions.

    use serde::{Deserialize, Serialize};
    use service::read::user::list::{self, Filter, Selector};

    use crate::{define_error, error::Kind, Error};

    use super::User;

    /// Raw query string parameters of listing [`User`]s.
    #[derive(Clone, Debug, Default, Deserialize)]
    pub struct RawParameters {
        /// Number of [`User`]s on a page.
        pub per_page: Option<String>,

        /// Requested page number.
        pub page: Option<String>,

        /// Substring of the full name to filter [`User`]s by.
        pub name_filter: Option<String>,
    }

    /// Validated query string parameters of listing [`User`]s.
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct Parameters {
        /// Pagination [`list::Arguments`].
        pub arguments: list::Arguments,

        /// Full name substring to filter by, if any.
        pub name_filter: Option<String>,
    }

    impl Parameters {
        /// Parses the provided [`RawParameters`].
        ///
        /// Absent or empty values take their defaults from the provided
        /// [`service::Config`].
        ///
        /// # Errors
        ///
        /// If `per_page` or `page` is not an integer within its range.
        pub fn parse(
            raw: RawParameters,
            config: &service::Config,
        ) -> Result<Self, Error> {
            let RawParameters {
                per_page,
                page,
                name_filter,
            } = raw;

            let max = config.max_per_page;
            let per_page = match per_page.filter(|v| !v.is_empty()) {
                None => config.default_per_page,
                Some(v) => v
                    .parse::<usize>()
                    .ok()
                    .filter(|n| (1..=max).contains(n))
                    .ok_or_else(|| {
                        Error::new(
                            Kind::InvalidParameter,
                            http::StatusCode::BAD_REQUEST,
                            format!(
                                "per_page query string must be an integer \
                                 between 1 and {max}",
                            ),
                        )
                    })?,
            };

            let page = match page.filter(|v| !v.is_empty()) {
                None => 1,
                Some(v) => v
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or(ParameterError::Page)?,
            };

            let arguments = list::Arguments::new(page, per_page)
                .ok_or(ParameterError::Page)?;

            Ok(Self {
                arguments,
                name_filter: name_filter.filter(|v| !v.is_empty()),
            })
        }
    }

    impl From<Parameters> for Selector {
        fn from(params: Parameters) -> Self {
            let Parameters {
                arguments,
                name_filter,
            } = params;
            Self {
                arguments,
                filter: Filter::new(name_filter, None).unwrap_or_default(),
            }
        }
    }

    /// Response of listing [`User`]s.
    #[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
    pub struct Response {
        /// [`User`]s on the requested page.
        pub users: Vec<User>,

        /// Total number of pages.
        pub total_pages: usize,

        /// Number of the requested page.
        pub current_page: usize,

        /// Indicator whether there are pages after the requested one.
        pub more_pages: bool,
    }

    impl From<list::Page> for Response {
        fn from(page: list::Page) -> Self {
            let common::pagination::Page {
                items,
                total_pages,
                current_page,
                more_pages,
            } = page;
            Self {
                users: items.into_iter().map(Into::into).collect(),
                total_pages,
                current_page,
                more_pages,
            }
        }
    }

    define_error! {
        enum ParameterError {
            #[kind = InvalidParameter]
            #[status = BAD_REQUEST]
            #[message = "page query string must be a positive integer"]
            Page,
        }
    }

}
