//! Health check definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Name of this component reported by health checks.
pub const COMPONENT_NAME: &str = "user-mgmt-service-api";

/// Overall health status.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Every dependency is reachable.
    Ok,

    /// Some dependency is unreachable.
    Unavailable,
}

/// Component reporting its health.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Component {
    /// Name of the component.
    pub name: String,

    /// Version of the component.
    pub version: String,
}

impl Default for Component {
    fn default() -> Self {
        Self {
            name: COMPONENT_NAME.to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

/// Response of a health check.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Response {
    /// Overall [`Status`].
    pub status: Status,

    /// [`Component`] being checked.
    pub component: Component,

    /// Failures of the unreachable dependencies by their names.
    pub failures: BTreeMap<String, String>,
}

impl Response {
    /// Creates a new [`Response`] out of the provided `failures`.
    #[must_use]
    pub fn new(failures: BTreeMap<String, String>) -> Self {
        Self {
            status: if failures.is_empty() {
                Status::Ok
            } else {
                Status::Unavailable
            },
            component: Component::default(),
            failures,
        }
    }

    /// Returns [`http::StatusCode`] of this [`Response`].
    #[must_use]
    pub fn status_code(&self) -> http::StatusCode {
        match self.status {
            Status::Ok => http::StatusCode::OK,
            Status::Unavailable => http::StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}
