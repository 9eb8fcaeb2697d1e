//! [`Query`] definition.

pub mod health;
pub mod user;
pub mod users;

/// [`Query`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Query;
