//! HTTP API definitions.

pub mod health;
mod mutation;
mod query;
pub mod user;

pub use self::{
    mutation::{create_user, delete_user, update_user},
    query::{check_health, list_users},
    user::User,
};
