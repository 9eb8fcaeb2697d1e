//! HTTP handlers changing [`User`]s.
//!
//! [`User`]: api::User

use axum::{body::Bytes, extract::Path, Json};
use axum_extra::extract::WithRejection;
use service::{command, domain::user, query, Command as _};

use crate::{
    api::{self, user::Payload},
    error::Kind,
    AsError, Context, Error,
};

/// Decodes the provided JSON request `body` into a [`Payload`].
///
/// Only a JSON object is accepted, as [`Payload`] fields are never
/// positional.
fn decode(body: &[u8]) -> Result<Payload, Error> {
    let value = serde_json::from_slice::<serde_json::Value>(body)
        .map_err(|e| Error::unmarshalling(&e))?;
    if !value.is_object() {
        return Err(Error::unmarshalling(&"expected a JSON object"));
    }
    serde_json::from_value(value).map_err(|e| Error::unmarshalling(&e))
}

/// Creates a [`Kind::NotFound`] [`Error`] for the provided `logon_name`.
fn not_exists(logon_name: &str, action: &str) -> Error {
    Error::new(
        Kind::NotFound,
        http::StatusCode::NOT_FOUND,
        format!("'{logon_name}' does not exist. No {action} required"),
    )
}

/// Creates a new [`api::User`].
///
/// # Errors
///
/// - `400` if the body is malformed, invalid or its `logon_name` is taken;
/// - `500` if the storage fails.
#[tracing::instrument(skip_all, fields(http.handler = "createUser"))]
pub async fn create_user(
    ctx: Context,
    body: Bytes,
) -> Result<(http::StatusCode, Json<api::User>), Error> {
    let payload = decode(&body)?;

    let user = ctx
        .service()
        .execute(command::CreateUser {
            draft: payload.into(),
        })
        .await
        .map_err(AsError::into_error)?;

    tracing::info!(
        user_id = %user.id,
        logon_name = %user.logon_name,
        "created user",
    );

    Ok((http::StatusCode::CREATED, Json(user.into())))
}

/// Updates full name and/or email of an existing [`api::User`].
///
/// # Errors
///
/// - `404` if the [`api::User`] doesn't exist;
/// - `400` if the body is malformed or invalid;
/// - `500` if the storage fails.
#[tracing::instrument(
    skip_all,
    fields(http.handler = "updateUser", logon_name = %logon_name),
)]
pub async fn update_user(
    ctx: Context,
    WithRejection(Path(logon_name), _): WithRejection<Path<String>, Error>,
    body: Bytes,
) -> Result<Json<api::User>, Error> {
    let name = user::LogonName::new(logon_name.as_str())
        .ok_or_else(|| not_exists(&logon_name, "action"))?;

    let exists = ctx
        .service()
        .execute(query::user::Exists(name.clone()))
        .await
        .map_err(AsError::into_error)?;
    if !exists {
        return Err(not_exists(&logon_name, "action"));
    }

    let payload = decode(&body)?;

    ctx.service()
        .execute(command::UpdateUser {
            logon_name: name,
            draft: payload.into(),
        })
        .await
        .map_err(AsError::into_error)
        .map(|u| Json(u.into()))
}

/// Deletes an existing [`api::User`].
///
/// # Errors
///
/// - `404` if the [`api::User`] doesn't exist;
/// - `500` if the storage fails.
#[tracing::instrument(
    skip_all,
    fields(http.handler = "deleteUser", logon_name = %logon_name),
)]
pub async fn delete_user(
    ctx: Context,
    WithRejection(Path(logon_name), _): WithRejection<Path<String>, Error>,
) -> Result<http::StatusCode, Error> {
    let name = user::LogonName::new(logon_name.as_str())
        .ok_or_else(|| not_exists(&logon_name, "deletion"))?;

    ctx.service()
        .execute(command::DeleteUser { logon_name: name })
        .await
        .map_err(AsError::into_error)?;

    Ok(http::StatusCode::NO_CONTENT)
}
