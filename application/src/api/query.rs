//! HTTP handlers reading [`User`]s.
//!
//! [`User`]: crate::api::User

use std::collections::BTreeMap;

use axum::{extract::Query, Json};
use axum_extra::extract::WithRejection;
use service::{query, Query as _};

use crate::{
    api::{health, user::list},
    AsError, Context, Error,
};

/// Lists a page of [`User`]s.
///
/// [`User`]: crate::api::User
///
/// # Errors
///
/// - `400` if the query string parameters are malformed;
/// - `404` if the requested page is beyond the last one;
/// - `500` if the storage fails.
#[tracing::instrument(
    skip_all,
    fields(
        http.handler = "listUsers",
        name_filter = ?raw.name_filter,
        page = ?raw.page,
        per_page = ?raw.per_page,
    ),
)]
pub async fn list_users(
    ctx: Context,
    WithRejection(Query(raw), _): WithRejection<
        Query<list::RawParameters>,
        Error,
    >,
) -> Result<Json<list::Response>, Error> {
    let params = list::Parameters::parse(raw, ctx.service().config())?;

    ctx.service()
        .execute(query::users::List(params.into()))
        .await
        .map_err(AsError::into_error)
        .map(|page| Json(page.into()))
}

/// Reports whether the storage is reachable.
#[tracing::instrument(skip_all, fields(http.handler = "health"))]
pub async fn check_health(
    ctx: Context,
) -> (http::StatusCode, Json<health::Response>) {
    let mut failures = BTreeMap::new();
    if let Err(e) = ctx.service().execute(query::health::Check).await {
        let err = e.into_error();
        tracing::warn!("health check failed: {err}");
        drop(failures.insert("storage".to_owned(), err.message));
    }

    let resp = health::Response::new(failures);
    (resp.status_code(), Json(resp))
}
