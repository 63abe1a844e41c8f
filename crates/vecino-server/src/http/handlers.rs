// SPDX-License-Identifier: Apache-2.0

use crate::http::response_contract::api_error_response;
use crate::store::StoreError;
use crate::{aggregate, location, unix_now, AppState};
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{error, info};
use vecino_api::params::{parse_nearby_params_with_limit, parse_point_params};
use vecino_api::{ApiError, LocationUpdateBody};
use vecino_geo::Point;
use vecino_model::UserId;

pub(crate) async fn healthz_handler() -> Response {
    Json(json!({"status": "ok"})).into_response()
}

pub(crate) async fn readyz_handler() -> Response {
    Json(json!({"ready": true})).into_response()
}

pub(crate) async fn nearby_handler(
    State(state): State<AppState>,
    Query(query): Query<BTreeMap<String, String>>,
) -> Response {
    let started = Instant::now();
    let params = match parse_nearby_params_with_limit(
        &query,
        state.config.default_limit,
        state.config.max_limit,
    ) {
        Ok(p) => p,
        Err(e) => return api_error_response(e),
    };
    match aggregate::nearby(&state, &params).await {
        Ok(resp) => {
            info!(
                route = "/nearby",
                total = resp.total,
                returned = resp.items.len(),
                radius_km = params.radius_km,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "nearby query complete"
            );
            Json(resp).into_response()
        }
        Err(e) => store_failure("/nearby", &e),
    }
}

pub(crate) async fn alerts_handler(
    State(state): State<AppState>,
    Query(query): Query<BTreeMap<String, String>>,
) -> Response {
    let params = match parse_point_params(&query, state.config.default_radius_km) {
        Ok(p) => p,
        Err(e) => return api_error_response(e),
    };
    match aggregate::alerts_nearby(&state, params).await {
        Ok(resp) => Json(resp).into_response(),
        Err(e) => store_failure("/nearby/alerts", &e),
    }
}

pub(crate) async fn marketplace_handler(
    State(state): State<AppState>,
    Query(query): Query<BTreeMap<String, String>>,
) -> Response {
    let params = match parse_point_params(&query, state.config.default_radius_km) {
        Ok(p) => p,
        Err(e) => return api_error_response(e),
    };
    let category = query.get("category").map(String::as_str);
    match aggregate::marketplace_nearby(&state, params, category).await {
        Ok(resp) => Json(resp).into_response(),
        Err(e) => store_failure("/nearby/marketplace", &e),
    }
}

pub(crate) async fn neighborhoods_handler(
    State(state): State<AppState>,
    Query(query): Query<BTreeMap<String, String>>,
) -> Response {
    let params = match parse_point_params(&query, state.config.neighborhood_radius_km) {
        Ok(p) => p,
        Err(e) => return api_error_response(e),
    };
    match aggregate::neighborhoods_nearby(&state, params).await {
        Ok(resp) => Json(resp).into_response(),
        Err(e) => store_failure("/nearby/neighborhoods", &e),
    }
}

pub(crate) async fn location_update_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<LocationUpdateBody>,
) -> Response {
    let Some(user_id) = authenticated_user(&headers) else {
        return api_error_response(ApiError::unauthenticated());
    };
    let point = match Point::new(body.latitude, body.longitude) {
        Ok(p) => p,
        Err(e) => {
            return api_error_response(ApiError::validation_failed(
                "coordinates",
                &e.to_string(),
            ))
        }
    };
    match location::record_location(state.store.as_ref(), user_id.clone(), point, unix_now()).await
    {
        Ok(resp) => {
            info!(route = "/nearby/location", user = user_id.as_str(), "location updated");
            Json(resp).into_response()
        }
        Err(e) => store_failure("/nearby/location", &e),
    }
}

/// The session layer lives upstream; the proxy injects the caller's identity.
fn authenticated_user(headers: &HeaderMap) -> Option<UserId> {
    let raw = headers.get("x-user-id")?.to_str().ok()?;
    UserId::parse(raw).ok()
}

fn store_failure(route: &str, err: &StoreError) -> Response {
    error!(route, error = %err, "primary store failure");
    api_error_response(ApiError::store_unavailable(&err.to_string()))
}
