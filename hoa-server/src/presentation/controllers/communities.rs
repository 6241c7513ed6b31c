//! Community profile controllers

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Json,
};

use hoa_core::application::ApplicationError;
use hoa_core::domain::community::{Community, CommunityStore, NewCommunity};

use crate::presentation::controllers::AppState;
use crate::presentation::errors::ApiError;
use crate::presentation::input::{parse_body, safe_opt, safe_str};
use crate::presentation::models::{CreateCommunityRequest, ErrorResponse};

/// GET /api/communities - List profiles, oldest first
#[utoipa::path(
    get,
    path = "/api/communities",
    tag = "communities",
    responses(
        (status = 200, description = "Community profiles", body = [Community]),
        (status = 502, description = "Store unavailable", body = ErrorResponse)
    )
)]
pub async fn list_communities(
    State(state): State<AppState>,
) -> Result<Json<Vec<Community>>, ApiError> {
    let communities = state
        .communities
        .list()
        .await
        .map_err(ApplicationError::from)?;
    Ok(Json(communities))
}

/// POST /api/communities - Create a profile
#[utoipa::path(
    post,
    path = "/api/communities",
    tag = "communities",
    request_body = CreateCommunityRequest,
    responses(
        (status = 201, description = "Created profile", body = Community),
        (status = 400, description = "Name is required", body = ErrorResponse),
        (status = 502, description = "Store unavailable", body = ErrorResponse)
    )
)]
pub async fn create_community(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Community>), ApiError> {
    let body = parse_body(&body);
    let community = NewCommunity {
        name: safe_str(&body["name"], 120),
        guidelines: safe_str(&body["guidelines"], 4_000),
        letterhead: safe_str(&body["letterhead"], 500),
        logo_url: safe_opt(&body["logoUrl"], 500),
    };
    if community.name.is_empty() {
        return Err(ApplicationError::invalid_input("Community name is required").into());
    }

    let created = state
        .communities
        .create(community)
        .await
        .map_err(ApplicationError::from)?;
    tracing::info!(community_id = %created.id, "Community created");

    Ok((StatusCode::CREATED, Json(created)))
}
