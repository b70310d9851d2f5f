use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    api::state::AppState,
    auth::AuthPrincipal,
    domain::{
        AdminAddContributionRequest, ContributionFilter, ContributionStatus, ContributionView,
        Member, Month, SubmitContributionRequest, UpdateStatusRequest,
    },
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    member: Option<Uuid>,
    month: Option<String>,
    year: Option<i32>,
    status: Option<String>,
}

impl ListParams {
    fn into_filter(self) -> Result<ContributionFilter> {
        let month = self
            .month
            .as_deref()
            .map(str::parse::<Month>)
            .transpose()
            .map_err(AppError::Validation)?;
        let status = self
            .status
            .as_deref()
            .map(str::parse::<ContributionStatus>)
            .transpose()
            .map_err(AppError::Validation)?;

        Ok(ContributionFilter {
            member_id: self.member,
            month,
            year: self.year,
            status,
        })
    }
}

pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthPrincipal>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ContributionView>>> {
    let filter = params.into_filter()?;
    let contributions = state
        .service_context
        .contribution_service
        .list_all(&principal, filter)
        .await?;

    Ok(Json(contributions))
}

pub async fn list_by_member(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(member_id): Path<Uuid>,
) -> Result<Json<Vec<ContributionView>>> {
    let contributions = state
        .service_context
        .contribution_service
        .list_by_member(&principal, member_id)
        .await?;

    Ok(Json(contributions))
}

pub async fn list_by_period(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthPrincipal>,
    Path((month, year)): Path<(String, i32)>,
) -> Result<Json<Vec<ContributionView>>> {
    let contributions = state
        .service_context
        .contribution_service
        .list_by_period(&principal, &month, year)
        .await?;

    Ok(Json(contributions))
}

pub async fn outstanding(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthPrincipal>,
    Path((month, year)): Path<(String, i32)>,
) -> Result<Json<Vec<Member>>> {
    let members = state
        .service_context
        .contribution_service
        .outstanding(&principal, &month, year)
        .await?;

    Ok(Json(members))
}

pub async fn submit(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthPrincipal>,
    Json(request): Json<SubmitContributionRequest>,
) -> Result<(StatusCode, Json<ContributionView>)> {
    let contribution = state
        .service_context
        .contribution_service
        .submit_own(&principal, request)
        .await?;

    Ok((StatusCode::CREATED, Json(contribution)))
}

pub async fn admin_add(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthPrincipal>,
    Json(request): Json<AdminAddContributionRequest>,
) -> Result<(StatusCode, Json<ContributionView>)> {
    let contribution = state
        .service_context
        .contribution_service
        .submit_on_behalf(&principal, request)
        .await?;

    Ok((StatusCode::CREATED, Json(contribution)))
}

pub async fn update_status(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthPrincipal>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<ContributionView>> {
    let contribution = state
        .service_context
        .contribution_service
        .transition_status(&principal, id, request)
        .await?;

    Ok(Json(contribution))
}
