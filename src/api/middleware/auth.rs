use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::{api::state::AppState, error::AppError};

/// Verifies the bearer token and stashes the resulting principal in the
/// request extensions. Handlers receive it via `Extension<AuthPrincipal>`;
/// nothing downstream reads the header again.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthorized)?;

    let principal = state.service_context.auth_service.verify_token(token)?;

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}
