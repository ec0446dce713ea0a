use axum::{extract::Extension, http::Request, middleware::Next, response::Response};
use tracing::{debug, warn};

use crate::{
    app_state::AppState, errors::AppError, models::user::CurrentUser,
    services::jwt_service::validate_token,
};

/// Authentication gate for the messaging routes.
///
/// Accepts `Authorization: Bearer <jwt>` and inserts the caller's [`CurrentUser`] into the
/// request extensions. Anything else is rejected with 401.
pub async fn auth_middleware<B>(
    Extension(state): Extension<AppState>,
    mut req: Request<B>,
    next: Next<B>,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    let Some(token) = token else {
        warn!("missing bearer token");
        return Err(AppError::Unauthorized);
    };

    match validate_token(&state.jwt_secret, token) {
        Some(user_id) => {
            debug!(user_id, "valid JWT token");
            req.extensions_mut().insert(CurrentUser(user_id));
            Ok(next.run(req).await)
        }
        None => {
            warn!("invalid or expired JWT token");
            Err(AppError::Unauthorized)
        }
    }
}
