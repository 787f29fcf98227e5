//! Handlers for QR-visit tracking.

use atelier_db::models::qr_visit::QrCodeStats;
use atelier_db::repositories::QrVisitRepo;
use axum::extract::{Path, State};
use axum::http::header::{REFERER, USER_AGENT};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Longest accepted code path segment.
const MAX_CODE_LENGTH: usize = 64;

/// POST /api/v1/qr/{code} (public)
///
/// Record one scan of a printed QR code. The marketing site calls this on
/// landing and then redirects.
pub async fn record_visit(
    State(state): State<AppState>,
    Path(code): Path<String>,
    headers: HeaderMap,
) -> AppResult<StatusCode> {
    if code.is_empty() || code.len() > MAX_CODE_LENGTH {
        return Err(AppError::BadRequest("Invalid QR code".into()));
    }

    let user_agent = headers.get(USER_AGENT).and_then(|v| v.to_str().ok());
    let referer = headers.get(REFERER).and_then(|v| v.to_str().ok());

    QrVisitRepo::record(&state.pool, &code, user_agent, referer).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/qr/stats (staff)
pub async fn stats(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<QrCodeStats>>>> {
    let stats = QrVisitRepo::stats(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}
