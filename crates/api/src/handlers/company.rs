//! Handlers for the `/companies` resource.

use atelier_core::error::CoreError;
use atelier_core::types::DbId;
use atelier_db::models::company::{Company, CreateCompany, UpdateCompany};
use atelier_db::repositories::CompanyRepo;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// POST /api/v1/companies
pub async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<CreateCompany>,
) -> AppResult<(StatusCode, Json<Company>)> {
    let company = CompanyRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

/// GET /api/v1/companies
pub async fn list(State(state): State<AppState>, _user: AuthUser) -> AppResult<Json<Vec<Company>>> {
    let companies = CompanyRepo::list(&state.pool).await?;
    Ok(Json(companies))
}

/// GET /api/v1/companies/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Company>> {
    let company = CompanyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id,
        }))?;
    Ok(Json(company))
}

/// PUT /api/v1/companies/{id}
pub async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCompany>,
) -> AppResult<Json<Company>> {
    let company = CompanyRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id,
        }))?;
    Ok(Json(company))
}

/// DELETE /api/v1/companies/{id}
pub async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = CompanyRepo::soft_delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id,
        }))
    }
}
