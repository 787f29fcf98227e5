//! Handlers for the `/contacts` resource, including system-access grants.

use atelier_core::error::CoreError;
use atelier_core::types::DbId;
use atelier_db::models::contact::{Contact, CreateContact, UpdateContact};
use atelier_db::models::user::{CreateUser, UserRole};
use atelier_db::repositories::{ContactRepo, SessionRepo, UserRepo};
use atelier_events::PlatformEvent;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AdminUser, AuthUser};
use crate::state::AppState;

/// Query parameters for `GET /contacts`.
#[derive(Debug, Deserialize)]
pub struct ListContactsParams {
    pub company_id: Option<DbId>,
}

/// Request body for `POST /contacts/{id}/access`.
#[derive(Debug, Deserialize)]
pub struct GrantAccessRequest {
    pub password: String,
}

/// POST /api/v1/contacts
pub async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<CreateContact>,
) -> AppResult<(StatusCode, Json<Contact>)> {
    let contact = ContactRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

/// GET /api/v1/contacts
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ListContactsParams>,
) -> AppResult<Json<Vec<Contact>>> {
    let contacts = ContactRepo::list(&state.pool, params.company_id).await?;
    Ok(Json(contacts))
}

/// GET /api/v1/contacts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Contact>> {
    let contact = ContactRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Contact",
            id,
        }))?;
    Ok(Json(contact))
}

/// PUT /api/v1/contacts/{id}
pub async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateContact>,
) -> AppResult<Json<Contact>> {
    let contact = ContactRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Contact",
            id,
        }))?;
    Ok(Json(contact))
}

/// DELETE /api/v1/contacts/{id}
pub async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ContactRepo::soft_delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Contact",
            id,
        }))
    }
}

/// POST /api/v1/contacts/{id}/access
///
/// Grant the contact a staff login. Reactivates an existing user with the
/// contact's email address, or creates a fresh one.
pub async fn grant_access(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<DbId>,
    Json(input): Json<GrantAccessRequest>,
) -> AppResult<Json<Contact>> {
    let contact = ContactRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Contact",
            id,
        }))?;

    if contact.has_system_access() {
        return Err(AppError::Core(CoreError::Conflict(
            "Contact already has system access".into(),
        )));
    }

    let Some(email) = contact.email.clone() else {
        return Err(AppError::Core(CoreError::Validation(
            "Contact needs an email address before access can be granted".into(),
        )));
    };

    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    // A previously revoked contact leaves a deactivated user row behind;
    // reuse it instead of tripping the unique email constraint.
    let user = match UserRepo::find_by_email(&state.pool, &email).await? {
        Some(existing) => {
            UserRepo::set_active(&state.pool, existing.id, true).await?;
            UserRepo::set_password_hash(&state.pool, existing.id, &password_hash).await?;
            existing
        }
        None => {
            UserRepo::create(
                &state.pool,
                &CreateUser {
                    email,
                    password_hash,
                    display_name: format!("{} {}", contact.first_name, contact.last_name),
                    role: UserRole::Staff,
                },
            )
            .await?
        }
    };

    ContactRepo::set_user(&state.pool, id, Some(user.id)).await?;

    state.event_bus.publish(
        PlatformEvent::new("contact.access_granted")
            .with_source("contact", id)
            .with_actor(admin.0.user_id),
    );

    let contact = ContactRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Contact",
            id,
        }))?;
    Ok(Json(contact))
}

/// DELETE /api/v1/contacts/{id}/access
///
/// Revoke the contact's login: deactivate the linked user, revoke its
/// sessions, and unlink it from the contact.
pub async fn revoke_access(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let contact = ContactRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Contact",
            id,
        }))?;

    let Some(user_id) = contact.user_id else {
        return Err(AppError::Core(CoreError::Conflict(
            "Contact has no system access to revoke".into(),
        )));
    };

    UserRepo::set_active(&state.pool, user_id, false).await?;
    SessionRepo::revoke_all_for_user(&state.pool, user_id).await?;
    ContactRepo::set_user(&state.pool, id, None).await?;

    state.event_bus.publish(
        PlatformEvent::new("contact.access_revoked")
            .with_source("contact", id)
            .with_actor(admin.0.user_id),
    );

    Ok(StatusCode::NO_CONTENT)
}
