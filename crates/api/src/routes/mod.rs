pub mod admin;
pub mod auth;
pub mod booking;
pub mod chat;
pub mod company;
pub mod contact;
pub mod cron;
pub mod files;
pub mod health;
pub mod project;
pub mod qr;
pub mod studio;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                     login (public)
/// /auth/refresh                   refresh (public)
/// /auth/logout                    logout (requires auth)
///
/// /admin/users                    list, create (admin only)
/// /admin/users/{id}               get, update, deactivate
/// /admin/users/{id}/reset-password reset password
///
/// /companies                      list, create (staff)
/// /companies/{id}                 get, update, delete
///
/// /contacts                       list, create (staff)
/// /contacts/{id}                  get, update, delete
/// /contacts/{id}/access           grant, revoke system access (admin)
///
/// /projects                       list, create (staff)
/// /projects/published             published list (public)
/// /projects/published/{slug}      published detail (public)
/// /projects/{id}                  get, update, delete (staff)
///
/// /availability                   open slots for a date (public)
/// /bookings                       create (public), list (staff)
/// /bookings/block                 admin block creation (staff)
/// /bookings/{id}                  get, delete (staff)
/// /bookings/{id}/status           status change (staff)
///
/// /studio/config                  get, update (admin)
/// /studio/templates               list (admin)
/// /studio/templates/{weekday}     replace one weekday (admin)
///
/// /chat/messages                  visitor chat (public)
/// /chat/conversations             list (staff)
/// /chat/conversations/{id}        message log (staff)
///
/// /files                          list (staff), upload (admin)
/// /files/{id}                     delete (admin)
///
/// /qr/{code}                      record visit (public)
/// /qr/stats                       scan counts (staff)
///
/// /cron/reminders                 reminder dispatch (shared secret)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/companies", company::router())
        .nest("/contacts", contact::router())
        .nest("/projects", project::router())
        .merge(booking::router())
        .nest("/studio", studio::router())
        .nest("/chat", chat::router())
        .nest("/files", files::router())
        .nest("/qr", qr::router())
        .nest("/cron", cron::router())
}
