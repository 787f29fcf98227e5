//! Request handlers, one submodule per resource.
//!
//! Handlers stay thin: they validate input, delegate to the repositories in
//! `atelier_db` (and the assistant/storage clients where relevant), publish
//! platform events, and map errors via [`crate::error::AppError`].

pub mod admin_users;
pub mod auth;
pub mod booking;
pub mod chat;
pub mod company;
pub mod contact;
pub mod cron;
pub mod files;
pub mod project;
pub mod qr;
pub mod studio;
