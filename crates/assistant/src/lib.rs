//! HTTP client for the third-party LLM file-search API.
//!
//! The marketing-site chat assistant answers with retrieval over the
//! studio's uploaded knowledge-base files. This crate wraps the provider's
//! REST surface (file upload/delete, grounded chat completion) behind a
//! typed client; all persistence and HTTP routing live elsewhere.

pub mod api;

pub use api::{AssistantApi, AssistantApiError, AssistantConfig, ChatTurn, UploadedFile};
