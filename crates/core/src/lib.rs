//! Pure domain logic for the studio platform.
//!
//! This crate has zero internal dependencies and performs no I/O, so the
//! booking-availability and recurrence rules can be used (and tested) without
//! a database or a running server.

pub mod availability;
pub mod error;
pub mod recurrence;
pub mod slots;
pub mod types;
