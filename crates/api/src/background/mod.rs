//! Background jobs spawned from the API process.
//!
//! The reminder scheduler itself lives in `atelier_events`; this module
//! holds the jobs that only make sense inside the API process.

pub mod session_purge;
