//! Platform events, email delivery, and booking-reminder dispatch.

pub mod bus;
pub mod email;
pub mod persistence;
pub mod reminders;

pub use bus::{EventBus, PlatformEvent};
pub use email::{EmailConfig, EmailDelivery};
pub use persistence::EventPersistence;
pub use reminders::{dispatch_due_reminders, ReminderRunSummary, ReminderScheduler};
