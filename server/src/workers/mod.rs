pub mod expiry;

pub use expiry::{ExpiryScheduler, SchedulerHandle};
