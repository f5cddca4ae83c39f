//! Daily recurring alarms.
//!
//! Alarms are kept sorted by their next trigger instant. A fired alarm is
//! moved to the same wall-clock time one day later, so alarms recur daily
//! until removed or disabled.

mod scheduler;

pub use scheduler::{parse_time_of_day, AlarmBook, AlarmEntry, AlarmScheduler};
