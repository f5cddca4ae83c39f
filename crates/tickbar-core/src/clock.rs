//! Wall-clock access.
//!
//! Every engine takes a `&dyn Clock` instead of reading the system time, so
//! tests can fabricate time and move it between calls. Local wall-clock
//! conversions also go through the clock because alarms are scheduled by
//! time of day.

use std::cell::Cell;

use chrono::{
    DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc,
};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Wall-clock time in the user's zone for an instant.
    fn to_local(&self, at: DateTime<Utc>) -> NaiveDateTime;

    /// Instant for a wall-clock time in the user's zone.
    ///
    /// Times that fall into a DST gap resolve to the first valid instant
    /// after the gap; ambiguous times resolve to the earlier instant.
    fn resolve_local(&self, wall: NaiveDateTime) -> DateTime<Utc>;

    fn now_local(&self) -> NaiveDateTime {
        self.to_local(self.now())
    }

    fn today(&self) -> NaiveDate {
        self.now_local().date()
    }

    /// Current time as fractional epoch seconds.
    fn epoch_secs(&self) -> f64 {
        to_epoch_secs(self.now())
    }
}

/// Clock backed by the system time and the local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn to_local(&self, at: DateTime<Utc>) -> NaiveDateTime {
        at.with_timezone(&Local).naive_local()
    }

    fn resolve_local(&self, wall: NaiveDateTime) -> DateTime<Utc> {
        let mut probe = wall;
        // A DST gap is at most a couple of hours wide.
        for _ in 0..4 {
            if let Some(at) = Local.from_local_datetime(&probe).earliest() {
                return at.with_timezone(&Utc);
            }
            probe += Duration::minutes(30);
        }
        Utc.from_utc_datetime(&wall)
    }
}

/// Settable clock in a fixed-offset zone, for tests and simulations.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
    offset: FixedOffset,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_offset(now, Utc.fix())
    }

    pub fn with_offset(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self {
            now: Cell::new(now),
            offset,
        }
    }

    /// Clock whose local wall-clock time is `wall` in a UTC zone.
    pub fn at_local(wall: NaiveDateTime) -> Self {
        Self::new(Utc.from_utc_datetime(&wall))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_secs(&self, secs: i64) {
        self.advance(Duration::seconds(secs));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn to_local(&self, at: DateTime<Utc>) -> NaiveDateTime {
        at.with_timezone(&self.offset).naive_local()
    }

    fn resolve_local(&self, wall: NaiveDateTime) -> DateTime<Utc> {
        match self.offset.from_local_datetime(&wall).single() {
            Some(at) => at.with_timezone(&Utc),
            None => Utc.from_utc_datetime(&wall),
        }
    }
}

pub fn to_epoch_secs(at: DateTime<Utc>) -> f64 {
    at.timestamp_millis() as f64 / 1000.0
}

pub fn from_epoch_secs(secs: f64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis((secs * 1000.0).round() as i64).unwrap_or_default()
}
