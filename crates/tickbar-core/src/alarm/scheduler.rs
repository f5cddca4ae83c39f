use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::clock::{to_epoch_secs, Clock};
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::storage::{StateStore, ALARM_FILE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmEntry {
    /// Next trigger as local wall-clock time.
    pub time: NaiveDateTime,
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// `time` resolved to epoch seconds.
    pub timestamp: f64,
}

fn default_enabled() -> bool {
    true
}

impl AlarmEntry {
    pub fn time_of_day(&self) -> String {
        self.time.format("%H:%M").to_string()
    }
}

/// Contents of the alarm state file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmBook {
    pub alarms: Vec<AlarmEntry>,
    pub next_alarm: Option<AlarmEntry>,
}

impl AlarmBook {
    fn sort(&mut self) {
        self.alarms
            .sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    }

    fn refresh_next(&mut self, now: f64) {
        self.next_alarm = self
            .alarms
            .iter()
            .filter(|a| a.enabled && a.timestamp > now)
            .min_by(|a, b| a.timestamp.total_cmp(&b.timestamp))
            .cloned();
    }
}

/// Parse `HH:MM` (24 hour clock).
pub fn parse_time_of_day(input: &str) -> std::result::Result<NaiveTime, ValidationError> {
    let invalid = || ValidationError::InvalidTime(input.to_string());
    let (hours, minutes) = input.trim().split_once(':').ok_or_else(invalid)?;
    if hours.is_empty() || minutes.len() != 2 {
        return Err(invalid());
    }
    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(invalid)
}

pub struct AlarmScheduler<'a> {
    store: &'a StateStore,
    clock: &'a dyn Clock,
    book: AlarmBook,
}

impl<'a> AlarmScheduler<'a> {
    pub fn load(store: &'a StateStore, clock: &'a dyn Clock) -> Self {
        let book = store.load(ALARM_FILE);
        Self { store, clock, book }
    }

    /// Alarms in trigger order; the position is the index used by
    /// [`remove`](Self::remove) and [`toggle`](Self::toggle).
    pub fn list(&self) -> &[AlarmEntry] {
        &self.book.alarms
    }

    /// Earliest enabled alarm still in the future.
    pub fn next_alarm(&self) -> Option<&AlarmEntry> {
        let now = self.clock.epoch_secs();
        self.book
            .alarms
            .iter()
            .filter(|a| a.enabled && a.timestamp > now)
            .min_by(|a, b| a.timestamp.total_cmp(&b.timestamp))
    }

    fn entry_at(&self, time: NaiveDateTime, name: &str, enabled: bool) -> AlarmEntry {
        AlarmEntry {
            time,
            name: name.to_string(),
            enabled,
            timestamp: to_epoch_secs(self.clock.resolve_local(time)),
        }
    }

    fn persist(&mut self) -> Result<()> {
        self.book.sort();
        self.book.refresh_next(self.clock.epoch_secs());
        self.store.save(ALARM_FILE, &self.book)
    }

    /// Schedule `time` today, or tomorrow if that moment has passed.
    pub fn add(&mut self, time: &str, name: &str) -> Result<Event> {
        let time_of_day = parse_time_of_day(time)?;
        let now = self.clock.now();
        let mut wall = self.clock.today().and_time(time_of_day);
        if self.clock.resolve_local(wall) <= now {
            wall += Duration::days(1);
        }

        let entry = self.entry_at(wall, name, true);
        tracing::info!("alarm '{name}' set for {wall}");
        self.book.alarms.push(entry);
        self.persist()?;
        Ok(Event::AlarmSet {
            name: name.to_string(),
            time_of_day: time_of_day.format("%H:%M").to_string(),
            at: now,
        })
    }

    /// Remove by index. Out of range does nothing.
    pub fn remove(&mut self, index: usize) -> Result<Option<Event>> {
        if index >= self.book.alarms.len() {
            return Ok(None);
        }
        let removed = self.book.alarms.remove(index);
        self.persist()?;
        Ok(Some(Event::AlarmRemoved {
            name: removed.name,
            at: self.clock.now(),
        }))
    }

    /// Flip `enabled` by index. Out of range does nothing.
    pub fn toggle(&mut self, index: usize) -> Result<Option<Event>> {
        let Some(alarm) = self.book.alarms.get_mut(index) else {
            return Ok(None);
        };
        alarm.enabled = !alarm.enabled;
        let event = Event::AlarmToggled {
            name: alarm.name.clone(),
            enabled: alarm.enabled,
            at: self.clock.now(),
        };
        self.persist()?;
        Ok(Some(event))
    }

    /// Fire every enabled alarm whose instant has passed and move it one
    /// day forward from its stored time.
    ///
    /// An alarm missed by several days fires once per check, catching up
    /// one day at a time.
    pub fn check_and_fire(&mut self) -> Result<Vec<Event>> {
        let now = self.clock.now();
        let now_secs = to_epoch_secs(now);
        let mut fired = Vec::new();

        for i in 0..self.book.alarms.len() {
            let alarm = &self.book.alarms[i];
            if !alarm.enabled || alarm.timestamp > now_secs {
                continue;
            }
            let next = alarm.time + Duration::days(1);
            let name = alarm.name.clone();
            tracing::info!("alarm '{name}' fired, next at {next}");
            let rescheduled = self.entry_at(next, &name, true);
            self.book.alarms[i] = rescheduled;
            fired.push(Event::AlarmFired { name, at: now });
        }

        let stale_next = self.book.next_alarm.as_ref().map(|a| a.timestamp);
        if !fired.is_empty() || stale_next.is_some_and(|t| t <= now_secs) {
            self.persist()?;
        }
        Ok(fired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::NaiveDate;

    fn wall(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn parses_time_of_day() {
        assert_eq!(
            parse_time_of_day("07:05").unwrap(),
            NaiveTime::from_hms_opt(7, 5, 0).unwrap()
        );
        assert_eq!(
            parse_time_of_day("7:30").unwrap(),
            NaiveTime::from_hms_opt(7, 30, 0).unwrap()
        );
        for bad in ["", "25:00", "12:60", "12", "ab:cd", "12:5", "-1:00"] {
            assert!(parse_time_of_day(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn past_time_schedules_tomorrow() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        let clock = ManualClock::at_local(wall(10, 9, 30));
        let mut alarms = AlarmScheduler::load(&store, &clock);

        alarms.add("09:00", "Standup").unwrap();
        alarms.add("10:00", "Review").unwrap();

        let list = alarms.list();
        assert_eq!(list[0].name, "Review");
        assert_eq!(list[0].time, wall(10, 10, 0));
        assert_eq!(list[1].time, wall(11, 9, 0));
        assert_eq!(alarms.next_alarm().unwrap().name, "Review");
    }

    #[test]
    fn exactly_now_schedules_tomorrow() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        let clock = ManualClock::at_local(wall(10, 9, 0));
        let mut alarms = AlarmScheduler::load(&store, &clock);
        alarms.add("09:00", "Now").unwrap();
        assert_eq!(alarms.list()[0].time, wall(11, 9, 0));
    }

    #[test]
    fn invalid_time_is_rejected_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        let clock = ManualClock::at_local(wall(10, 9, 0));
        let mut alarms = AlarmScheduler::load(&store, &clock);
        let err = alarms.add("9am", "x").unwrap_err();
        assert!(err.is_user_error());
        assert!(!store.path(ALARM_FILE).exists());
    }

    #[test]
    fn fired_alarm_moves_one_day_from_stored_time() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        let clock = ManualClock::at_local(wall(10, 8, 0));
        let mut alarms = AlarmScheduler::load(&store, &clock);
        alarms.add("09:00", "Wake").unwrap();

        // The poll arrives late; the reschedule is still anchored at 09:00.
        clock.set(clock.resolve_local(wall(10, 9, 7)));
        let fired = alarms.check_and_fire().unwrap();
        assert_eq!(fired.len(), 1);
        assert!(matches!(&fired[0], Event::AlarmFired { name, .. } if name == "Wake"));
        assert_eq!(alarms.list()[0].time, wall(11, 9, 0));

        assert!(alarms.check_and_fire().unwrap().is_empty());

        let reloaded = AlarmScheduler::load(&store, &clock);
        assert_eq!(reloaded.list()[0].time, wall(11, 9, 0));
        assert_eq!(
            store.load::<AlarmBook>(ALARM_FILE).next_alarm.unwrap().time,
            wall(11, 9, 0)
        );
    }

    #[test]
    fn disabled_alarm_never_fires() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        let clock = ManualClock::at_local(wall(10, 8, 0));
        let mut alarms = AlarmScheduler::load(&store, &clock);
        alarms.add("09:00", "Wake").unwrap();
        let event = alarms.toggle(0).unwrap().unwrap();
        assert!(matches!(event, Event::AlarmToggled { enabled: false, .. }));
        assert!(alarms.next_alarm().is_none());

        clock.set(clock.resolve_local(wall(10, 9, 30)));
        assert!(alarms.check_and_fire().unwrap().is_empty());
    }

    #[test]
    fn stale_alarm_catches_up_one_day_per_check() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        let clock = ManualClock::at_local(wall(10, 8, 0));
        let mut alarms = AlarmScheduler::load(&store, &clock);
        alarms.add("09:00", "Wake").unwrap();

        clock.set(clock.resolve_local(wall(13, 12, 0)));
        assert_eq!(alarms.check_and_fire().unwrap().len(), 1);
        assert_eq!(alarms.list()[0].time, wall(11, 9, 0));
        assert_eq!(alarms.check_and_fire().unwrap().len(), 1);
        assert_eq!(alarms.list()[0].time, wall(12, 9, 0));
    }

    #[test]
    fn out_of_range_index_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        let clock = ManualClock::at_local(wall(10, 8, 0));
        let mut alarms = AlarmScheduler::load(&store, &clock);
        alarms.add("09:00", "Wake").unwrap();
        assert!(alarms.remove(3).unwrap().is_none());
        assert!(alarms.toggle(3).unwrap().is_none());
        assert!(alarms.remove(0).unwrap().is_some());
        assert!(alarms.list().is_empty());
    }
}
