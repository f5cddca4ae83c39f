//! Desktop side effects: notifications, sounds and modal alerts.
//!
//! All of these are fire-and-forget subprocesses. A missing or failing
//! `notify-send`/`paplay`/`zenity` never aborts an action; the failure is
//! logged at debug level and dropped.

use std::cell::RefCell;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::events::Event;
use crate::storage::Config;
use crate::timer::format_clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Low,
    Normal,
    Critical,
}

impl Urgency {
    fn as_str(self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Normal => "normal",
            Urgency::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Bell,
    Alarm,
    Complete,
}

impl Sound {
    fn file_name(self) -> &'static str {
        match self {
            Sound::Bell => "bell.oga",
            Sound::Alarm => "alarm-clock-elapsed.oga",
            Sound::Complete => "complete.oga",
        }
    }
}

/// Sink for desktop side effects.
pub trait Notifier {
    fn notify(&self, title: &str, body: &str, urgency: Urgency);
    fn play(&self, sound: Sound);
    /// Prominent modal alert, used for alarms.
    fn alert(&self, title: &str, text: &str);
}

/// Notifier that shells out to `notify-send`, `paplay`/`aplay` and `zenity`.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    app_name: String,
    notifications: bool,
    sounds: bool,
    sound_dir: PathBuf,
}

impl DesktopNotifier {
    pub fn from_config(config: &Config) -> Self {
        Self {
            app_name: config.notifications.app_name.clone(),
            notifications: config.notifications.enabled,
            sounds: config.sounds.enabled,
            sound_dir: PathBuf::from(&config.sounds.dir),
        }
    }

    fn spawn(program: &str, args: &[&str]) -> bool {
        match Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("{program} unavailable: {e}");
                false
            }
        }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str, urgency: Urgency) {
        if !self.notifications {
            return;
        }
        Self::spawn(
            "notify-send",
            &["-u", urgency.as_str(), "-a", self.app_name.as_str(), title, body],
        );
    }

    fn play(&self, sound: Sound) {
        if !self.sounds {
            return;
        }
        let path = self.sound_dir.join(sound.file_name());
        let path = path.to_string_lossy();
        if !Self::spawn("paplay", &[path.as_ref()]) {
            Self::spawn("aplay", &[path.as_ref()]);
        }
    }

    fn alert(&self, title: &str, text: &str) {
        if !self.notifications {
            return;
        }
        let title = format!("--title={title}");
        let text = format!("--text={text}");
        Self::spawn(
            "zenity",
            &[
                "--warning",
                title.as_str(),
                text.as_str(),
                "--width=300",
                "--height=150",
            ],
        );
    }
}

/// One recorded side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Notification {
        title: String,
        body: String,
        urgency: Urgency,
    },
    Sound(Sound),
    Alert {
        title: String,
        text: String,
    },
}

/// Notifier that records instead of spawning, for tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: RefCell<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.notices
            .borrow()
            .iter()
            .filter_map(|n| match n {
                Notice::Notification { title, .. } => Some(title.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn sounds(&self) -> Vec<Sound> {
        self.notices
            .borrow()
            .iter()
            .filter_map(|n| match n {
                Notice::Sound(s) => Some(*s),
                _ => None,
            })
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, body: &str, urgency: Urgency) {
        self.notices.borrow_mut().push(Notice::Notification {
            title: title.to_string(),
            body: body.to_string(),
            urgency,
        });
    }

    fn play(&self, sound: Sound) {
        self.notices.borrow_mut().push(Notice::Sound(sound));
    }

    fn alert(&self, title: &str, text: &str) {
        self.notices.borrow_mut().push(Notice::Alert {
            title: title.to_string(),
            text: text.to_string(),
        });
    }
}

/// Turns engine events into desktop side effects.
pub struct Announcer<'a> {
    notifier: &'a dyn Notifier,
    achievement_notifications: bool,
    alarm_dialog: bool,
}

impl<'a> Announcer<'a> {
    pub fn new(notifier: &'a dyn Notifier, config: &Config) -> Self {
        Self {
            notifier,
            achievement_notifications: config.productivity.achievement_notifications,
            alarm_dialog: config.notifications.alarm_dialog,
        }
    }

    pub fn announce_all(&self, events: &[Event]) {
        for event in events {
            self.announce(event);
        }
    }

    pub fn announce(&self, event: &Event) {
        let n = self.notifier;
        match event {
            Event::TimerStarted {
                name,
                duration_secs,
                ..
            } => n.notify(
                "Timer Started",
                &format!("{name}: {}", format_clock(*duration_secs as f64)),
                Urgency::Normal,
            ),
            Event::StopwatchStarted { name, .. } => n.notify(
                "Stopwatch Started",
                &format!("{name} is running"),
                Urgency::Normal,
            ),
            Event::TimerPaused { name, .. } => {
                n.notify(&format!("{name} Paused"), "Timer is paused", Urgency::Normal)
            }
            Event::TimerResumed { name, .. } => n.notify(
                &format!("{name} Resumed"),
                "Timer is now running",
                Urgency::Normal,
            ),
            Event::TimerStopped { name, .. } => n.notify(
                &format!("{name} Stopped"),
                "Timer has been stopped",
                Urgency::Normal,
            ),
            Event::TimerCompleted { name, .. } => {
                n.play(Sound::Complete);
                n.notify(
                    "⏰ Timer Complete!",
                    &format!("{name} finished"),
                    Urgency::Critical,
                );
            }
            Event::AlarmSet {
                name, time_of_day, ..
            } => n.notify("Alarm Set", &format!("{name} at {time_of_day}"), Urgency::Normal),
            Event::AlarmRemoved { name, .. } => {
                n.notify("Alarm Removed", &format!("Removed: {name}"), Urgency::Normal)
            }
            Event::AlarmToggled { name, enabled, .. } => {
                let status = if *enabled { "enabled" } else { "disabled" };
                n.notify("Alarm Toggled", &format!("{name} {status}"), Urgency::Normal);
            }
            Event::AlarmFired { name, .. } => {
                n.play(Sound::Alarm);
                n.notify("⏰ ALARM", name, Urgency::Critical);
                if self.alarm_dialog {
                    n.alert("ALARM!", &format!("{name}\n\nAlarm time reached!"));
                }
            }
            Event::PomodoroPhaseEnded { ended, .. } => {
                n.play(Sound::Bell);
                n.notify(
                    "Pomodoro",
                    &format!("{} time is up!", ended.title()),
                    Urgency::Normal,
                );
            }
            Event::PointsAwarded {
                points,
                total,
                reason,
                ..
            } => {
                tracing::debug!("+{points} points for {reason} (total {total})");
            }
            Event::LevelUp { level, .. } => n.notify(
                "Level Up! 🚀",
                &format!("You've reached level {level}!"),
                Urgency::Normal,
            ),
            Event::AchievementUnlocked {
                name,
                icon,
                description,
                ..
            } => {
                if self.achievement_notifications {
                    n.notify(
                        &format!("Achievement Unlocked! {icon}"),
                        &format!("{name}: {description}"),
                        Urgency::Normal,
                    );
                }
            }
            Event::GoalAdded { title, .. } => {
                n.notify("Goal Added", &format!("New goal: {title}"), Urgency::Normal)
            }
            Event::GoalCompleted { title, .. } => n.notify(
                "Goal Completed! 🎉",
                &format!("Congratulations on completing: {title}"),
                Urgency::Normal,
            ),
            Event::HabitAdded { name, .. } => {
                n.notify("Habit Added", &format!("New habit: {name}"), Urgency::Normal)
            }
            Event::HabitCompleted { name, streak, .. } => n.notify(
                "Habit Completed! ✅",
                &format!("{name} - {streak} day streak!"),
                Urgency::Normal,
            ),
            Event::NoteAdded { title, .. } => {
                n.notify("Note Added", &format!("New note: {title}"), Urgency::Normal)
            }
            Event::NoteArchived {
                title, archived, ..
            } => {
                if *archived {
                    n.notify("Note Archived", &format!("Archived: {title}"), Urgency::Normal)
                } else {
                    n.notify("Note Unarchived", &format!("Unarchived: {title}"), Urgency::Normal)
                }
            }
        }
    }

    /// Tell the user an action was rejected.
    pub fn error(&self, title: &str, message: &str) {
        self.notifier.notify(title, message, Urgency::Critical);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn alarm_fired_plays_notifies_and_alerts() {
        let rec = RecordingNotifier::new();
        let announcer = Announcer::new(&rec, &Config::default());
        announcer.announce(&Event::AlarmFired {
            name: "Standup".into(),
            at: Utc::now(),
        });

        let notices = rec.notices();
        assert_eq!(notices[0], Notice::Sound(Sound::Alarm));
        assert_eq!(
            notices[1],
            Notice::Notification {
                title: "⏰ ALARM".into(),
                body: "Standup".into(),
                urgency: Urgency::Critical,
            }
        );
        assert!(matches!(notices[2], Notice::Alert { .. }));
    }

    #[test]
    fn achievement_notifications_can_be_muted() {
        let rec = RecordingNotifier::new();
        let mut config = Config::default();
        config.productivity.achievement_notifications = false;
        Announcer::new(&rec, &config).announce(&Event::AchievementUnlocked {
            id: "first_goal".into(),
            name: "Goal Setter".into(),
            icon: "🎯".into(),
            description: "Create your first goal".into(),
            at: Utc::now(),
        });
        assert!(rec.notices().is_empty());
    }

    #[test]
    fn timer_started_formats_duration() {
        let rec = RecordingNotifier::new();
        Announcer::new(&rec, &Config::default()).announce(&Event::TimerStarted {
            name: "Tea".into(),
            kind: crate::timer::TimerKind::General,
            duration_secs: 300,
            at: Utc::now(),
        });
        assert_eq!(
            rec.notices(),
            vec![Notice::Notification {
                title: "Timer Started".into(),
                body: "Tea: 05:00".into(),
                urgency: Urgency::Normal,
            }]
        );
    }

    #[test]
    fn note_archive_and_restore_have_their_own_titles() {
        let rec = RecordingNotifier::new();
        let announcer = Announcer::new(&rec, &Config::default());
        for archived in [true, false] {
            announcer.announce(&Event::NoteArchived {
                title: "Idea".into(),
                archived,
                at: Utc::now(),
            });
        }
        assert_eq!(rec.titles(), vec!["Note Archived", "Note Unarchived"]);
    }
}
