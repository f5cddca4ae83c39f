//! Integration tests for a focus session across separate "processes".
//!
//! Each step builds a fresh engine from the same state directory, the way
//! the panel runs one short-lived command per refresh.

use chrono::NaiveDate;
use tickbar_core::productivity::{AchievementState, Analytics, DailyStats};
use tickbar_core::storage::{ACHIEVEMENTS_FILE, ANALYTICS_FILE, DAILY_STATS_FILE};
use tickbar_core::timer::render;
use tickbar_core::{
    Announcer, Clock, Config, Event, ManualClock, RecordingNotifier, StateStore, TimerEngine,
    TimerKind, TimerMode,
};

fn morning() -> ManualClock {
    ManualClock::at_local(
        NaiveDate::from_ymd_opt(2024, 9, 16)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap(),
    )
}

#[test]
fn test_focus_session_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::new(dir.path());
    let clock = morning();
    let config = Config::default();

    TimerEngine::load(&store, &clock, &config)
        .start(1500, "Pomodoro", TimerKind::Focus)
        .unwrap();

    clock.advance_secs(600);
    let poll = TimerEngine::load(&store, &clock, &config).poll().unwrap();
    let status = render(&poll.snapshot, poll.next_alarm.as_ref(), clock.now_local());
    assert_eq!(status.class, "timer-focus");
    assert_eq!(status.text, "⏲️ 15:00");

    clock.advance_secs(900);
    let poll = TimerEngine::load(&store, &clock, &config).poll().unwrap();
    let notifier = RecordingNotifier::new();
    Announcer::new(&notifier, &config).announce_all(&poll.events);
    assert_eq!(notifier.titles(), vec!["⏰ Timer Complete!".to_string()]);
    assert_eq!(poll.snapshot.mode, TimerMode::Idle);

    // Later polls stay idle and award nothing more.
    clock.advance_secs(60);
    let poll = TimerEngine::load(&store, &clock, &config).poll().unwrap();
    assert!(poll.events.is_empty());

    let analytics: Analytics = store.load(ANALYTICS_FILE);
    assert_eq!(analytics.focus_sessions.len(), 1);
    assert!(analytics.focus_sessions[0].completed);

    let achievements: AchievementState = store.load(ACHIEVEMENTS_FILE);
    assert_eq!(achievements.points, 10);
    assert_eq!(achievements.level, 1);

    let stats: DailyStats = store.load(DAILY_STATS_FILE);
    assert_eq!(stats.focus_time, 25);
    assert_eq!(stats.focus_sessions, 1);
}

#[test]
fn test_five_focus_sessions_unlock_focused_mind() {
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::new(dir.path());
    let clock = morning();
    let config = Config::default();

    let mut unlocked = Vec::new();
    for _ in 0..5 {
        TimerEngine::load(&store, &clock, &config)
            .start(1500, "Focus", TimerKind::Focus)
            .unwrap();
        clock.advance_secs(1500);
        let poll = TimerEngine::load(&store, &clock, &config).poll().unwrap();
        for event in poll.events {
            if let Event::AchievementUnlocked { id, .. } = event {
                unlocked.push(id);
            }
        }
    }

    assert_eq!(unlocked, vec!["focused_mind".to_string()]);
    let achievements: AchievementState = store.load(ACHIEVEMENTS_FILE);
    assert_eq!(achievements.points, 75);
}

#[test]
fn test_corrupt_timer_file_reads_as_idle() {
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::new(dir.path());
    std::fs::write(store.path("timer-manager.json"), "{not json").unwrap();
    let clock = morning();
    let config = Config::default();

    let poll = TimerEngine::load(&store, &clock, &config).poll().unwrap();
    assert_eq!(poll.snapshot.mode, TimerMode::Idle);
    let status = render(&poll.snapshot, None, clock.now_local());
    assert_eq!(status.class, "timer-idle");
}

#[test]
fn test_script_written_achievements_survive_a_focus_completion() {
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::new(dir.path());
    let clock = morning();
    let config = Config::default();
    std::fs::create_dir_all(dir.path().join("productivity")).unwrap();
    std::fs::write(
        store.path(ACHIEVEMENTS_FILE),
        r#"{"unlocked": [{"id": "first_goal", "unlocked_date": "2024-05-03 10:00:00.123456",
            "name": "Goal Setter", "description": "Create your first goal", "points": 10,
            "icon": "🎯", "unlocked": true}], "points": 540, "level": 6}"#,
    )
    .unwrap();

    TimerEngine::load(&store, &clock, &config)
        .start(60, "Short", TimerKind::Focus)
        .unwrap();
    clock.advance_secs(60);
    TimerEngine::load(&store, &clock, &config).poll().unwrap();

    let achievements: AchievementState = store.load(ACHIEVEMENTS_FILE);
    assert_eq!(achievements.points, 550);
    assert_eq!(achievements.unlocked.len(), 1);
    assert_eq!(achievements.unlocked[0].id, "first_goal");
}
