use chrono::NaiveDateTime;

use super::duration::format_clock;
use super::engine::TimerSnapshot;
use super::state::{TimerKind, TimerMode};
use crate::alarm::AlarmEntry;
use crate::status::WaybarStatus;

/// Panel line for the timer module.
///
/// `now_local` is only used to count down to the next alarm while idle.
pub fn render(
    snapshot: &TimerSnapshot,
    next_alarm: Option<&AlarmEntry>,
    now_local: NaiveDateTime,
) -> WaybarStatus {
    match snapshot.mode {
        TimerMode::Idle => render_idle(next_alarm, now_local),
        TimerMode::Timer => render_timer(snapshot),
        TimerMode::Stopwatch => render_stopwatch(snapshot),
    }
}

fn render_idle(next_alarm: Option<&AlarmEntry>, now_local: NaiveDateTime) -> WaybarStatus {
    let Some(alarm) = next_alarm else {
        return WaybarStatus::new(
            "⏱️",
            "Timer Manager\n\nNo timer running",
            "timer-idle",
        );
    };

    let until = alarm.time - now_local;
    let (text, tooltip) = if until.num_seconds() < 3600 {
        let minutes = until.num_minutes().max(0);
        (
            format!("🔔 {minutes}m"),
            format!("Next alarm: {} in {minutes} minutes", alarm.name),
        )
    } else {
        let at = alarm.time_of_day();
        (
            format!("🔔 {at}"),
            format!("Next alarm: {} at {at}", alarm.name),
        )
    };
    WaybarStatus::new(text, tooltip, "timer-alarm-pending")
}

fn render_timer(s: &TimerSnapshot) -> WaybarStatus {
    let remaining = format_clock(s.remaining);
    let (icon, class) = if s.paused {
        ("⏸️", "timer-paused")
    } else {
        match s.kind {
            TimerKind::Focus => ("⏲️", "timer-focus"),
            TimerKind::Break => ("⏲️", "timer-break"),
            TimerKind::General => ("⏲️", "timer-active"),
        }
    };
    let tooltip = format!(
        "Timer: {}\nRemaining: {remaining}\nProgress: {}%",
        s.name,
        s.progress_pct as u32
    );
    WaybarStatus::new(format!("{icon} {remaining}"), tooltip, class).with_alt(s.kind.as_str())
}

fn render_stopwatch(s: &TimerSnapshot) -> WaybarStatus {
    let elapsed = format_clock(s.elapsed);
    let (icon, class) = if s.paused {
        ("⏸️", "stopwatch-paused")
    } else {
        ("⏱️", "stopwatch-active")
    };
    WaybarStatus::new(
        format!("{icon} {elapsed}"),
        format!("Stopwatch: {}\nElapsed: {elapsed}", s.name),
        class,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn snapshot(mode: TimerMode, kind: TimerKind) -> TimerSnapshot {
        TimerSnapshot {
            mode,
            kind,
            name: "Pomodoro".into(),
            elapsed: 300.0,
            remaining: 1200.0,
            duration: 1500,
            progress_pct: 20.0,
            paused: false,
        }
    }

    fn alarm(h: u32, m: u32) -> AlarmEntry {
        AlarmEntry {
            time: at(h, m),
            name: "Standup".into(),
            enabled: true,
            timestamp: 0.0,
        }
    }

    #[test]
    fn idle_without_alarm() {
        let status = render(&snapshot(TimerMode::Idle, TimerKind::General), None, at(9, 0));
        assert_eq!(status.text, "⏱️");
        assert_eq!(status.class, "timer-idle");
        assert!(status.alt.is_none());
    }

    #[test]
    fn idle_with_close_alarm_counts_minutes() {
        let a = alarm(9, 45);
        let status = render(&snapshot(TimerMode::Idle, TimerKind::General), Some(&a), at(9, 0));
        assert_eq!(status.text, "🔔 45m");
        assert_eq!(status.class, "timer-alarm-pending");
        assert_eq!(status.tooltip, "Next alarm: Standup in 45 minutes");
    }

    #[test]
    fn idle_with_distant_alarm_shows_clock_time() {
        let a = alarm(17, 5);
        let status = render(&snapshot(TimerMode::Idle, TimerKind::General), Some(&a), at(9, 0));
        assert_eq!(status.text, "🔔 17:05");
    }

    #[test]
    fn focus_timer_has_focus_class_and_alt() {
        let status = render(&snapshot(TimerMode::Timer, TimerKind::Focus), None, at(9, 0));
        assert_eq!(status.text, "⏲️ 20:00");
        assert_eq!(status.class, "timer-focus");
        assert_eq!(status.alt.as_deref(), Some("focus"));
        assert_eq!(
            status.tooltip,
            "Timer: Pomodoro\nRemaining: 20:00\nProgress: 20%"
        );
    }

    #[test]
    fn paused_timer_wins_over_kind() {
        let mut snap = snapshot(TimerMode::Timer, TimerKind::Break);
        snap.paused = true;
        let status = render(&snap, None, at(9, 0));
        assert_eq!(status.text, "⏸️ 20:00");
        assert_eq!(status.class, "timer-paused");
        assert_eq!(status.alt.as_deref(), Some("break"));
    }

    #[test]
    fn stopwatch_shows_elapsed() {
        let mut snap = snapshot(TimerMode::Stopwatch, TimerKind::General);
        snap.elapsed = 3725.0;
        let status = render(&snap, None, at(9, 0));
        assert_eq!(status.text, "⏱️ 01:02:05");
        assert_eq!(status.class, "stopwatch-active");
        snap.paused = true;
        assert_eq!(render(&snap, None, at(9, 0)).class, "stopwatch-paused");
    }
}
