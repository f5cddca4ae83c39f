//! # tickbar core library
//!
//! State machines behind a set of status-bar modules. Every panel refresh is
//! a separate short-lived process: it loads JSON state from the cache
//! directory, advances it against the wall clock, writes it back and renders
//! one status line. No module keeps a thread or a timer of its own.
//!
//! ## Architecture
//!
//! - **Timer Engine**: countdown and stopwatch with pause accounting and
//!   completion detected lazily on the next poll
//! - **Alarms**: daily recurring alarms, fired from the timer poll
//! - **Pomodoro**: an independent work/break cycle
//! - **Productivity**: goals, habits, points and the focus/break session log
//!   that the timer engine writes into
//! - **Storage**: atomic JSON state files and a TOML configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: timer state machine
//! - [`AlarmScheduler`]: alarm list and firing
//! - [`ProductivityTracker`]: achievement and session bookkeeping
//! - [`StateStore`]: state file access
//! - [`Clock`]: injected time source
//! - [`Notifier`]: desktop side effects for [`Event`]s

pub mod alarm;
pub mod clock;
pub mod error;
pub mod events;
pub mod notify;
pub mod pomodoro;
pub mod productivity;
pub mod status;
pub mod storage;
pub mod timer;

pub use alarm::{AlarmEntry, AlarmScheduler};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, Result, ValidationError};
pub use events::Event;
pub use notify::{Announcer, DesktopNotifier, Notifier, RecordingNotifier};
pub use pomodoro::{PomodoroCycle, PomodoroPhase, PomodoroState};
pub use productivity::{NewGoal, ProductivityTracker, SessionOutcome};
pub use status::WaybarStatus;
pub use storage::{Config, StateStore};
pub use timer::{TimerEngine, TimerKind, TimerMode, TimerSnapshot, TimerState};
