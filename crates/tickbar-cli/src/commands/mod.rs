pub mod alarm;
pub mod config;
pub mod pomodoro;
pub mod productivity;
pub mod timer;

use tickbar_core::{
    Announcer, Config, CoreError, DesktopNotifier, Event, StateStore, SystemClock, WaybarStatus,
};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Everything one invocation needs: state root, clock, config and the
/// desktop notifier built from it.
pub struct Context {
    pub store: StateStore,
    pub clock: SystemClock,
    pub config: Config,
    notifier: DesktopNotifier,
}

impl Context {
    pub fn open() -> Result<Self, CoreError> {
        let store = StateStore::open()?;
        let config = Config::load_or_default();
        let notifier = DesktopNotifier::from_config(&config);
        tracing::debug!("state root {}", store.root().display());
        Ok(Self {
            store,
            clock: SystemClock,
            config,
            notifier,
        })
    }

    pub fn announcer(&self) -> Announcer<'_> {
        Announcer::new(&self.notifier, &self.config)
    }

    pub fn announce(&self, events: &[Event]) {
        self.announcer().announce_all(events);
    }

    /// Pass a core result through, telling the user about rejected input.
    pub fn check<T>(&self, title: &str, result: Result<T, CoreError>) -> Result<T, CoreError> {
        if let Err(e) = &result {
            if e.is_user_error() {
                self.announcer().error(title, &e.to_string());
            }
        }
        result
    }
}

/// Print one status line. Failures become the error status so the panel
/// keeps drawing something.
pub fn print_status(result: Result<WaybarStatus, CoreError>) {
    let status = result.unwrap_or_else(|e| {
        tracing::error!("status failed: {e}");
        WaybarStatus::error(e)
    });
    println!("{}", status.to_json());
}

/// Echo events as JSON lines.
pub fn print_events(events: &[Event]) -> CliResult {
    for event in events {
        println!("{}", serde_json::to_string(event)?);
    }
    Ok(())
}
