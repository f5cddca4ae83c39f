use clap::Subcommand;
use serde::Serialize;
use tickbar_core::AlarmScheduler;

use super::{print_events, CliResult, Context};

#[derive(Subcommand)]
pub enum AlarmAction {
    /// Add a daily alarm
    Add {
        /// Time of day, HH:MM
        time: String,
        /// Alarm label
        #[arg(long, short, default_value = "Alarm")]
        name: String,
    },
    /// Remove the alarm at an index (see `alarm list`)
    Remove { index: usize },
    /// Enable or disable the alarm at an index
    Toggle { index: usize },
    /// List alarms as JSON
    List,
}

#[derive(Serialize)]
struct ListedAlarm<'a> {
    index: usize,
    time: String,
    name: &'a str,
    enabled: bool,
    next: String,
}

pub fn run(action: AlarmAction) -> CliResult {
    let ctx = Context::open()?;
    let mut alarms = AlarmScheduler::load(&ctx.store, &ctx.clock);

    let events = match action {
        AlarmAction::Add { time, name } => {
            vec![ctx.check("Alarm Error", alarms.add(&time, &name))?]
        }
        AlarmAction::Remove { index } => alarms.remove(index)?.into_iter().collect(),
        AlarmAction::Toggle { index } => alarms.toggle(index)?.into_iter().collect(),
        AlarmAction::List => {
            let listed: Vec<ListedAlarm<'_>> = alarms
                .list()
                .iter()
                .enumerate()
                .map(|(index, alarm)| ListedAlarm {
                    index,
                    time: alarm.time_of_day(),
                    name: &alarm.name,
                    enabled: alarm.enabled,
                    next: alarm.time.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listed)?);
            return Ok(());
        }
    };

    ctx.announce(&events);
    print_events(&events)
}
