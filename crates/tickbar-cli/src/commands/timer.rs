use clap::{Subcommand, ValueEnum};
use tickbar_core::timer::{parse_duration, render};
use tickbar_core::{Clock, CoreError, TimerEngine, TimerKind, ValidationError, WaybarStatus};

use super::{print_events, print_status, CliResult, Context};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print the panel status line (default)
    Status,
    /// Pause or resume the running timer
    #[command(alias = "pause")]
    Toggle,
    /// Stop the running timer or stopwatch
    Stop,
    /// Start a countdown
    Start {
        /// Duration, e.g. 90s, 10m, 1h30m; a bare number is minutes
        #[arg(long, short)]
        duration: String,
        /// Timer name
        #[arg(long, short)]
        name: Option<String>,
        /// Session kind
        #[arg(long, value_enum, default_value_t = KindArg::General)]
        kind: KindArg,
    },
    /// Start a general countdown
    QuickTimer {
        /// Duration, e.g. 90s, 10m, 1h30m; a bare number is minutes
        #[arg(long, short)]
        duration: String,
        /// Timer name
        #[arg(long, short)]
        name: Option<String>,
    },
    /// Start a focus session
    StartFocus {
        /// Minutes (defaults to timer.focus_minutes)
        #[arg(long, short)]
        duration: Option<u64>,
        #[arg(long, short)]
        name: Option<String>,
    },
    /// Start a break session
    StartBreak {
        /// Minutes (defaults to timer.break_minutes)
        #[arg(long, short)]
        duration: Option<u64>,
        #[arg(long, short)]
        name: Option<String>,
    },
    /// Start a stopwatch
    Stopwatch {
        #[arg(long, short)]
        name: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    General,
    Focus,
    Break,
}

impl From<KindArg> for TimerKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::General => TimerKind::General,
            KindArg::Focus => TimerKind::Focus,
            KindArg::Break => TimerKind::Break,
        }
    }
}

fn status(ctx: &Context, engine: &mut TimerEngine<'_>) -> Result<WaybarStatus, CoreError> {
    let poll = engine.poll()?;
    ctx.announce(&poll.events);
    Ok(render(
        &poll.snapshot,
        poll.next_alarm.as_ref(),
        ctx.clock.now_local(),
    ))
}

fn minutes(value: Option<u64>, default: u64) -> Result<u64, CoreError> {
    let m = value.unwrap_or(default);
    m.checked_mul(60)
        .filter(|secs| *secs > 0)
        .ok_or_else(|| ValidationError::InvalidDuration(m.to_string()).into())
}

pub fn run(action: Option<TimerAction>) -> CliResult {
    let action = action.unwrap_or(TimerAction::Status);
    let is_status = matches!(action, TimerAction::Status);
    let ctx = match Context::open() {
        Ok(ctx) => ctx,
        Err(e) if is_status => {
            print_status(Err(e));
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let defaults = &ctx.config.timer;
    let mut engine = TimerEngine::load(&ctx.store, &ctx.clock, &ctx.config);

    let events = match action {
        TimerAction::Status => {
            print_status(status(&ctx, &mut engine));
            return Ok(());
        }
        TimerAction::Toggle => engine.toggle_pause()?,
        TimerAction::Stop => engine.stop()?,
        TimerAction::Start {
            duration,
            name,
            kind,
        } => {
            let secs = ctx.check("Timer Error", parse_duration(&duration).map_err(Into::into))?;
            let name = name.unwrap_or_else(|| defaults.default_name.clone());
            engine.start(secs, &name, kind.into())?
        }
        TimerAction::QuickTimer { duration, name } => {
            let secs = ctx.check("Timer Error", parse_duration(&duration).map_err(Into::into))?;
            let name = name.unwrap_or_else(|| defaults.default_name.clone());
            engine.start(secs, &name, TimerKind::General)?
        }
        TimerAction::StartFocus { duration, name } => {
            let secs = ctx.check("Timer Error", minutes(duration, defaults.focus_minutes))?;
            let name = name.unwrap_or_else(|| "Focus Session".into());
            engine.start(secs, &name, TimerKind::Focus)?
        }
        TimerAction::StartBreak { duration, name } => {
            let secs = ctx.check("Timer Error", minutes(duration, defaults.break_minutes))?;
            let name = name.unwrap_or_else(|| "Break".into());
            engine.start(secs, &name, TimerKind::Break)?
        }
        TimerAction::Stopwatch { name } => {
            let name = name.unwrap_or_else(|| defaults.stopwatch_name.clone());
            engine.start_stopwatch(&name)?
        }
    };

    ctx.announce(&events);
    print_events(&events)
}
