use clap::Subcommand;
use tickbar_core::PomodoroCycle;

use super::{print_status, CliResult, Context};

#[derive(Subcommand)]
pub enum PomodoroAction {
    /// Print the panel status line (default)
    Status,
    /// Start a work phase, or stop the cycle
    Toggle,
    /// Stop the cycle
    End,
    /// Start a short break now
    StartBreak,
}

pub fn run(action: Option<PomodoroAction>) -> CliResult {
    let action = action.unwrap_or(PomodoroAction::Status);
    let is_status = matches!(action, PomodoroAction::Status);
    let ctx = match Context::open() {
        Ok(ctx) => ctx,
        Err(e) if is_status => {
            print_status(Err(e));
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let mut cycle = PomodoroCycle::load(&ctx.store, &ctx.clock, &ctx.config.pomodoro);

    match action {
        PomodoroAction::Status => {
            let status = cycle.poll().map(|poll| {
                ctx.announce(&poll.events);
                poll.status
            });
            print_status(status);
        }
        PomodoroAction::Toggle => cycle.toggle()?,
        PomodoroAction::End => cycle.end()?,
        PomodoroAction::StartBreak => cycle.start_break()?,
    }
    Ok(())
}
