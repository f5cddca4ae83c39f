use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "tickbar", version, about = "Timer, alarm and productivity modules for waybar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Countdown timer and stopwatch
    Timer {
        #[command(subcommand)]
        action: Option<commands::timer::TimerAction>,
    },
    /// Daily alarms
    Alarm {
        #[command(subcommand)]
        action: commands::alarm::AlarmAction,
    },
    /// Pomodoro work/break cycle
    Pomodoro {
        #[command(subcommand)]
        action: Option<commands::pomodoro::PomodoroAction>,
    },
    /// Goals, habits and achievements
    Productivity {
        #[command(subcommand)]
        action: Option<commands::productivity::ProductivityAction>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Logs go to stderr so stdout stays one JSON line per call.
fn init_logging() {
    let filter =
        EnvFilter::try_from_env("TICKBAR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Alarm { action } => commands::alarm::run(action),
        Commands::Pomodoro { action } => commands::pomodoro::run(action),
        Commands::Productivity { action } => commands::productivity::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "tickbar", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
