use std::path::PathBuf;

use clap::Subcommand;
use tickbar_core::productivity::{parse_date, NewNote};
use tickbar_core::{NewGoal, ProductivityTracker, TimerState};
use tickbar_core::storage::TIMER_FILE;

use super::{print_events, print_status, CliResult, Context};

#[derive(Subcommand)]
pub enum ProductivityAction {
    /// Print the panel status line (default)
    Status,
    /// Add a goal
    GoalAdd {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "Personal")]
        category: String,
        /// Deadline, YYYY-MM-DD
        #[arg(long)]
        deadline: Option<String>,
        /// Progress value that completes the goal
        #[arg(long, default_value_t = 1)]
        target: u64,
    },
    /// Set a goal's progress
    GoalProgress { id: u64, value: u64 },
    /// Add a daily habit
    HabitAdd {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Mark a habit done for today
    HabitComplete { id: u64 },
    /// Add a note
    NoteAdd {
        title: String,
        #[arg(long, default_value = "")]
        content: String,
        #[arg(long, default_value = "General")]
        category: String,
        /// Tag, repeatable
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Archive a note
    NoteArchive { id: u64 },
    /// Restore an archived note
    NoteUnarchive { id: u64 },
    /// Write goals, habits, notes, achievements and stats to one JSON file
    Export { path: PathBuf },
    /// Restore records from an export file
    Import { path: PathBuf },
    /// Print points, level and achievements as JSON
    Achievements,
    /// Print today's summary
    Summary,
}

pub fn run(action: Option<ProductivityAction>) -> CliResult {
    let action = action.unwrap_or(ProductivityAction::Status);
    let is_status = matches!(action, ProductivityAction::Status);
    let ctx = match Context::open() {
        Ok(ctx) => ctx,
        Err(e) if is_status => {
            print_status(Err(e));
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let tracker = ProductivityTracker::new(&ctx.store, &ctx.clock, &ctx.config.productivity);

    let events = match action {
        ProductivityAction::Status => {
            let timer: TimerState = ctx.store.load(TIMER_FILE);
            print_status(tracker.status(&timer));
            return Ok(());
        }
        ProductivityAction::GoalAdd {
            title,
            description,
            category,
            deadline,
            target,
        } => {
            let deadline = deadline
                .map(|d| ctx.check("Goal Error", parse_date(&d).map_err(Into::into)))
                .transpose()?;
            tracker.add_goal(NewGoal {
                title,
                description,
                category,
                deadline,
                target_value: target,
            })?
        }
        ProductivityAction::GoalProgress { id, value } => {
            ctx.check("Goal Error", tracker.update_goal_progress(id, value))?
        }
        ProductivityAction::HabitAdd { name, description } => {
            tracker.add_habit(&name, &description)?
        }
        ProductivityAction::HabitComplete { id } => {
            ctx.check("Habit Error", tracker.complete_habit(id))?
        }
        ProductivityAction::NoteAdd {
            title,
            content,
            category,
            tags,
        } => tracker.add_note(NewNote {
            title,
            content,
            category,
            tags,
        })?,
        ProductivityAction::NoteArchive { id } => {
            ctx.check("Note Error", tracker.archive_note(id))?
        }
        ProductivityAction::NoteUnarchive { id } => {
            ctx.check("Note Error", tracker.unarchive_note(id))?
        }
        ProductivityAction::Export { path } => {
            tracker.export_data(&path)?;
            println!("exported to {}", path.display());
            return Ok(());
        }
        ProductivityAction::Import { path } => {
            let sections = tracker.import_data(&path)?;
            println!("imported: {}", sections.join(", "));
            return Ok(());
        }
        ProductivityAction::Achievements => {
            let achievements = tracker.achievements();
            println!("{}", serde_json::to_string_pretty(&achievements)?);
            return Ok(());
        }
        ProductivityAction::Summary => {
            println!("{}", tracker.summary());
            return Ok(());
        }
    };

    ctx.announce(&events);
    print_events(&events)
}
