use std::path::PathBuf;

use anyhow::Result;
use checkin_core::checkin::{CheckInStep, NotePrivacy, Priority};
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "checkin")]
#[command(about = "Guided relationship check-ins from the terminal", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory holding the session slot and check-in history
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the topics that can be discussed
    Categories,
    /// Start a new check-in, optionally preselecting topics
    Start { categories: Vec<String> },
    /// Show the active check-in
    Status {
        /// Print the session snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replace the selected topics
    Select {
        #[arg(required = true)]
        categories: Vec<String>,
    },
    /// Add or remove one topic
    Toggle { category: String },
    /// Complete the current step and move on
    Next,
    /// Go back one step
    Back,
    /// Jump to a step (camelCase name, e.g. `reflection`)
    Goto { step: CheckInStep },
    /// Update progress on a selected topic
    Progress {
        category: String,
        /// Mark the topic as discussed
        #[arg(long)]
        complete: bool,
        /// Replace the topic's discussion notes
        #[arg(long)]
        notes: Option<String>,
        /// Add time spent, in seconds
        #[arg(long)]
        time: Option<u64>,
    },
    /// Manage draft notes
    Note {
        #[command(subcommand)]
        action: NoteAction,
    },
    /// Manage action items
    Action {
        #[command(subcommand)]
        action: ActionItemAction,
    },
    /// Finish the check-in, committing draft notes
    Complete,
    /// Abandon the check-in, discarding draft notes
    Abandon,
    /// List past check-ins
    History,
}

#[derive(Subcommand)]
enum NoteAction {
    /// Add a draft note
    Add {
        content: String,
        #[arg(long, default_value = "shared")]
        privacy: NotePrivacy,
        /// Attach the note to a selected topic
        #[arg(long)]
        category: Option<String>,
    },
    /// Edit a draft note (id or unique id prefix)
    Edit {
        id: String,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        privacy: Option<NotePrivacy>,
        #[arg(long, conflicts_with = "detach")]
        category: Option<String>,
        /// Detach the note from its topic
        #[arg(long)]
        detach: bool,
    },
    /// Remove a draft note
    Rm { id: String },
}

#[derive(Subcommand)]
enum ActionItemAction {
    /// Add an action item
    Add {
        title: String,
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// Partner id responsible for the item
        #[arg(long)]
        assign: Option<String>,
    },
    /// Edit an action item (id or unique id prefix)
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long, conflicts_with = "unassign")]
        assign: Option<String>,
        #[arg(long)]
        unassign: bool,
    },
    /// Flip an action item between done and open
    Toggle { id: String },
    /// Remove an action item
    Rm { id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = commands::load_config(cli.config.as_deref())?;
    commands::init_logging(&config.logging.filter);

    let mut app = commands::App::open(config, cli.data_dir)?;

    match cli.command {
        Commands::Categories => commands::session::categories(&app),
        Commands::Start { categories } => commands::session::start(&mut app, categories)?,
        Commands::Status { json } => commands::session::status(&app, json)?,
        Commands::Select { categories } => commands::navigate::select(&mut app, categories)?,
        Commands::Toggle { category } => commands::navigate::toggle(&mut app, &category)?,
        Commands::Next => commands::navigate::next(&mut app)?,
        Commands::Back => commands::navigate::back(&mut app)?,
        Commands::Goto { step } => commands::navigate::goto(&mut app, step)?,
        Commands::Progress {
            category,
            complete,
            notes,
            time,
        } => commands::navigate::progress(&mut app, &category, complete, notes, time)?,
        Commands::Note { action } => match action {
            NoteAction::Add {
                content,
                privacy,
                category,
            } => commands::notes::add(&mut app, content, privacy, category)?,
            NoteAction::Edit {
                id,
                content,
                privacy,
                category,
                detach,
            } => {
                let category = if detach { Some(None) } else { category.map(Some) };
                commands::notes::edit(&mut app, &id, content, privacy, category)?
            }
            NoteAction::Rm { id } => commands::notes::remove(&mut app, &id)?,
        },
        Commands::Action { action } => match action {
            ActionItemAction::Add {
                title,
                priority,
                assign,
            } => commands::actions::add(&mut app, title, priority, assign)?,
            ActionItemAction::Edit {
                id,
                title,
                priority,
                assign,
                unassign,
            } => {
                let assigned_to = if unassign { Some(None) } else { assign.map(Some) };
                commands::actions::edit(&mut app, &id, title, priority, assigned_to)?
            }
            ActionItemAction::Toggle { id } => commands::actions::toggle(&mut app, &id)?,
            ActionItemAction::Rm { id } => commands::actions::remove(&mut app, &id)?,
        },
        Commands::Complete => commands::session::complete(&mut app)?,
        Commands::Abandon => commands::session::abandon(&mut app)?,
        Commands::History => commands::session::history(&app)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_step_and_enums() {
        let cli = Cli::try_parse_from(["checkin", "goto", "categoryDiscussion"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Goto {
                step: CheckInStep::CategoryDiscussion
            }
        ));

        let cli = Cli::try_parse_from([
            "checkin", "action", "add", "Book a sitter", "--priority", "high", "--assign", "sam",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Action {
                action: ActionItemAction::Add {
                    priority: Priority::High,
                    ..
                }
            }
        ));
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["checkin", "status", "--data-dir", "/tmp/x"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn test_select_requires_categories() {
        assert!(Cli::try_parse_from(["checkin", "select"]).is_err());
    }
}
