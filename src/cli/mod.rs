//! CLI surface for taskprefs.
//!
//! Thin handlers over the repository: every mutating command is one
//! transactional update, and `watch` just follows the preference stream.

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{ArgAction, Parser, Subcommand, builder::BoolishValueParser};

use crate::config::Config;
use crate::core::load_tasks_file;
use crate::migrate::LegacyPrefsFile;
use crate::repo::PrefsRepository;
use crate::store::PrefStore;
use crate::view::TasksUiModel;
use crate::Result;

mod render;

#[derive(Parser, Debug)]
#[command(
    name = "tp",
    version,
    about = "Task preference store",
    infer_subcommands = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Machine-readable JSON output.
    #[arg(
        long,
        global = true,
        default_value_t = false,
        num_args = 0..=1,
        value_parser = BoolishValueParser::new()
    )]
    pub json: bool,

    /// Preference blob path (default: the configured data dir).
    #[arg(long, global = true, value_name = "PATH")]
    pub prefs: Option<PathBuf>,

    /// Debug output (repeat for more).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the current preference record.
    Show,
    /// Set whether completed tasks are shown.
    SetShowCompleted {
        #[arg(value_parser = BoolishValueParser::new())]
        completed: bool,
    },
    /// Increment the preference counter.
    Bump,
    /// Toggle one half of the task ordering.
    Sort {
        #[command(subcommand)]
        which: SortCommand,
    },
    /// Derive and print a task list under the current preferences.
    List {
        /// JSON file holding the task list.
        #[arg(long, value_name = "FILE")]
        tasks: PathBuf,
    },
    /// Follow the preference stream, printing every emission.
    Watch,
}

#[derive(Subcommand, Debug)]
pub enum SortCommand {
    /// Order by deadline (latest first).
    Deadline {
        #[arg(value_parser = BoolishValueParser::new())]
        enable: bool,
    },
    /// Order by priority (most urgent first).
    Priority {
        #[arg(value_parser = BoolishValueParser::new())]
        enable: bool,
    },
}

pub fn parse_from<I, T>(args: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::parse_from(args)
}

pub fn run(cli: Cli, config: &Config) -> Result<()> {
    let prefs_path = cli
        .prefs
        .clone()
        .unwrap_or_else(|| config.store.prefs_path());
    let legacy = match LegacyPrefsFile::load(&config.store.legacy_path()) {
        Ok(legacy) => legacy,
        Err(err) => {
            tracing::warn!("legacy preference file unreadable, skipping migration: {err}");
            LegacyPrefsFile::default()
        }
    };

    let store = Arc::new(PrefStore::open(prefs_path, Some(&legacy))?);
    let repo = PrefsRepository::new(store);

    match cli.command {
        Command::Show => render::prefs(&repo.prefs(), cli.json),
        Command::SetShowCompleted { completed } => {
            render::prefs(&repo.set_show_completed(completed)?, cli.json)
        }
        Command::Bump => render::prefs(&repo.increment_counter()?, cli.json),
        Command::Sort { which } => {
            let prefs = match which {
                SortCommand::Deadline { enable } => repo.enable_sort_by_deadline(enable)?,
                SortCommand::Priority { enable } => repo.enable_sort_by_priority(enable)?,
            };
            render::prefs(&prefs, cli.json)
        }
        Command::List { tasks } => {
            let tasks = load_tasks_file(&tasks)?;
            let model = TasksUiModel::assemble(&tasks, &repo.prefs());
            render::ui_model(&model, cli.json)
        }
        Command::Watch => {
            let subscription = repo.subscribe();
            while let Ok(prefs) = subscription.recv() {
                render::prefs(&prefs, cli.json)?;
            }
            Ok(())
        }
    }
}
