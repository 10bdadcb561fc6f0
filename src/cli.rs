//! Command-line arguments for the `kanban` binary.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

/// Kanban note board client
#[derive(Parser, Debug)]
#[command(name = "kanban")]
#[command(about = "Show and rearrange a kanban board stored behind a REST endpoint")]
#[command(version)]
pub struct Cli {
    /// Base URL of the board API (overrides config and API_ENDPOINT)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// JSON config file with endpoint and timeout_secs
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for the rotating log file
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print every column (default)
    Show,
    /// Create an empty column after the existing ones
    AddCategory {
        /// Column title
        title: String,
    },
    /// Create a card at the top of a column
    AddItem(AddItemArgs),
    /// Move a card before another card or to the end of a column
    Move(MoveArgs),
    /// Delete a card
    Delete {
        /// Card id or unique id prefix
        item: String,
    },
    /// Write the resolved endpoint and timeout to a config file
    SaveConfig {
        /// Destination JSON file
        path: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct AddItemArgs {
    /// Column id, title or unique id prefix
    pub category: String,

    #[arg(long)]
    pub title: String,

    /// Defaults to today (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    #[arg(long)]
    pub text: Option<String>,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("target").required(true).args(["before", "to"])))]
pub struct MoveArgs {
    /// Card id or unique id prefix
    pub item: String,

    /// Insert before this card
    #[arg(long)]
    pub before: Option<String>,

    /// Append to this column
    #[arg(long)]
    pub to: Option<String>,
}
