//! Kanban Board CLI Entry Point

mod cli;
mod output;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use kanban_board::item_order::{CategoryId, ItemId, Placement};
use kanban_board::{Board, BoardApi, BoardState, Config, HttpApi, ItemDraft};

use cli::{AddItemArgs, Cli, Commands, MoveArgs};

const APP_NAME: &str = "kanban-board";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let log_dir = cli
        .log_dir
        .clone()
        .unwrap_or_else(default_log_dir);
    if let Err(e) = rolling_logger::init_logger(&log_dir, APP_NAME) {
        eprintln!("Logging disabled: {}", e);
    }

    let config = Config::resolve(cli.config.as_deref(), cli.endpoint.clone())?;
    let command = cli.command.unwrap_or(Commands::Show);
    if let Commands::SaveConfig { path } = &command {
        config.save(path)?;
        println!("Saved config to {}", path.display());
        return Ok(());
    }

    let api = Arc::new(HttpApi::new(&config)?);
    tracing::info!(endpoint = %api.endpoint(), "using board endpoint");
    let mut board = Board::load(api).await?;

    run(&mut board, command)?;

    let failures = board.settle().await;
    output::print_board(board.state());
    output::print_failures(&failures);
    if !failures.is_empty() {
        for failure in &failures {
            rolling_logger::error(&failure.to_string());
        }
        return Err(format!("{} request(s) failed", failures.len()).into());
    }
    Ok(())
}

fn run<A: BoardApi + 'static>(board: &mut Board<A>, command: Commands) -> Result<(), Box<dyn Error>> {
    rolling_logger::info(&format!("command: {:?}", command));
    match command {
        Commands::Show | Commands::SaveConfig { .. } => {}
        Commands::AddCategory { title } => {
            let id = board.add_category(&title);
            println!("Created category {}", id);
        }
        Commands::AddItem(args) => add_item(board, args)?,
        Commands::Move(args) => move_item(board, args)?,
        Commands::Delete { item } => {
            let id = resolve_item(board.state(), &item)?;
            board.request_delete(id);
            if let Some(removed) = board.confirm_delete() {
                println!("Deleted \"{}\"", removed.title);
            }
        }
    }
    Ok(())
}

fn add_item<A: BoardApi + 'static>(board: &mut Board<A>, args: AddItemArgs) -> Result<(), Box<dyn Error>> {
    let category = resolve_category(board.state(), &args.category)?;
    let draft = ItemDraft {
        date: args
            .date
            .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string()),
        title: args.title,
        text: args.text,
    };
    board.set_draft(&category, draft);
    let id = board
        .add_item(&category)
        .ok_or_else(|| format!("category {} disappeared", category))?;
    println!("Created item {}", id);
    Ok(())
}

fn move_item<A: BoardApi + 'static>(board: &mut Board<A>, args: MoveArgs) -> Result<(), Box<dyn Error>> {
    let id = resolve_item(board.state(), &args.item)?;
    let placement = match (args.before, args.to) {
        (Some(before), _) => Placement::Before(resolve_item(board.state(), &before)?),
        (None, Some(to)) => Placement::End(resolve_category(board.state(), &to)?),
        (None, None) => return Err("either --before or --to is required".into()),
    };
    if board.move_item(&id, placement).is_empty() {
        println!("Nothing to move");
    } else if let Some(category) = board.state().category_of(&id) {
        println!("Moved to {}", category.display_title());
    }
    Ok(())
}

fn resolve_item(state: &BoardState, query: &str) -> Result<ItemId, Box<dyn Error>> {
    state
        .find_item(query)
        .map(|item| item.id.clone())
        .ok_or_else(|| format!("no unique item matches \"{}\"", query).into())
}

fn resolve_category(state: &BoardState, query: &str) -> Result<CategoryId, Box<dyn Error>> {
    state
        .find_category(query)
        .map(|category| category.id.clone())
        .ok_or_else(|| format!("no unique category matches \"{}\"", query).into())
}

fn default_log_dir() -> PathBuf {
    std::env::temp_dir().join(APP_NAME)
}
