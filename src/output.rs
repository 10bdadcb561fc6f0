//! Human-readable board output.

use kanban_board::{ApiError, BoardState};

/// Print each column as a header followed by its cards.
pub fn print_board(state: &BoardState) {
    if state.categories().is_empty() {
        println!("(no categories)");
        return;
    }

    for category in state.categories() {
        println!("== {} [{}] ({})", category.display_title(), category.id, category.items().len());
        if category.items().is_empty() {
            println!("   (empty)");
        }
        for item in category.items() {
            println!("   {}  {}  {}", short_id(item.id.as_str()), item.date, item.title);
            if let Some(text) = item.text.as_deref().filter(|t| !t.is_empty()) {
                for line in text.lines() {
                    println!("      {}", line);
                }
            }
        }
        println!();
    }
}

pub fn print_failures(failures: &[ApiError]) {
    if failures.is_empty() {
        return;
    }
    eprintln!("{} request(s) failed; the board above may differ from the server:", failures.len());
    for failure in failures {
        eprintln!("  {}", failure);
    }
}

fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}
