pub mod help;
pub mod list;
pub mod star;
pub mod transaction;

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::api::ExplorerClient;
use crate::config::Config;
use crate::services::transaction_service::TransactionPager;
use crate::state::AppState;

/// What a command needs to do its work
pub struct CommandContext {
    pub client: Arc<ExplorerClient>,
    pub state: AppState,
    pub config: Config,
    pub pager: Mutex<Option<TransactionPager>>,
}

impl CommandContext {
    pub fn new(client: Arc<ExplorerClient>, state: AppState, config: Config) -> Self {
        Self {
            client,
            state,
            config,
            pager: Mutex::new(None),
        }
    }
}

/// What the feed loop should do after a line was handled
#[derive(Debug, PartialEq)]
pub enum CommandOutcome {
    /// Print the text below the table
    Reply(String),
    /// Redraw the live table, then print the text
    Refresh(String),
    Quit,
    Ignored,
}

/// Parse and run one line typed on stdin.
/// `visible` holds the live table's transaction ids in row order.
pub async fn handle_line(ctx: &CommandContext, visible: &[String], line: &str) -> CommandOutcome {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.is_empty() {
        return CommandOutcome::Ignored;
    }

    let command = parts[0].trim_start_matches(['$', '/']).to_lowercase();
    let args = &parts[1..];

    let result = match command.as_str() {
        "help" | "h" | "?" => Ok(CommandOutcome::Reply(help::execute())),
        "list" | "txns" | "ls" => list::execute(ctx, args).await.map(CommandOutcome::Reply),
        "tx" | "transaction" | "show" => transaction::execute(ctx, args).await.map(CommandOutcome::Reply),
        "star" | "fav" => star::execute(ctx, visible, args).await.map(CommandOutcome::Refresh),
        "quit" | "exit" | "q" => return CommandOutcome::Quit,
        other => Err(format!("Unknown command `{}`. Type `help` for the list of commands", other)),
    };

    match result {
        Ok(outcome) => outcome,
        Err(e) => {
            debug!("Command {} failed: {}", command, e);
            if e.starts_with('❌') || e.starts_with('📋') {
                CommandOutcome::Reply(e)
            } else {
                CommandOutcome::Reply(format!("❌ {}", e))
            }
        }
    }
}
