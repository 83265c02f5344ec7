use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::future::Future;

use crate::api::{ExplorerClient, TransactionsPage};
use crate::models::{ActionKind, Transaction};
use crate::utils::age::relative_age;
use crate::utils::links::{self, shorten};
use crate::utils::{Page, Table};

pub const TRANSACTIONS_PER_PAGE: usize = 10;

/// Which page of the "view all" list to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    First,
    Next,
    Prev,
    Number(usize),
}

pub type TransactionPager = Page<Vec<Transaction>>;

/// Build the transaction table; rows are numbered from `first_row`
pub fn transaction_table(
    txns: &[Transaction],
    favorites: &HashSet<String>,
    first_row: usize,
    now: DateTime<Utc>,
) -> Table {
    let mut table = Table::new(vec!["#", "", "Txn Id", "Action", "Age", "Sender", "Submitter"]);

    for (idx, txn) in txns.iter().enumerate() {
        let star = if favorites.contains(&txn.transaction_id) { "★" } else { "☆" };
        table.add_row(vec![
            (first_row + idx).to_string(),
            star.to_string(),
            shorten(&txn.transaction_id, 8, 6),
            txn.action.badge(),
            relative_age(txn.created_at, now),
            format!("@{}", txn.profile.handle),
            shorten(&txn.submitter, 6, 4),
        ]);
    }

    table
}

/// Per-row links: detail view, sender profile and avatar, submitters view, companion viewer
pub fn transaction_links(
    txns: &[Transaction],
    first_row: usize,
    explorer_url: &str,
    viewer_base: &str,
) -> String {
    let mut output = String::new();

    for (idx, txn) in txns.iter().enumerate() {
        output.push_str(&format!(
            "{:>2}. view {}\n",
            first_row + idx,
            links::absolute(explorer_url, &links::transaction_path(&txn.transaction_id))
        ));
        output.push_str(&format!(
            "    sender {}",
            links::absolute(explorer_url, &links::profile_path(&txn.profile.id))
        ));
        if let Some(avatar) = &txn.profile.avatar_url {
            output.push_str(&format!(" (avatar {})", avatar));
        }
        output.push('\n');
        output.push_str(&format!(
            "    submitter {}\n",
            links::absolute(explorer_url, links::SUBMITTERS_PATH)
        ));
        output.push_str(&format!(
            "    open ↗ {}\n",
            links::viewer_url(viewer_base, &txn.publication_id)
        ));
    }

    output
}

/// Move `pager` according to `request`, fetching pages through `fetch` as needed
pub async fn navigate<F, Fut>(
    pager: &mut Option<TransactionPager>,
    request: PageRequest,
    mut fetch: F,
) -> Result<(), String>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<TransactionsPage, String>>,
{
    match request {
        PageRequest::First => {
            let page = fetch(None).await?;
            *pager = Some(Page::new(page.items, page.page_info.next));
            Ok(())
        }
        PageRequest::Next => {
            if pager.is_none() {
                let page = fetch(None).await?;
                *pager = Some(Page::new(page.items, page.page_info.next));
                return Ok(());
            }
            let current = pager
                .as_mut()
                .ok_or("No list loaded yet. Use `list` first".to_string())?;
            if current.next() {
                return Ok(());
            }
            match current.next_cursor.clone() {
                Some(cursor) => {
                    let page = fetch(Some(cursor)).await?;
                    if page.items.is_empty() {
                        current.next_cursor = None;
                        return Err("📋 Already on the last page".to_string());
                    }
                    current.push(page.items, page.page_info.next);
                    Ok(())
                }
                None => Err("📋 Already on the last page".to_string()),
            }
        }
        PageRequest::Prev => {
            let current = pager
                .as_mut()
                .ok_or("No list loaded yet. Use `list` first".to_string())?;
            if current.previous() {
                Ok(())
            } else {
                Err("📋 Already on the first page".to_string())
            }
        }
        PageRequest::Number(page_number) => {
            if page_number == 0 {
                return Err("❌ Invalid page number. Pages start at 1".to_string());
            }
            if pager.is_none() {
                let page = fetch(None).await?;
                *pager = Some(Page::new(page.items, page.page_info.next));
            }
            let current = pager
                .as_mut()
                .ok_or("No list loaded yet. Use `list` first".to_string())?;

            while current.fetched_pages() < page_number {
                let cursor = match current.next_cursor.clone() {
                    Some(cursor) => cursor,
                    None => break,
                };
                let page = fetch(Some(cursor)).await?;
                if page.items.is_empty() {
                    current.next_cursor = None;
                    break;
                }
                current.push(page.items, page.page_info.next);
            }

            if current.goto(page_number) {
                Ok(())
            } else {
                Err(format!(
                    "❌ Invalid page number. Only {} page(s) available",
                    current.fetched_pages()
                ))
            }
        }
    }
}

/// Render the pager's current page of the "view all" list
pub fn render_page(
    pager: &TransactionPager,
    favorites: &HashSet<String>,
    explorer_url: &str,
    viewer_base: &str,
    now: DateTime<Utc>,
) -> String {
    let txns = pager.current();
    if txns.is_empty() && pager.is_first() {
        return "📋 Transactions\nNo transactions found".to_string();
    }

    let first_row = (pager.page_number() - 1) * TRANSACTIONS_PER_PAGE + 1;
    let mut output = format!("📋 Transactions · page {}\n", pager.page_number());
    output.push_str(&transaction_table(txns, favorites, first_row, now).render());
    output.push('\n');
    output.push_str(&transaction_links(txns, first_row, explorer_url, viewer_base));

    let footer = if pager.is_last() {
        format!("Page {} (last)", pager.page_number())
    } else {
        format!("Page {} · `list next` for more", pager.page_number())
    };
    output.push_str(&footer);
    output
}

/// Fetch pages from the API to satisfy `request`
pub async fn list_transactions(
    client: &ExplorerClient,
    pager: &mut Option<TransactionPager>,
    request: PageRequest,
) -> Result<(), String> {
    navigate(pager, request, |cursor: Option<String>| async move {
        client
            .transactions_page(TRANSACTIONS_PER_PAGE, cursor.as_deref())
            .await
            .map_err(|e| format!("Failed to fetch transactions: {}", e))
    })
    .await
}

/// Get a transaction by id
pub async fn get_transaction_detail(
    client: &ExplorerClient,
    id: &str,
) -> Result<Transaction, String> {
    client
        .transaction(id)
        .await
        .map_err(|e| format!("Failed to fetch transaction: {}", e))?
        .ok_or("❌ Transaction not found".to_string())
}

/// Multi-line receipt for a single transaction
pub fn render_detail(
    txn: &Transaction,
    starred: bool,
    explorer_url: &str,
    viewer_base: &str,
    now: DateTime<Utc>,
) -> String {
    let mut lines = vec![
        format!("📜 Transaction {}", if starred { "★" } else { "☆" }),
        format!("Id:          {}", txn.transaction_id),
        format!("Action:      {}", txn.action.badge()),
        format!(
            "Created:     {} ({})",
            txn.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            relative_age(txn.created_at, now)
        ),
        format!(
            "Sender:      @{}{}",
            txn.profile.handle,
            txn.profile.name.as_ref().map(|n| format!(" ({})", n)).unwrap_or_default()
        ),
        format!("Submitter:   {}", txn.submitter),
        format!("Publication: {}", txn.publication_id),
    ];

    if let Some(app_id) = &txn.app_id {
        lines.push(format!("App:         {}", app_id));
    }

    match &txn.action {
        ActionKind::Comment { on_profile, on_publication_id } => {
            if let Some(profile) = on_profile {
                lines.push(format!("Comment on:  @{}", profile.handle));
            }
            if let Some(publication) = on_publication_id {
                lines.push(format!("             {}", publication));
            }
        }
        ActionKind::Mirror { of_profile, of_publication_id } => {
            if let Some(profile) = of_profile {
                lines.push(format!("Mirror of:   @{}", profile.handle));
            }
            if let Some(publication) = of_publication_id {
                lines.push(format!("             {}", publication));
            }
        }
        ActionKind::Post | ActionKind::Unknown(_) => {}
    }

    lines.push(format!(
        "View:        {}",
        links::absolute(explorer_url, &links::transaction_path(&txn.transaction_id))
    ));
    lines.push(format!(
        "Profile:     {}",
        links::absolute(explorer_url, &links::profile_path(&txn.profile.id))
    ));
    lines.push(format!("Open ↗       {}", links::viewer_url(viewer_base, &txn.publication_id)));

    lines.join("\n")
}
