use chrono::Utc;

use super::CommandContext;
use crate::services::transaction_service;

pub async fn execute(ctx: &CommandContext, args: &[&str]) -> Result<String, String> {
    let id = args
        .first()
        .ok_or("Usage: `tx <transaction id>`".to_string())?;

    let txn = transaction_service::get_transaction_detail(&ctx.client, id).await?;
    let starred = ctx.state.favorites().await.contains(&txn.transaction_id);

    Ok(transaction_service::render_detail(
        &txn,
        starred,
        &ctx.config.explorer_url,
        &ctx.state.selected_environment().viewer_url,
        Utc::now(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::context;

    #[tokio::test]
    async fn test_missing_id_shows_usage() {
        let ctx = context();
        let err = execute(&ctx, &[]).await.unwrap_err();
        assert!(err.starts_with("Usage"));
    }
}
