use chrono::Utc;

use super::CommandContext;
use crate::services::transaction_service::{self, PageRequest};

/// Parse `list` arguments: nothing, `next`, `prev`, `p2` or `2`
pub fn parse_request(args: &[&str]) -> Result<PageRequest, String> {
    let Some(arg) = args.first() else {
        return Ok(PageRequest::First);
    };

    match arg.to_lowercase().as_str() {
        "next" | "n" => Ok(PageRequest::Next),
        "prev" | "previous" | "p" => Ok(PageRequest::Prev),
        page_arg => {
            let page_str = page_arg.strip_prefix('p').unwrap_or(page_arg);
            page_str
                .parse::<usize>()
                .map(PageRequest::Number)
                .map_err(|_| "Invalid page number. Use: `list`, `list next`, `list prev` or `list p2`".to_string())
        }
    }
}

pub async fn execute(ctx: &CommandContext, args: &[&str]) -> Result<String, String> {
    let request = parse_request(args)?;

    let mut pager = ctx.pager.lock().await;
    transaction_service::list_transactions(&ctx.client, &mut pager, request).await?;

    let current = pager
        .as_ref()
        .ok_or("No transactions loaded".to_string())?;
    let favorites = ctx.state.favorites().await;

    Ok(transaction_service::render_page(
        current,
        &favorites,
        &ctx.config.explorer_url,
        &ctx.state.selected_environment().viewer_url,
        Utc::now(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::context;

    #[test]
    fn test_parse_request() {
        assert_eq!(parse_request(&[]), Ok(PageRequest::First));
        assert_eq!(parse_request(&["next"]), Ok(PageRequest::Next));
        assert_eq!(parse_request(&["PREV"]), Ok(PageRequest::Prev));
        assert_eq!(parse_request(&["p"]), Ok(PageRequest::Prev));
        assert_eq!(parse_request(&["p3"]), Ok(PageRequest::Number(3)));
        assert_eq!(parse_request(&["4"]), Ok(PageRequest::Number(4)));
        assert!(parse_request(&["pages"]).is_err());
    }

    #[tokio::test]
    async fn test_prev_without_list_is_an_error() {
        let ctx = context();
        let err = execute(&ctx, &["prev"]).await.unwrap_err();
        assert!(err.contains("Use `list` first"));
    }
}
