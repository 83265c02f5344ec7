use super::CommandContext;

/// Resolve `star` argument: a 1-based row of the live table, or a full id
pub fn resolve_target(visible: &[String], arg: &str) -> Result<String, String> {
    if let Ok(row) = arg.parse::<usize>() {
        return visible
            .get(row.wrapping_sub(1))
            .cloned()
            .ok_or_else(|| format!("No row {} in the live table ({} rows)", row, visible.len()));
    }
    Ok(arg.to_string())
}

pub async fn execute(ctx: &CommandContext, visible: &[String], args: &[&str]) -> Result<String, String> {
    let arg = args
        .first()
        .ok_or("Usage: `star <row|transaction id>`".to_string())?;

    let transaction_id = resolve_target(visible, arg)?;
    let starred = ctx.state.toggle_favorite(&transaction_id).await;

    Ok(if starred {
        format!("★ Starred {}", transaction_id)
    } else {
        format!("☆ Unstarred {}", transaction_id)
    })
}
