pub fn execute() -> String {
    [
        "📖 Commands",
        "  list [pN|next|prev]   View all transactions, 10 per page",
        "  tx <id>               Show one transaction",
        "  star <row|id>         Star or unstar a transaction",
        "  help                  Show this help message",
        "  quit                  Stop the live feed",
        "",
        "The table above updates by itself as new transactions are finalized.",
    ]
    .join("\n")
}
