//! Navigation links into the explorer and the companion viewer

pub const TRANSACTIONS_PATH: &str = "/txns";
pub const SUBMITTERS_PATH: &str = "/submitters";

pub fn transaction_path(transaction_id: &str) -> String {
    format!("/tx/{}", transaction_id)
}

pub fn profile_path(profile_id: &str) -> String {
    format!("/profile/{}", profile_id)
}

/// Join an explorer path onto its base URL
pub fn absolute(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Where the publication can be seen in the companion viewer
pub fn viewer_url(viewer_base: &str, publication_id: &str) -> String {
    format!("{}/posts/{}", viewer_base.trim_end_matches('/'), publication_id)
}

/// Shorten a long id or address as `0x1f98…f984`
pub fn shorten(value: &str, head: usize, tail: usize) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= head + tail + 1 {
        return value.to_string();
    }
    let start: String = chars[..head].iter().collect();
    let end: String = chars[chars.len() - tail..].iter().collect();
    format!("{}…{}", start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(transaction_path("abc"), "/tx/abc");
        assert_eq!(profile_path("0x01"), "/profile/0x01");
        assert_eq!(absolute("https://explorer.example/", TRANSACTIONS_PATH), "https://explorer.example/txns");
        assert_eq!(absolute("https://explorer.example", SUBMITTERS_PATH), "https://explorer.example/submitters");
        assert_eq!(viewer_url("https://hey.xyz/", "0x01-0x02"), "https://hey.xyz/posts/0x01-0x02");
    }

    #[test]
    fn test_shorten() {
        assert_eq!(shorten("0x1f9840a85d5af5bf1d1762f925bdaddc4201f984", 6, 4), "0x1f98…f984");
        assert_eq!(shorten("short", 6, 4), "short");
        assert_eq!(shorten("exactly-11c", 6, 4), "exactly-11c");
    }
}
