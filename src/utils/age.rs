use chrono::{DateTime, Utc};

/// Human-relative age of `then` as seen at `now`, e.g. "3 minutes ago".
/// Timestamps in the future read as "just now".
pub fn relative_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = now.signed_duration_since(then).num_seconds();
    if seconds < 0 {
        return "just now".to_string();
    }

    let minutes = seconds as f64 / 60.0;
    let hours = minutes / 60.0;
    let days = hours / 24.0;

    if seconds < 45 {
        "a few seconds ago".to_string()
    } else if seconds < 90 {
        "a minute ago".to_string()
    } else if minutes < 44.5 {
        format!("{} minutes ago", minutes.round() as i64)
    } else if minutes < 89.5 {
        "an hour ago".to_string()
    } else if hours < 21.5 {
        format!("{} hours ago", hours.round() as i64)
    } else if hours < 35.5 {
        "a day ago".to_string()
    } else if days < 25.5 {
        format!("{} days ago", days.round() as i64)
    } else if days < 45.0 {
        "a month ago".to_string()
    } else if days < 319.0 {
        format!("{} months ago", (days / 30.4).round() as i64)
    } else if days < 547.0 {
        "a year ago".to_string()
    } else {
        format!("{} years ago", (days / 365.25).round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ago(d: Duration) -> String {
        let now = Utc::now();
        relative_age(now - d, now)
    }

    #[test]
    fn test_relative_age_buckets() {
        assert_eq!(ago(Duration::seconds(5)), "a few seconds ago");
        assert_eq!(ago(Duration::seconds(60)), "a minute ago");
        assert_eq!(ago(Duration::minutes(5)), "5 minutes ago");
        assert_eq!(ago(Duration::minutes(60)), "an hour ago");
        assert_eq!(ago(Duration::hours(3)), "3 hours ago");
        assert_eq!(ago(Duration::hours(24)), "a day ago");
        assert_eq!(ago(Duration::days(4)), "4 days ago");
        assert_eq!(ago(Duration::days(31)), "a month ago");
        assert_eq!(ago(Duration::days(400)), "a year ago");
        assert_eq!(ago(Duration::days(800)), "2 years ago");
    }

    #[test]
    fn test_future_is_just_now() {
        let now = Utc::now();
        assert_eq!(relative_age(now + Duration::seconds(30), now), "just now");
    }
}
