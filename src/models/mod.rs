//! Data models shared by the API client, the live feed and the commands.

pub mod transaction;

pub use transaction::{ActionKind, Transaction};

#[cfg(test)]
pub mod fixtures {
    use super::*;
    use super::transaction::Profile;
    use chrono::{DateTime, Utc};

    /// A post transaction with predictable fields for tests
    pub fn transaction(id: &str, created_at: DateTime<Utc>) -> Transaction {
        Transaction {
            transaction_id: id.to_string(),
            created_at,
            submitter: "0x1f9840a85d5af5bf1d1762f925bdaddc4201f984".to_string(),
            app_id: Some("lenster".to_string()),
            profile: Profile {
                id: "0x01".to_string(),
                handle: "alice.lens".to_string(),
                name: Some("Alice".to_string()),
                avatar_url: Some("https://img.example/alice.png".to_string()),
            },
            publication_id: format!("0x01-{}", id),
            action: ActionKind::Post,
        }
    }

    /// The JSON shape the API returns for `transaction(id, ..)`
    pub fn transaction_json(id: &str) -> serde_json::Value {
        serde_json::json!({
            "__typename": "DataAvailabilityPost",
            "transactionId": id,
            "createdAt": "2023-04-12T10:20:30.000Z",
            "submitter": "0x1f9840a85d5af5bf1d1762f925bdaddc4201f984",
            "appId": "lenster",
            "profile": {
                "id": "0x01",
                "handle": "alice.lens",
                "name": "Alice",
                "picture": { "original": { "url": "https://img.example/alice.png" } }
            },
            "publicationId": format!("0x01-{}", id)
        })
    }
}
