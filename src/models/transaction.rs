//! Data-availability transaction models

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Profile (actor) attached to a transaction
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawProfile")]
pub struct Profile {
    pub id: String,
    pub handle: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

/// What the transaction did on the publication
#[derive(Debug, Clone, PartialEq)]
pub enum ActionKind {
    Post,
    Comment {
        on_profile: Option<Profile>,
        on_publication_id: Option<String>,
    },
    Mirror {
        of_profile: Option<Profile>,
        of_publication_id: Option<String>,
    },
    Unknown(String),
}

impl ActionKind {
    /// Short label shown in the action column
    pub fn badge(&self) -> String {
        match self {
            ActionKind::Post => "POST".to_string(),
            ActionKind::Comment { .. } => "COMMENT".to_string(),
            ActionKind::Mirror { .. } => "MIRROR".to_string(),
            ActionKind::Unknown(name) => name.to_uppercase(),
        }
    }
}

/// A finalized data-availability transaction. Never mutated after decoding.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawTransaction")]
pub struct Transaction {
    pub transaction_id: String,
    pub created_at: DateTime<Utc>,
    pub submitter: String,
    pub app_id: Option<String>,
    pub profile: Profile,
    pub publication_id: String,
    pub action: ActionKind,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPicture {
    MediaSet { original: RawMedia },
    NftImage { uri: String },
    Other(serde_json::Value),
}

#[derive(Deserialize)]
struct RawMedia {
    url: String,
}

#[derive(Deserialize)]
struct RawProfile {
    id: String,
    handle: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<RawPicture>,
}

impl From<RawProfile> for Profile {
    fn from(raw: RawProfile) -> Self {
        let avatar_url = raw.picture.and_then(|p| match p {
            RawPicture::MediaSet { original } => Some(original.url),
            RawPicture::NftImage { uri } => Some(uri),
            RawPicture::Other(_) => None,
        });
        Profile {
            id: raw.id,
            handle: raw.handle,
            name: raw.name.filter(|n| !n.is_empty()),
            avatar_url,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransaction {
    #[serde(rename = "__typename", default)]
    typename: Option<String>,
    transaction_id: String,
    created_at: String,
    submitter: String,
    #[serde(default)]
    app_id: Option<String>,
    profile: Profile,
    publication_id: String,
    #[serde(default)]
    commented_on_profile: Option<Profile>,
    #[serde(default)]
    commented_on_publication_id: Option<String>,
    #[serde(default)]
    mirror_of_profile: Option<Profile>,
    #[serde(default)]
    mirror_of_publication_id: Option<String>,
}

impl TryFrom<RawTransaction> for Transaction {
    type Error = String;

    fn try_from(raw: RawTransaction) -> Result<Self, Self::Error> {
        let created_at = DateTime::parse_from_rfc3339(&raw.created_at)
            .map_err(|e| format!("invalid createdAt '{}': {}", raw.created_at, e))?
            .with_timezone(&Utc);

        let action = match raw.typename.as_deref() {
            None | Some("DataAvailabilityPost") => ActionKind::Post,
            Some("DataAvailabilityComment") => ActionKind::Comment {
                on_profile: raw.commented_on_profile,
                on_publication_id: raw.commented_on_publication_id,
            },
            Some("DataAvailabilityMirror") => ActionKind::Mirror {
                of_profile: raw.mirror_of_profile,
                of_publication_id: raw.mirror_of_publication_id,
            },
            Some(other) => ActionKind::Unknown(other.trim_start_matches("DataAvailability").to_string()),
        };

        Ok(Transaction {
            transaction_id: raw.transaction_id,
            created_at,
            submitter: raw.submitter,
            app_id: raw.app_id,
            profile: raw.profile,
            publication_id: raw.publication_id,
            action,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile_json(handle: &str) -> serde_json::Value {
        json!({
            "id": "0x01",
            "handle": handle,
            "name": "",
            "picture": { "original": { "url": "https://img.example/avatar.png" } }
        })
    }

    #[test]
    fn test_decode_post() {
        let tx: Transaction = serde_json::from_value(json!({
            "__typename": "DataAvailabilityPost",
            "transactionId": "tx-post",
            "createdAt": "2023-04-12T10:20:30.000Z",
            "submitter": "0xabc",
            "appId": "lenster",
            "profile": profile_json("alice.lens"),
            "publicationId": "0x01-0x02-DA-1234"
        }))
        .expect("post decodes");

        assert_eq!(tx.transaction_id, "tx-post");
        assert_eq!(tx.action, ActionKind::Post);
        assert_eq!(tx.action.badge(), "POST");
        assert_eq!(tx.profile.handle, "alice.lens");
        assert_eq!(tx.profile.name, None);
        assert_eq!(tx.profile.avatar_url.as_deref(), Some("https://img.example/avatar.png"));
        assert_eq!(tx.created_at.to_rfc3339(), "2023-04-12T10:20:30+00:00");
    }

    #[test]
    fn test_decode_comment_and_mirror() {
        let comment: Transaction = serde_json::from_value(json!({
            "__typename": "DataAvailabilityComment",
            "transactionId": "tx-comment",
            "createdAt": "2023-04-12T10:20:30Z",
            "submitter": "0xabc",
            "profile": { "id": "0x02", "handle": "bob.lens", "picture": { "uri": "ipfs://nft" } },
            "publicationId": "0x02-0x01-DA-1",
            "commentedOnProfile": profile_json("alice.lens"),
            "commentedOnPublicationId": "0x01-0x02"
        }))
        .expect("comment decodes");

        match &comment.action {
            ActionKind::Comment { on_profile, on_publication_id } => {
                assert_eq!(on_profile.as_ref().map(|p| p.handle.as_str()), Some("alice.lens"));
                assert_eq!(on_publication_id.as_deref(), Some("0x01-0x02"));
            }
            other => panic!("expected comment, got {:?}", other),
        }
        assert_eq!(comment.profile.avatar_url.as_deref(), Some("ipfs://nft"));

        let mirror: Transaction = serde_json::from_value(json!({
            "__typename": "DataAvailabilityMirror",
            "transactionId": "tx-mirror",
            "createdAt": "2023-04-12T10:20:30Z",
            "submitter": "0xabc",
            "profile": { "id": "0x03", "handle": "carol.lens", "picture": null },
            "publicationId": "0x03-0x01-DA-1",
            "mirrorOfPublicationId": "0x01-0x02"
        }))
        .expect("mirror decodes");

        assert_eq!(mirror.action.badge(), "MIRROR");
        assert_eq!(mirror.profile.avatar_url, None);
    }

    #[test]
    fn test_unknown_typename_keeps_name() {
        let tx: Transaction = serde_json::from_value(json!({
            "__typename": "DataAvailabilityQuote",
            "transactionId": "tx-quote",
            "createdAt": "2023-04-12T10:20:30Z",
            "submitter": "0xabc",
            "profile": { "id": "0x03", "handle": "carol.lens" },
            "publicationId": "0x03-0x01-DA-2"
        }))
        .expect("unknown kind decodes");

        assert_eq!(tx.action, ActionKind::Unknown("Quote".to_string()));
        assert_eq!(tx.action.badge(), "QUOTE");
    }

    #[test]
    fn test_missing_fields_fail() {
        let result = serde_json::from_value::<Transaction>(json!({
            "__typename": "DataAvailabilityPost",
            "transactionId": "tx"
        }));
        assert!(result.is_err());

        let bad_date = serde_json::from_value::<Transaction>(json!({
            "transactionId": "tx",
            "createdAt": "yesterday",
            "submitter": "0xabc",
            "profile": { "id": "0x03", "handle": "carol.lens" },
            "publicationId": "p"
        }));
        assert!(bad_date.is_err());
    }
}
