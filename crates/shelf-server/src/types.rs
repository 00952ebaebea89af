//! Book resource types

use serde::{Deserialize, Serialize};

/// Backend-assigned book identifier.
///
/// The in-memory and Redis backends issue sequential integers; the MongoDB
/// backend issues generated ObjectIds (24 hex characters). Untagged so a
/// book serializes with a bare number or a hex string depending on which
/// backend created it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookId {
    Seq(i64),
    Oid(String),
}

impl BookId {
    /// Parse a path segment into an id. Digits become a sequential id,
    /// 24 hex characters become an ObjectId; anything else is rejected.
    pub fn parse(raw: &str) -> Option<BookId> {
        if let Ok(n) = raw.parse::<i64>() {
            return Some(BookId::Seq(n));
        }
        if raw.len() == 24 && raw.chars().all(|c| c.is_ascii_hexdigit()) {
            return Some(BookId::Oid(raw.to_ascii_lowercase()));
        }
        None
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookId::Seq(n) => write!(f, "{}", n),
            BookId::Oid(hex) => f.write_str(hex),
        }
    }
}

/// A stored book record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
}

/// Create/update payload. The id is never taken from the body: the backend
/// assigns it on create and the path id wins on update.
#[derive(Debug, Clone, Deserialize)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_accepts_integers_and_object_ids() {
        assert_eq!(BookId::parse("1"), Some(BookId::Seq(1)));
        assert_eq!(BookId::parse("42"), Some(BookId::Seq(42)));
        assert_eq!(
            BookId::parse("65f1a2b3c4d5e6f708192a3b"),
            Some(BookId::Oid("65f1a2b3c4d5e6f708192a3b".to_string()))
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(BookId::parse("not-an-id"), None);
        assert_eq!(BookId::parse(""), None);
        // 23 hex characters is neither an integer nor an ObjectId
        assert_eq!(BookId::parse("65f1a2b3c4d5e6f708192a3"), None);
    }

    #[test]
    fn ids_serialize_as_number_or_hex_string() {
        let seq = Book {
            id: BookId::Seq(1),
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&seq).unwrap(),
            json!({ "id": 1, "title": "Dune", "author": "Herbert" })
        );

        let oid = Book {
            id: BookId::Oid("65f1a2b3c4d5e6f708192a3b".to_string()),
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&oid).unwrap()["id"],
            json!("65f1a2b3c4d5e6f708192a3b")
        );
    }

    #[test]
    fn draft_ignores_a_caller_supplied_id() {
        let draft: BookDraft =
            serde_json::from_value(json!({ "id": 99, "title": "Dune", "author": "Herbert" }))
                .unwrap();
        assert_eq!(draft.title, "Dune");
        assert_eq!(draft.author, "Herbert");
    }
}
