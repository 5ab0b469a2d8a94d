use serde::{Deserialize, Serialize};

/// Lowest rating a submission may carry
pub const MIN_RATING: i32 = 1;
/// Highest rating a submission may carry
pub const MAX_RATING: i32 = 5;

/// A persisted feedback submission as returned by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    #[serde(rename = "sessionID")]
    pub session_id: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    pub rating: i32,
    pub comment: String,
}

/// A submission that has not been stored yet (no id assigned)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub session_id: String,
    pub user_id: String,
    pub rating: i32,
    pub comment: String,
}

impl NewEntry {
    pub fn new(
        session_id: impl Into<String>,
        user_id: impl Into<String>,
        rating: i32,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: user_id.into(),
            rating,
            comment: comment.into(),
        }
    }

    pub fn has_valid_rating(&self) -> bool {
        (MIN_RATING..=MAX_RATING).contains(&self.rating)
    }

    /// Attach the store-assigned identifier
    pub fn into_entry(self, id: impl Into<String>) -> Entry {
        Entry {
            id: id.into(),
            session_id: self.session_id,
            user_id: self.user_id,
            rating: self.rating,
            comment: self.comment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds_are_inclusive() {
        for rating in MIN_RATING..=MAX_RATING {
            assert!(NewEntry::new("s", "u", rating, "").has_valid_rating());
        }
        assert!(!NewEntry::new("s", "u", 0, "").has_valid_rating());
        assert!(!NewEntry::new("s", "u", 6, "").has_valid_rating());
        assert!(!NewEntry::new("s", "u", -3, "").has_valid_rating());
    }

    #[test]
    fn entry_serializes_with_wire_field_names() {
        let entry = NewEntry::new("abc123", "u1", 3, "ok").into_entry("7");
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "7",
                "sessionID": "abc123",
                "userID": "u1",
                "rating": 3,
                "comment": "ok"
            })
        );
    }
}
