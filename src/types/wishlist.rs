use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A saved wishlist entry: a link plus optional free-form notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct WishlistItem {
    pub id: i64,
    pub link: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a new item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWishlistItem {
    pub link: String,
    pub notes: Option<String>,
}

impl NewWishlistItem {
    pub fn new(link: impl Into<String>, notes: Option<String>) -> Self {
        Self {
            link: link.into(),
            notes,
        }
    }
}

/// Partial update applied to an existing item.
///
/// Fields left as `None` keep their stored value. For `notes`, `Some(None)`
/// clears the column and `Some(Some(_))` replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WishlistItemPatch {
    pub link: Option<String>,
    pub notes: Option<Option<String>>,
}

impl WishlistItemPatch {
    /// Applies the patch on top of the stored values, returning `(link, notes)`.
    pub fn merge(&self, existing: &WishlistItem) -> (String, Option<String>) {
        let link = self.link.clone().unwrap_or_else(|| existing.link.clone());
        let notes = match &self.notes {
            Some(n) => n.clone(),
            None => existing.notes.clone(),
        };
        (link, notes)
    }
}

/// JSON body accepted by the create and replace endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemPayload {
    #[serde(default)]
    pub link: Option<String>,
    /// Outer `None` means the key was absent; `Some(None)` is an explicit `null`.
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Current time at the precision both storage backends preserve.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Timestamp for an update: never earlier than the previous `updated_at`.
pub fn touch(previous: DateTime<Utc>) -> DateTime<Utc> {
    now().max(previous)
}
