//! Notes

use chrono::naive::NaiveDateTime;
use uuid::Uuid;

/// A single piece of user-authored text
#[derive(Clone, Debug)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Note {
    /// Note ID
    pub id: Uuid,

    /// The ID of the owning user
    ///
    /// Set once at creation, there is no transfer of ownership
    pub user_id: Uuid,

    /// The text of the note
    ///
    /// Never empty for a non-deleted note
    pub content: String,

    /// Creation date
    pub created_at: NaiveDateTime,

    /// Last updated at
    pub updated_at: NaiveDateTime,

    /// Soft-deleted at
    pub deleted_at: Option<NaiveDateTime>,
}

impl Note {
    /// Is the note soft-deleted?
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Is the note owned by the given user?
    pub fn is_owned_by(&self, user_id: &Uuid) -> bool {
        &self.user_id == user_id
    }
}
