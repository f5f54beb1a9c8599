//! All things related to the storage of notes and their owners

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::notes::Note;
use crate::users::User;

#[cfg(not(feature = "postgres"))]
use memory::Memory;
#[cfg(feature = "postgres")]
use postgres::Postgres;

#[cfg(not(feature = "postgres"))]
mod memory;
#[cfg(feature = "postgres")]
mod postgres;

/// Setup the storage
#[cfg(not(feature = "postgres"))]
#[allow(clippy::unused_async)]
pub async fn setup() -> Memory {
    Memory::new()
}

/// Setup the storage
#[cfg(feature = "postgres")]
pub async fn setup() -> Postgres {
    Postgres::new().await
}

/// Storage errors
#[derive(Debug, Error)]
pub enum Error {
    /// The content of a note was empty on a write
    #[error("Note content can not be empty")]
    EmptyContent,

    /// A connection error with the storage
    #[error("Connection error: {0}")]
    Connection(String),
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Values to create a User
pub struct CreateUserValues<'a> {
    /// The initial session ID for the user
    pub session_id: &'a Uuid,

    /// The username
    pub username: &'a str,

    /// The hashed password
    pub hashed_password: &'a str,
}

/// Values to change a password of a user
pub struct ChangePasswordValues<'a> {
    /// New session ID to invalidate current tokens
    pub session_id: &'a Uuid,

    /// The new hashed password
    pub hashed_password: &'a str,
}

/// Values to create a Note
///
/// Only the declared fields make it into a note, nothing else
pub struct CreateNoteValues<'a> {
    /// User owning the note
    pub user: &'a User,

    /// Content of the note
    ///
    /// Anything goes, as long as it is not empty
    pub content: &'a str,
}

/// Values to update a Note
pub struct UpdateNoteValues<'a> {
    /// New content of the note
    pub content: &'a str,
}

/// Storage with all supported operations
///
/// Every operation is a single read or write against the backing store
#[async_trait]
pub trait Storage: Clone + Send + Sync + 'static {
    /// Find any single user
    ///
    /// Respects the soft-delete
    async fn find_any_single_user(&self) -> Result<Option<User>>;

    /// Finds a single user by its username
    ///
    /// Respects the soft-delete
    async fn find_single_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Finds a single user by its ID
    ///
    /// Respects the soft-delete
    async fn find_single_user_by_id(&self, id: &Uuid) -> Result<Option<User>>;

    /// Create a single user
    async fn create_user(&self, values: &CreateUserValues) -> Result<User>;

    /// Change the password of a user
    async fn change_password(&self, user: &User, values: &ChangePasswordValues) -> Result<User>;

    /// Find all notes owned by a user, newest first
    ///
    /// Respects the soft-delete
    async fn find_all_notes_by_user(&self, user: &User) -> Result<Vec<Note>>;

    /// Find a single note by its ID
    ///
    /// Respects the soft-delete
    async fn find_single_note_by_id(&self, note_id: &Uuid) -> Result<Option<Note>>;

    /// Find a single note by its ID
    ///
    /// DOES NOT respect the soft-delete, handle with care
    async fn find_single_note_by_id_unchecked(&self, note_id: &Uuid) -> Result<Option<Note>>;

    /// Create a note
    ///
    /// Fails with [`Error::EmptyContent`] when the content is empty or
    /// whitespace only
    async fn create_note(&self, values: &CreateNoteValues) -> Result<Note>;

    /// Update the content of a note, refreshing its update timestamp
    ///
    /// Fails with [`Error::EmptyContent`] when the content is empty or
    /// whitespace only
    async fn update_note(&self, note: &Note, values: &UpdateNoteValues) -> Result<Note>;

    /// Soft-delete a note
    ///
    /// Idempotent, a note that already is deleted keeps its original
    /// `deleted_at`
    async fn delete_note(&self, note: &Note) -> Result<()>;
}

/// Is the given note content considered empty?
///
/// Whitespace-only content counts as empty, matching what the form layer
/// would have trimmed away
pub fn is_empty_content(content: &str) -> bool {
    content.trim().is_empty()
}
