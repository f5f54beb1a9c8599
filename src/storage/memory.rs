//! Memory storage
//!
//! Will be destroyed on system shutdown

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::notes::Note;
use crate::users::User;

use super::ChangePasswordValues;
use super::CreateNoteValues;
use super::CreateUserValues;
use super::Error;
use super::Result;
use super::Storage;
use super::UpdateNoteValues;
use super::is_empty_content;

/// An in-memory storage
///
/// Will be destroyed on system shutdown
#[derive(Clone, Debug)]
pub struct Memory {
    /// All users in storage
    users: Arc<Mutex<HashMap<Uuid, User>>>,

    /// All notes in storage
    notes: Arc<Mutex<HashMap<Uuid, Note>>>,
}

impl Memory {
    /// Create a new empty Memory storage
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
            notes: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl Storage for Memory {
    async fn find_any_single_user(&self) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|user| user.deleted_at.is_none())
            .cloned())
    }

    async fn find_single_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|user| user.username == username && user.deleted_at.is_none())
            .cloned())
    }

    async fn find_single_user_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|user| &user.id == id && user.deleted_at.is_none())
            .cloned())
    }

    async fn create_user(&self, values: &CreateUserValues) -> Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            session_id: *values.session_id,
            username: values.username.to_string(),
            hashed_password: values.hashed_password.to_string(),
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
            deleted_at: None,
        };

        self.users.lock().await.insert(user.id, user.clone());

        Ok(user)
    }

    async fn change_password(&self, user: &User, values: &ChangePasswordValues) -> Result<User> {
        Ok(self
            .users
            .lock()
            .await
            .get_mut(&user.id)
            .map(|user| {
                user.session_id = *values.session_id;
                user.hashed_password = values.hashed_password.to_string();
                user.updated_at = Utc::now().naive_utc();

                user.clone()
            })
            .expect("HashMap is the source of the user"))
    }

    async fn find_all_notes_by_user(&self, user: &User) -> Result<Vec<Note>> {
        let mut notes = self
            .notes
            .lock()
            .await
            .values()
            .filter(|note| note.user_id == user.id && note.deleted_at.is_none())
            .cloned()
            .collect::<Vec<Note>>();

        notes.sort_by(|left, right| right.created_at.cmp(&left.created_at));

        Ok(notes)
    }

    async fn find_single_note_by_id(&self, note_id: &Uuid) -> Result<Option<Note>> {
        Ok(self
            .notes
            .lock()
            .await
            .values()
            .find(|note| &note.id == note_id && note.deleted_at.is_none())
            .cloned())
    }

    async fn find_single_note_by_id_unchecked(&self, note_id: &Uuid) -> Result<Option<Note>> {
        Ok(self.notes.lock().await.get(note_id).cloned())
    }

    async fn create_note(&self, values: &CreateNoteValues) -> Result<Note> {
        if is_empty_content(values.content) {
            return Err(Error::EmptyContent);
        }

        let note = Note {
            id: Uuid::new_v4(),
            user_id: values.user.id,
            content: values.content.to_string(),
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
            deleted_at: None,
        };

        self.notes.lock().await.insert(note.id, note.clone());

        Ok(note)
    }

    async fn update_note(&self, note: &Note, values: &UpdateNoteValues) -> Result<Note> {
        if is_empty_content(values.content) {
            return Err(Error::EmptyContent);
        }

        Ok(self
            .notes
            .lock()
            .await
            .get_mut(&note.id)
            .map(|note| {
                note.content = values.content.to_string();
                note.updated_at = Utc::now().naive_utc();

                note.clone()
            })
            .expect("HashMap is the source of the note"))
    }

    async fn delete_note(&self, note: &Note) -> Result<()> {
        if let Some(note) = self.notes.lock().await.get_mut(&note.id) {
            // keep the original timestamp on a repeated delete
            if note.deleted_at.is_none() {
                note.deleted_at = Some(Utc::now().naive_utc());
            }
        }

        Ok(())
    }
}
