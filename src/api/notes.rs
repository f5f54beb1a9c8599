//! Notes API management

use axum::Extension;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::notes::Note;
use crate::storage::CreateNoteValues;
use crate::storage::Storage;
use crate::storage::UpdateNoteValues;

use super::CurrentUser;
use super::Error;
use super::Form;
use super::PathParameters;
use super::Success;

/// The note response information
///
/// A subset of all the information, ready to be serialized for the outside world
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    /// The note ID
    pub id: Uuid,

    /// The text of the note
    pub content: String,

    /// Creation date
    pub created_at: NaiveDateTime,

    /// Last updated at
    pub updated_at: NaiveDateTime,
}

impl NoteResponse {
    /// Create a note response from a [`Note`](Note)
    fn from_note(note: Note) -> Self {
        Self {
            id: note.id,
            content: note.content,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }

    /// Create a note response from multiple [`Note`](Note)s
    fn from_note_multiple(mut notes: Vec<Note>) -> Vec<Self> {
        notes.drain(..).map(Self::from_note).collect::<Vec<Self>>()
    }
}

/// List all notes of the current user, newest first
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:6000/api/notes
/// ```
///
/// Response:
/// ```json
/// { "data": [ { "id": "<uuid>", "content": "buy milk" ... } ] }
/// ```
pub async fn list<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
) -> Result<Success<Vec<NoteResponse>>, Error> {
    let notes = storage
        .find_all_notes_by_user(&current_user)
        .await
        .map_err(Error::storage)?;

    Ok(Success::ok(NoteResponse::from_note_multiple(notes)))
}

/// Create note form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteForm {
    /// Content of the new note
    content: String,
}

/// Create a note owned by the current user
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "content": "buy milk" }' \
///     http://localhost:6000/api/notes
/// ```
///
/// Response:
/// ```json
/// { "data": { "id": "<uuid>", "content": "buy milk" ... } }
/// ```
pub async fn create<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    Form(form): Form<CreateNoteForm>,
) -> Result<Success<NoteResponse>, Error> {
    let values = CreateNoteValues {
        user: &current_user,
        content: &form.content,
    };

    let note = storage
        .create_note(&values)
        .await
        .map_err(Error::storage)?;

    Ok(Success::created(NoteResponse::from_note(note)))
}

/// Get a single note of the current user
///
/// Serves the edit form of the note, only its owner gets to see it
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:6000/api/notes/<uuid>
/// ```
///
/// Response:
/// ```json
/// { "data": { "id": "<uuid>", "content": "buy milk" ... } }
/// ```
pub async fn single<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    PathParameters(note_id): PathParameters<Uuid>,
) -> Result<Success<NoteResponse>, Error> {
    let note = get_note(&storage, &note_id).await?;

    authorize(&current_user, &note)?;

    Ok(Success::ok(NoteResponse::from_note(note)))
}

/// Update note form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteForm {
    /// New content of the note
    content: String,
}

/// Update the content of a note, only allowed for its owner
///
/// Request:
/// ```sh
/// curl -v -XPATCH -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "content": "buy milk and eggs" }' \
///     http://localhost:6000/api/notes/<uuid>
/// ```
///
/// Response:
/// ```json
/// { "data": { "id": "<uuid>", "content": "buy milk and eggs" ... } }
/// ```
pub async fn update<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    PathParameters(note_id): PathParameters<Uuid>,
    Form(form): Form<UpdateNoteForm>,
) -> Result<Success<NoteResponse>, Error> {
    let note = get_note(&storage, &note_id).await?;

    authorize(&current_user, &note)?;

    let values = UpdateNoteValues {
        content: &form.content,
    };

    let note = storage
        .update_note(&note, &values)
        .await
        .map_err(Error::storage)?;

    Ok(Success::ok(NoteResponse::from_note(note)))
}

/// Soft-delete a note, only allowed for its owner
///
/// Deleting an already deleted note succeeds without changing anything
///
/// Request:
/// ```sh
/// curl -v -XDELETE \
///     -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:6000/api/notes/<uuid>
/// ```
pub async fn delete<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    PathParameters(note_id): PathParameters<Uuid>,
) -> Result<Success<&'static str>, Error> {
    // the unchecked finder keeps the delete idempotent
    let note = storage
        .find_single_note_by_id_unchecked(&note_id)
        .await
        .map_err(Error::storage)?
        .map_or_else(|| Err(Error::not_found("Note not found")), Ok)?;

    authorize(&current_user, &note)?;

    // repeated deletes are a no-op, the first delete timestamp stays
    if !note.is_deleted() {
        storage
            .delete_note(&note)
            .await
            .map_err(Error::storage)?;
    }

    Ok(Success::<&'static str>::no_content())
}

/// The single ownership rule: only the owner of a note may touch it
fn authorize<S: Storage>(current_user: &CurrentUser<S>, note: &Note) -> Result<(), Error> {
    if note.is_owned_by(&current_user.id) {
        Ok(())
    } else {
        Err(Error::forbidden("Not the owner of the note"))
    }
}

/// Fetch a note from storage
///
/// Respects the soft-delete
async fn get_note<S: Storage>(storage: &S, note_id: &Uuid) -> Result<Note, Error> {
    storage
        .find_single_note_by_id(note_id)
        .await
        .map_err(Error::storage)?
        .map_or_else(|| Err(Error::not_found("Note not found")), Ok)
}
