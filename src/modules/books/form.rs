use super::models::{Book, BookDraft, BookId};

/// The single form surface of the dashboard: adding a new book or editing an
/// existing one.
///
/// While editing, the add-draft that was in progress is parked and comes back
/// when editing ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    New(BookDraft),
    Editing {
        id: BookId,
        draft: BookDraft,
        parked: BookDraft,
    },
}

impl Default for FormMode {
    fn default() -> Self {
        FormMode::New(BookDraft::default())
    }
}

impl FormMode {
    pub fn draft(&self) -> &BookDraft {
        match self {
            FormMode::New(draft) | FormMode::Editing { draft, .. } => draft,
        }
    }

    pub fn draft_mut(&mut self) -> &mut BookDraft {
        match self {
            FormMode::New(draft) | FormMode::Editing { draft, .. } => draft,
        }
    }

    pub fn editing_id(&self) -> Option<BookId> {
        match self {
            FormMode::New(_) => None,
            FormMode::Editing { id, .. } => Some(*id),
        }
    }

    /// Switch to editing `book`. Switching between books keeps the original
    /// parked add-draft.
    pub fn begin_edit(&mut self, book: &Book) {
        let parked = match std::mem::take(self) {
            FormMode::New(draft) => draft,
            FormMode::Editing { parked, .. } => parked,
        };
        *self = FormMode::Editing {
            id: book.id,
            draft: BookDraft::from_book(book),
            parked,
        };
    }

    /// Leave edit mode, restoring the parked add-draft. No-op when adding.
    pub fn finish_edit(&mut self) {
        if let FormMode::Editing { parked, .. } = self {
            let parked = std::mem::take(parked);
            *self = FormMode::New(parked);
        }
    }

    /// Discard the active draft.
    pub fn clear(&mut self) {
        match self {
            FormMode::New(draft) => *draft = BookDraft::default(),
            FormMode::Editing { .. } => self.finish_edit(),
        }
    }
}
