//! Book catalog dashboard.
//!
//! Every mutation is a request followed by a fresh `GET /api/books`; the
//! local list is only ever a snapshot of what the backend returned. When
//! that follow-up fetch fails the mutation still counts as done.

pub mod form;
pub mod models;
pub mod window;

use async_trait::async_trait;
use libris_http::{ApiError, Endpoint, FieldErrors};
use libris_kernel::View;

use crate::context::AppContext;
use crate::error::ViewError;
use crate::utils::{self, Confirm, Notice, RETRY_MESSAGE};

pub use form::FormMode;
pub use models::{Book, BookDraft, BookId, Field};
pub use window::{ViewWindow, PAGE_SIZE};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this book?";
pub const BOOK_ADDED: &str = "Book added successfully!";
pub const BOOK_UPDATED: &str = "Book updated successfully!";
pub const BOOK_DELETED: &str = "Book deleted successfully!";

/// Key used for a server message that names no field.
const GENERAL_KEY: &str = "general";

/// What became of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    Deleted,
    Declined,
}

pub struct CatalogView {
    ctx: AppContext,
    books: Vec<Book>,
    form: FormMode,
    errors: Option<FieldErrors>,
    notice: Option<Notice>,
    search: String,
    page: usize,
}

impl CatalogView {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            books: Vec::new(),
            form: FormMode::default(),
            errors: None,
            notice: None,
            search: String::new(),
            page: 0,
        }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn form(&self) -> &FormMode {
        &self.form
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.form.draft_mut().set(field, value);
    }

    pub fn notice(&self) -> Option<&Notice> {
        utils::visible(&self.notice)
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        self.errors.as_ref()
    }

    pub fn field_error(&self, field: Field) -> Option<&[String]> {
        self.errors
            .as_ref()
            .and_then(|errors| errors.get(field.key()))
            .map(Vec::as_slice)
    }

    /// Errors that belong to no form field. Only reported when no field has
    /// an error of its own.
    pub fn general_errors(&self) -> Vec<(&str, &[String])> {
        let Some(errors) = &self.errors else {
            return Vec::new();
        };
        if errors.keys().any(|key| Field::from_key(key).is_some()) {
            return Vec::new();
        }
        errors
            .iter()
            .map(|(key, messages)| (key.as_str(), messages.as_slice()))
            .collect()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Filter by title prefix. Purely local.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        let total = self.total_pages();
        self.page = window::reset_if_out_of_range(self.page, total);
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        window::total_pages(window::filter(&self.books, &self.search).len(), PAGE_SIZE)
    }

    pub fn window(&self) -> ViewWindow<'_> {
        window::window(&self.books, &self.search, self.page, PAGE_SIZE)
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.page = window::clamp_page(page, self.total_pages());
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.page.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.go_to_page(self.page.saturating_sub(1));
    }

    /// Fetch the whole catalog and go back to the first page.
    pub async fn refresh(&mut self) -> Result<(), ViewError> {
        match self.ctx.client.get_json::<Vec<Book>>(Endpoint::Books).await {
            Ok(books) => {
                tracing::debug!(count = books.len(), "catalog fetched");
                self.books = books;
                self.page = 0;
                Ok(())
            }
            Err(err) => {
                self.record_failure(&err);
                Err(err.into())
            }
        }
    }

    /// Re-fetch after a mutation the backend already applied. A failure here
    /// leaves the previous snapshot and the success notice in place.
    async fn reload(&mut self) {
        match self.ctx.client.get_json::<Vec<Book>>(Endpoint::Books).await {
            Ok(books) => {
                self.books = books;
                self.page = 0;
            }
            Err(err) => tracing::warn!(error = %err, "catalog reload after a change failed"),
        }
    }

    /// Submit the form: create when adding, update when editing.
    pub async fn submit(&mut self) -> Result<(), ViewError> {
        match self.form.editing_id() {
            None => self.create().await,
            Some(id) => self.update(id).await,
        }
    }

    async fn create(&mut self) -> Result<(), ViewError> {
        let draft = self.validated_draft()?;

        if let Err(err) = self.ctx.client.post(Endpoint::Books, &draft).await {
            self.record_failure(&err);
            return Err(err.into());
        }

        tracing::info!(title = %draft.title, "book added");
        self.notice = Some(Notice::success(BOOK_ADDED, self.ctx.ux.notice_ttl()));
        self.form.clear();
        self.reload().await;
        Ok(())
    }

    async fn update(&mut self, id: BookId) -> Result<(), ViewError> {
        let draft = self.validated_draft()?;

        if let Err(err) = self.ctx.client.put(Endpoint::Book(id), &draft).await {
            self.record_failure(&err);
            return Err(err.into());
        }

        tracing::info!(book_id = id, "book updated");
        self.notice = Some(Notice::success(BOOK_UPDATED, self.ctx.ux.notice_ttl()));
        self.form.finish_edit();
        self.reload().await;
        Ok(())
    }

    /// Delete after the user confirms. Declining sends nothing.
    pub async fn delete(&mut self, id: BookId, confirm: &dyn Confirm) -> Result<Deletion, ViewError> {
        if !confirm.confirm(DELETE_PROMPT) {
            tracing::debug!(book_id = id, "delete declined");
            return Ok(Deletion::Declined);
        }

        if let Err(err) = self.ctx.client.delete(Endpoint::Book(id)).await {
            self.notice = Some(Notice::error(RETRY_MESSAGE, self.ctx.ux.notice_ttl()));
            return Err(err.into());
        }

        tracing::info!(book_id = id, "book deleted");
        if self.form.editing_id() == Some(id) {
            self.form.finish_edit();
        }
        self.notice = Some(Notice::success(BOOK_DELETED, self.ctx.ux.notice_ttl()));
        self.reload().await;
        Ok(Deletion::Deleted)
    }

    /// Load a listed book into the form for editing.
    pub fn begin_edit(&mut self, id: BookId) -> Result<(), ViewError> {
        let book = self
            .books
            .iter()
            .find(|book| book.id == id)
            .ok_or(ViewError::UnknownBook(id))?;
        self.form.begin_edit(book);
        self.errors = None;
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.form.finish_edit();
        self.errors = None;
    }

    /// Clear stale errors and check the active draft locally.
    fn validated_draft(&mut self) -> Result<BookDraft, ViewError> {
        self.errors = None;
        let draft = self.form.draft().clone();
        if let Err(errors) = draft.validate() {
            tracing::debug!(fields = ?errors.keys().collect::<Vec<_>>(), "draft rejected locally");
            self.errors = Some(errors.clone());
            return Err(ViewError::Invalid(errors));
        }
        Ok(draft)
    }

    fn record_failure(&mut self, err: &ApiError) {
        match err {
            ApiError::Validation { errors, .. } if !errors.is_empty() => {
                self.errors = Some(errors.clone());
            }
            ApiError::Validation { message, .. } => {
                let mut errors = FieldErrors::new();
                errors.insert(GENERAL_KEY.to_string(), vec![message.clone()]);
                self.errors = Some(errors);
            }
            _ => {
                self.notice = Some(Notice::error(RETRY_MESSAGE, self.ctx.ux.notice_ttl()));
            }
        }
    }
}

#[async_trait]
impl View for CatalogView {
    fn name(&self) -> &'static str {
        "dashboard"
    }

    async fn mount(&mut self) -> anyhow::Result<()> {
        self.refresh().await?;
        Ok(())
    }

    fn unmount(&mut self) {
        self.form = FormMode::default();
        self.errors = None;
        self.notice = None;
        self.search.clear();
        self.page = 0;
    }
}
