use libris_http::{ApiError, FieldErrors};
use libris_kernel::StoreError;
use thiserror::Error;

use crate::modules::auth::SignupCheck;

/// Outcome of a view action that did not succeed.
///
/// By the time one of these is returned the view has already recorded what
/// the user should see (a notice or field errors).
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("a submission is already in progress")]
    Busy,

    #[error(transparent)]
    Precheck(#[from] SignupCheck),

    #[error("some fields are invalid")]
    Invalid(FieldErrors),

    #[error("no book with id {0} in the current list")]
    UnknownBook(u64),

    #[error("no directory entry with id {0} in the current list")]
    UnknownEntry(u64),

    #[error("no user logged in")]
    SignedOut,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ViewError {
    /// Field-keyed errors, whether found locally or reported by the backend.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ViewError::Invalid(errors) => Some(errors),
            ViewError::Api(err) => err.field_errors(),
            _ => None,
        }
    }
}
