use libris_kernel::User;
use serde::{Deserialize, Serialize};

use crate::error::ViewError;

/// Body of `POST /api/login`.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Successful login: the issued token and who it belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Body of `POST /api/signup`.
#[derive(Clone, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Where a form is in its submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
}

/// Keeps a form in `Submitting` while a request is in flight. Dropped
/// without [`Submission::succeed`], including when the submit future is
/// abandoned mid-request, it puts the form back to `Idle`.
pub(crate) struct Submission<'a> {
    phase: &'a mut Phase,
}

impl<'a> Submission<'a> {
    pub(crate) fn begin(phase: &'a mut Phase) -> Result<Self, ViewError> {
        if *phase == Phase::Submitting {
            return Err(ViewError::Busy);
        }
        *phase = Phase::Submitting;
        Ok(Self { phase })
    }

    pub(crate) fn succeed(self) {
        *self.phase = Phase::Succeeded;
    }
}

impl Drop for Submission<'_> {
    fn drop(&mut self) {
        if *self.phase == Phase::Submitting {
            *self.phase = Phase::Idle;
        }
    }
}
