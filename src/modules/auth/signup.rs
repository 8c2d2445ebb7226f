use std::time::Duration;

use async_trait::async_trait;
use libris_http::Endpoint;
use libris_kernel::View;
use thiserror::Error;

use super::models::{Phase, SignupRequest, Submission};
use crate::context::AppContext;
use crate::error::ViewError;
use crate::utils::{self, Notice, RETRY_MESSAGE};

pub const SIGNUP_REJECTED: &str = "Signup failed: please check your input.";
pub const SIGNED_UP: &str = "Account created successfully! Redirecting to login...";

/// Characters that satisfy the "at least one symbol" rule.
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";
pub const MIN_PASSWORD_LEN: usize = 8;

/// Client-side signup rules, in the order they are checked.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupCheck {
    #[error("Invalid email format. Email must have a dot")]
    EmailWithoutDot,

    #[error("Passwords do not match. Please check your password")]
    PasswordMismatch,

    #[error("Password must be at least 8 characters and include at least one symbol (e.g. !, @, #)")]
    WeakPassword,
}

/// Run the signup rules; the first failing rule is reported.
pub fn precheck(email: &str, password: &str, confirmation: &str) -> Result<(), SignupCheck> {
    if !email.contains('.') {
        return Err(SignupCheck::EmailWithoutDot);
    }
    if password != confirmation {
        return Err(SignupCheck::PasswordMismatch);
    }
    let long_enough = password.chars().count() >= MIN_PASSWORD_LEN;
    let has_symbol = password.chars().any(|c| PASSWORD_SYMBOLS.contains(c));
    if !long_enough || !has_symbol {
        return Err(SignupCheck::WeakPassword);
    }
    Ok(())
}

/// Instruction to move on to the login view once `after` has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginRedirect {
    pub after: Duration,
}

pub struct SignupView {
    ctx: AppContext,
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    phase: Phase,
    notice: Option<Notice>,
}

impl SignupView {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            name: String::new(),
            email: String::new(),
            password: String::new(),
            password_confirmation: String::new(),
            phase: Phase::Idle,
            notice: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn notice(&self) -> Option<&Notice> {
        utils::visible(&self.notice)
    }

    /// Check the form locally, then create the account.
    ///
    /// No request is made when a local rule fails. Signing up does not log
    /// the user in.
    pub async fn submit(&mut self) -> Result<LoginRedirect, ViewError> {
        if self.phase == Phase::Submitting {
            return Err(ViewError::Busy);
        }
        let name = self.name.trim().to_string();
        let email = self.email.trim().to_string();
        if let Err(check) = precheck(&email, &self.password, &self.password_confirmation) {
            tracing::debug!(rule = ?check, "signup rejected locally");
            self.notice = Some(Notice::error(check.to_string(), self.ctx.ux.notice_ttl()));
            return Err(check.into());
        }

        let submission = Submission::begin(&mut self.phase)?;
        utils::pause(self.ctx.ux.submit_delay()).await;

        let request = SignupRequest {
            name,
            email,
            password: self.password.clone(),
            password_confirmation: self.password_confirmation.clone(),
        };
        match self.ctx.client.post(Endpoint::Signup, &request).await {
            Ok(()) => {
                tracing::info!(email = %request.email, "account created");
                submission.succeed();
                self.notice = Some(Notice::success(SIGNED_UP, self.ctx.ux.notice_ttl()));
                Ok(LoginRedirect {
                    after: self.ctx.ux.redirect_delay(),
                })
            }
            Err(err) => {
                let message = if err.is_validation() {
                    tracing::debug!(errors = ?err.field_errors(), "signup rejected by backend");
                    SIGNUP_REJECTED
                } else {
                    RETRY_MESSAGE
                };
                self.notice = Some(Notice::error(message, self.ctx.ux.notice_ttl()));
                Err(err.into())
            }
        }
    }
}

#[async_trait]
impl View for SignupView {
    fn name(&self) -> &'static str {
        "signup"
    }

    fn unmount(&mut self) {
        self.password.clear();
        self.password_confirmation.clear();
        self.phase = Phase::Idle;
        self.notice = None;
    }
}
