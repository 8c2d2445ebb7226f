//! Small pieces shared by every view.

use std::time::Duration;

use time::OffsetDateTime;

/// Generic message for failures the user can only retry.
pub const RETRY_MESSAGE: &str = "An error occurred, please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient message that stops being shown once it expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub expires_at: OffsetDateTime,
}

impl Notice {
    pub fn success(message: impl Into<String>, ttl: Duration) -> Self {
        Self::new(NoticeKind::Success, message, ttl)
    }

    pub fn error(message: impl Into<String>, ttl: Duration) -> Self {
        Self::new(NoticeKind::Error, message, ttl)
    }

    fn new(kind: NoticeKind, message: impl Into<String>, ttl: Duration) -> Self {
        Self {
            kind,
            message: message.into(),
            expires_at: OffsetDateTime::now_utc() + ttl,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }

    pub fn is_visible_at(&self, now: OffsetDateTime) -> bool {
        now < self.expires_at
    }
}

/// The notice in `slot`, if it has not expired yet.
pub fn visible(slot: &Option<Notice>) -> Option<&Notice> {
    slot.as_ref()
        .filter(|notice| notice.is_visible_at(OffsetDateTime::now_utc()))
}

/// Asks the user to approve a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Presentation delay before dispatching a request. Zero means no delay.
pub async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_expires_after_ttl() {
        let notice = Notice::success("Book added successfully!", Duration::from_secs(3));
        let now = OffsetDateTime::now_utc();
        assert!(notice.is_visible_at(now));
        assert!(!notice.is_visible_at(now + Duration::from_secs(4)));
        assert!(!notice.is_error());
    }

    #[test]
    fn zero_ttl_is_never_visible() {
        let slot = Some(Notice::error(RETRY_MESSAGE, Duration::ZERO));
        assert!(visible(&slot).is_none());
    }

    #[test]
    fn closures_confirm() {
        let yes = |_: &str| true;
        let no = |prompt: &str| prompt.is_empty();
        assert!(yes.confirm("Delete?"));
        assert!(!no.confirm("Delete?"));
    }

    #[tokio::test]
    async fn zero_pause_returns_immediately() {
        let started = std::time::Instant::now();
        pause(Duration::ZERO).await;
        assert!(started.elapsed() < Duration::from_millis(50));
    }
}
