use async_trait::async_trait;

/// Lifecycle shared by every screen of the client.
#[async_trait]
pub trait View: Send {
    /// Unique name for this view
    fn name(&self) -> &'static str;

    /// Called when the view becomes active.
    /// Views that need remote data fetch it here.
    async fn mount(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called on navigation away.
    /// Drafts and transient messages are discarded here.
    fn unmount(&mut self) {}
}

/// Unmount `from` (if any) and mount `to`.
pub async fn navigate(from: Option<&mut dyn View>, to: &mut dyn View) -> anyhow::Result<()> {
    if let Some(from) = from {
        tracing::debug!(view = from.name(), "unmounting view");
        from.unmount();
    }
    tracing::debug!(view = to.name(), "mounting view");
    to.mount().await
}
