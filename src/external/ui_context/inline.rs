use super::{UiContext, UiJob};
use anyhow::Result;
use async_trait::async_trait;

/// For callers that already are the UI-owning context
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineUiContext;

#[async_trait]
impl UiContext for InlineUiContext {
    async fn run_on_ui(&self, job: UiJob) -> Result<()> {
        job()
    }
}
