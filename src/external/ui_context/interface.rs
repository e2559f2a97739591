use anyhow::Result;
use async_trait::async_trait;

/// A unit of work touching window attributes
pub type UiJob = Box<dyn FnOnce() -> Result<()> + Send + 'static>;

/// The execution context that owns the foreground window.
///
/// Window attributes may only be mutated from this context. `run_on_ui`
/// resolves once the job has run there, with the job's own result.
#[async_trait]
pub trait UiContext: 'static + Send + Sync {
    async fn run_on_ui(&self, job: UiJob) -> Result<()>;
}
