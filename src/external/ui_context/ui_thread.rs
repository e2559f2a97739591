use super::{UiContext, UiJob};
use crate::armaf::{spawn_server, ActorPort, Server};
use anyhow::Result;
use async_trait::async_trait;

/// A UI context living in its own task.
///
/// Jobs from every clone are queued on the same task and run one after the
/// other, which gives the window a single writer. The task stops once every
/// clone is dropped.
#[derive(Clone)]
pub struct UiThread {
    port: ActorPort<UiJob, (), anyhow::Error>,
}

impl UiThread {
    pub async fn spawn() -> Result<UiThread> {
        let port = spawn_server(UiThreadServer { jobs_run: 0 }).await?;
        Ok(UiThread { port })
    }

    /// Wait for queued jobs to finish and the task to stop
    pub async fn await_shutdown(self) {
        self.port.await_shutdown().await
    }
}

#[async_trait]
impl UiContext for UiThread {
    async fn run_on_ui(&self, job: UiJob) -> Result<()> {
        self.port.request(job).await.map_err(|e| e.into_anyhow())
    }
}

struct UiThreadServer {
    jobs_run: usize,
}

#[async_trait]
impl Server<UiJob, ()> for UiThreadServer {
    fn get_name(&self) -> String {
        "UiThread".to_owned()
    }

    async fn handle_message(&mut self, job: UiJob) -> Result<()> {
        self.jobs_run += 1;
        job()
    }

    async fn tear_down(&mut self) -> Result<()> {
        log::debug!("UiThread ran {} jobs", self.jobs_run);
        Ok(())
    }
}
