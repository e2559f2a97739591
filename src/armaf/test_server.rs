use super::server::{spawn_server, Server};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Accumulates brightness deltas and refuses to leave the 0..=255 range.
struct LevelServer {
    level: i32,
    fail_initialization: bool,
    drop_notifier: mpsc::Sender<i32>,
}

impl LevelServer {
    fn new(fail_initialization: bool) -> (LevelServer, mpsc::Receiver<i32>) {
        let (drop_sender, drop_receiver) = mpsc::channel(1);
        (
            LevelServer {
                level: 128,
                fail_initialization,
                drop_notifier: drop_sender,
            },
            drop_receiver,
        )
    }
}

#[async_trait]
impl Server<i32, i32> for LevelServer {
    fn get_name(&self) -> String {
        "LevelServer".to_owned()
    }

    async fn handle_message(&mut self, delta: i32) -> Result<i32> {
        let next = self.level + delta;
        if !(0..=255).contains(&next) {
            return Err(anyhow!("Level {} out of range", next));
        }
        self.level = next;
        Ok(self.level)
    }

    async fn initialize(&mut self) -> Result<()> {
        if self.fail_initialization {
            Err(anyhow!("Forced initialization fail"))
        } else {
            Ok(())
        }
    }

    async fn tear_down(&mut self) -> Result<()> {
        Ok(self.drop_notifier.send(self.level).await?)
    }
}

#[tokio::test]
async fn test_happy_path() {
    let (server, mut notifier) = LevelServer::new(false);
    let port = spawn_server(server).await.expect("No port returned");
    assert_eq!(port.request(10).await.unwrap(), 138);
    assert_eq!(port.request(-38).await.unwrap(), 100);
    drop(port);
    assert_eq!(
        notifier.recv().await.expect("tear_down not called on server"),
        100
    );
}

#[tokio::test]
async fn test_response_failure_keeps_state() {
    let (server, mut notifier) = LevelServer::new(false);
    let port = spawn_server(server).await.expect("No port returned");
    assert!(port.request(200).await.is_err());
    assert_eq!(port.request(1).await.unwrap(), 129);
    drop(port);
    assert_eq!(notifier.recv().await, Some(129));
}

#[tokio::test]
async fn test_initialization_failure() {
    let (server, _) = LevelServer::new(true);
    assert!(spawn_server(server).await.is_err());
}
