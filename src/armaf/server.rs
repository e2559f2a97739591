//! Server abstraction on top of [super::ports]

use super::ActorPort;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::oneshot;

/// Structured code for actors which only answer requests arriving on their
/// [ActorPort]. A server runs in its own Tokio task and goes through three
/// phases.
///
/// Initialization runs first, and [spawn_server] doesn't return until it has
/// finished, either successfully or with an error.
///
/// Then `handle_message` processes the requests one at a time, in the order
/// they were received. A server therefore never sees two calls interleave.
///
/// After all [ActorPort]s are dropped, `tear_down` runs, giving the server a
/// chance to put the component it controls back the way it found it (for
/// example to drop a window brightness override it applied).
#[async_trait]
pub trait Server<P, R>: Send + 'static {
    /// Returns the name of the Server, which is used in logging messages
    fn get_name(&self) -> String;

    /// Handle a request sent to the [ActorPort] of the server.
    async fn handle_message(&mut self, payload: P) -> Result<R>;

    /// An error here makes [spawn_server] fail with it.
    async fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    /// Since this runs at a non-deterministic time, its errors are only
    /// logged.
    async fn tear_down(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Starts a task for the given [Server] and returns the port to talk to it,
/// once its initialization succeeded.
pub async fn spawn_server<P, R>(
    mut server: impl Server<P, R>,
) -> Result<ActorPort<P, R, anyhow::Error>>
where
    P: Send + 'static,
    R: Send + 'static,
{
    let name = server.get_name();
    log::debug!("{} spawning", name);
    let (port, mut rx) = ActorPort::make();
    let (initialization_sender, initialization_receiver) = oneshot::channel::<Result<()>>();
    tokio::spawn(async move {
        let name = server.get_name();
        let init_result = server.initialize().await;
        let had_init_error = init_result.is_err();
        if initialization_sender.send(init_result).is_err() {
            log::error!("{} spawner went away during initialization", name);
            return;
        }
        if had_init_error {
            return;
        }
        log::info!("{} initialized successfully", name);
        loop {
            match rx.recv().await {
                Some(req) => {
                    let res = server.handle_message(req.payload).await;
                    if let Err(e) = &res {
                        log::error!("{} message handler returned error: {}", name, e);
                    }
                    if req.response_sender.send(res).is_err() {
                        log::error!(
                            "{} failed to respond to request (requester went away?)",
                            name
                        );
                    }
                }
                None => {
                    log::debug!("{} stopping", name);
                    if let Err(e) = server.tear_down().await {
                        log::error!("{} failed to tear down: {}", name, e);
                    }
                    log::debug!("{} stopped", name);
                    return;
                }
            }
        }
    });

    match initialization_receiver.await {
        Ok(Ok(_)) => Ok(port),
        Ok(Err(e)) => {
            log::error!("Error initializing {}: {}", name, e);
            Err(e)
        }
        Err(e) => Err(anyhow!(e)),
    }
}
