//! Request/response channels between actors.

use std::{fmt::Debug, result::Result};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};

/// A shorthand type defining a [oneshot::Receiver] on which the outcome of a
/// [Request] arrives.
type ResponseReceiver<R, E> = oneshot::Receiver<Result<R, E>>;

/// A request sent to an actor.
///
/// Carries the payload accepted by the [ActorPort] and the [oneshot] sender
/// the actor answers on.
pub struct Request<P, R, E> {
    pub payload: P,
    pub response_sender: oneshot::Sender<Result<R, E>>,
}

impl<P, R, E> Request<P, R, E> {
    /// Creates a new [Request] around `payload`, returning it together with
    /// the receiver for its response.
    pub fn new(payload: P) -> (Request<P, R, E>, ResponseReceiver<R, E>) {
        let (response_sender, response_receiver) = oneshot::channel();
        let request = Request {
            payload,
            response_sender,
        };
        (request, response_receiver)
    }
}

/// An error occuring during the exchange of messages with an actor.
#[derive(Debug, Error, Clone)]
pub enum ActorRequestError<E: Debug> {
    #[error("error when sending message to actor")]
    Send,

    #[error("error while awaiting request response channel")]
    Recv,

    #[error("internal actor error: {0:?}")]
    Actor(E),
}

impl ActorRequestError<anyhow::Error> {
    /// Unwraps the actor's own error, keeping its downcastable type, or
    /// describes the channel failure.
    pub fn into_anyhow(self) -> anyhow::Error {
        match self {
            ActorRequestError::Actor(e) => e,
            ActorRequestError::Send => anyhow::anyhow!("actor is not running"),
            ActorRequestError::Recv => anyhow::anyhow!("actor dropped the request"),
        }
    }
}

/// A communication channel with an actor.
///
/// ActorPorts are clone-able, so an actor must not assume it talks to a
/// single peer. An actor stops once every clone of its port is dropped; it
/// doesn't get a dedicated stop message.
#[derive(Debug)]
pub struct ActorPort<P, R, E: Debug> {
    message_sender: mpsc::Sender<Request<P, R, E>>,
    shutdown_receiver: watch::Receiver<()>,
}

// #[derive(Clone)] would require E: Clone and anyhow::Error isn't.
impl<P, R, E: Debug> Clone for ActorPort<P, R, E> {
    fn clone(&self) -> Self {
        Self {
            message_sender: self.message_sender.clone(),
            shutdown_receiver: self.shutdown_receiver.clone(),
        }
    }
}

impl<P, R, E: Debug> ActorPort<P, R, E> {
    /// Creates a port together with the [ActorReceiver] the actor's task
    /// should own.
    pub fn make() -> (ActorPort<P, R, E>, ActorReceiver<P, R, E>) {
        let (req_tx, req_rx) = mpsc::channel::<Request<P, R, E>>(8);
        let (shutdown_tx, shutdown_rx) = watch::channel(());
        (
            ActorPort {
                message_sender: req_tx,
                shutdown_receiver: shutdown_rx,
            },
            ActorReceiver::new(req_rx, shutdown_tx),
        )
    }

    /// Sends `payload` to the actor and waits for its response.
    pub async fn request(&self, payload: P) -> Result<R, ActorRequestError<E>> {
        let (req, rx) = Request::new(payload);
        if self.message_sender.send(req).await.is_err() {
            return Err(ActorRequestError::Send);
        }
        match rx.await {
            Err(_) => Err(ActorRequestError::Recv),
            Ok(Ok(response)) => Ok(response),
            Ok(Err(actor_error)) => Err(ActorRequestError::Actor(actor_error)),
        }
    }

    /// Await actor termination
    ///
    /// Drops this port's sender and waits until every other clone is gone
    /// and the actor has dropped its [ActorReceiver].
    pub async fn await_shutdown(self) {
        drop(self.message_sender);
        let mut shutdown_receiver = self.shutdown_receiver;
        let result = shutdown_receiver.changed().await;
        assert!(result.is_err());
    }
}

/// The receiving side of an [ActorPort].
///
/// Dropping it signals termination to [`ActorPort::await_shutdown`], so it
/// must be the last thing an actor drops.
#[derive(Debug)]
pub struct ActorReceiver<P, R, E: Debug> {
    pub request_receiver: mpsc::Receiver<Request<P, R, E>>,
    _shutdown_notifier: watch::Sender<()>,
}

impl<P, R, E: Debug> ActorReceiver<P, R, E> {
    pub fn new(
        request_receiver: mpsc::Receiver<Request<P, R, E>>,
        shutdown_notifier: watch::Sender<()>,
    ) -> Self {
        ActorReceiver {
            request_receiver,
            _shutdown_notifier: shutdown_notifier,
        }
    }

    pub async fn recv(&mut self) -> Option<Request<P, R, E>> {
        self.request_receiver.recv().await
    }
}

/// A handle tying the lifetime of a background service (for example the
/// D-Bus controller) to its owner.
///
/// The service keeps the [HandleChild] and stops once the [Handle] is dropped
/// or [Handle::await_shutdown] is called.
pub struct Handle(ActorPort<(), (), ()>);

impl Handle {
    pub fn new() -> (Handle, HandleChild) {
        let (port, receiver) = ActorPort::make();
        (Handle(port), HandleChild(receiver))
    }

    pub async fn await_shutdown(self) {
        self.0.await_shutdown().await
    }
}

/// The side of the handle belonging to the service.
///
/// Must not be dropped while clean up is still pending.
pub struct HandleChild(ActorReceiver<(), (), ()>);

impl HandleChild {
    /// Resolves once the parent [Handle] is dropped or shutting down. Meant
    /// to be used inside a [tokio::select!] or a dedicated task.
    pub async fn should_terminate(&mut self) {
        let res = self.0.recv().await;
        assert!(res.is_none());
    }
}
