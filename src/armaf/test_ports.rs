use super::ports;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

enum StepMessage {
    StepUp,
    // Actors stop when their ports go away, this only exists to break the
    // response channel on purpose.
    Vanish,
}

/// Answers two brightness steps, then reports the ceiling as an error.
fn spawn_stepper(termination_flag: Arc<AtomicBool>) -> ports::ActorPort<StepMessage, u8, String> {
    let (port, mut rx) = ports::ActorPort::make();
    tokio::spawn(async move {
        let mut level = 0u8;
        while let Some(req) = rx.recv().await {
            match req.payload {
                StepMessage::StepUp => {
                    let response = if level < 2 {
                        level += 1;
                        Ok(level)
                    } else {
                        Err("Maximum brightness".to_owned())
                    };
                    let _ = req.response_sender.send(response);
                }
                StepMessage::Vanish => return,
            }
        }
        termination_flag.store(true, Ordering::Release);
    });
    port
}

#[tokio::test]
async fn test_request_response() {
    let (request, receiver) = ports::Request::<(), f64, ()>::new(());
    assert_eq!(request.payload, ());
    request
        .response_sender
        .send(Ok(0.5))
        .expect("Channel failure when sending response");
    let response = receiver
        .await
        .expect("Channel failure when receiving response");
    assert_eq!(response, Ok(0.5));
}

#[tokio::test]
async fn test_actor_port() {
    let terminated = Arc::new(AtomicBool::new(false));
    let port = spawn_stepper(terminated.clone());
    assert_eq!(port.request(StepMessage::StepUp).await.unwrap(), 1);
    assert_eq!(port.request(StepMessage::StepUp).await.unwrap(), 2);
    match port.request(StepMessage::StepUp).await {
        Err(ports::ActorRequestError::Actor(e)) => assert_eq!(e, "Maximum brightness"),
        other => panic!("Actor error not translated correctly: {:?}", other),
    }
    assert!(!terminated.load(Ordering::Acquire));
    port.await_shutdown().await;
    assert!(terminated.load(Ordering::Acquire));
}

#[tokio::test]
async fn test_request_errors() {
    let port = spawn_stepper(Arc::new(AtomicBool::new(false)));
    let recv_error = port
        .request(StepMessage::Vanish)
        .await
        .expect_err("Actor should close the oneshot channel when vanishing");
    assert!(matches!(recv_error, ports::ActorRequestError::Recv));
    let send_error = port
        .request(StepMessage::StepUp)
        .await
        .expect_err("Actor request channel is still sendable after actor termination");
    assert!(matches!(send_error, ports::ActorRequestError::Send));
    port.await_shutdown().await;
}

#[tokio::test]
async fn test_into_anyhow_keeps_actor_error() {
    #[derive(Debug, thiserror::Error)]
    #[error("store locked")]
    struct Locked;

    let err = ports::ActorRequestError::Actor(anyhow::Error::new(Locked)).into_anyhow();
    assert!(err.downcast_ref::<Locked>().is_some());
    let err = ports::ActorRequestError::<anyhow::Error>::Send.into_anyhow();
    assert_eq!(err.to_string(), "actor is not running");
}

fn spawn_handle_tester(termination_flag: Arc<AtomicBool>) -> ports::Handle {
    let (handle, mut handle_child) = ports::Handle::new();
    tokio::spawn(async move {
        handle_child.should_terminate().await;
        termination_flag.store(true, Ordering::Release);
    });
    handle
}

#[tokio::test]
async fn test_handle_drop() {
    let flag = Arc::new(AtomicBool::new(false));
    let handle = spawn_handle_tester(flag.clone());
    assert!(!flag.load(Ordering::Acquire));
    drop(handle);
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    assert!(flag.load(Ordering::Acquire));
}

#[tokio::test]
async fn test_handle_await() {
    let flag = Arc::new(AtomicBool::new(false));
    let handle = spawn_handle_tester(flag.clone());
    handle.await_shutdown().await;
    assert!(flag.load(Ordering::Acquire));
}
