use crate::{
    bridge::{BridgeCall, BridgeError, BridgeResponse, BrightnessBridge},
    control::bridge_server::{call_bridge, BridgePort, BridgeServer},
    external::{
        system_settings::mock::MockSystemSettings, ui_context::ui_thread::UiThread,
        window::mock::MockWindow,
    },
};
use std::time::Duration;

async fn spawn_bridge(window: MockWindow, settings: MockSystemSettings) -> BridgePort {
    let ui = UiThread::spawn().await.expect("UiThread failed to start");
    BridgeServer::new(BrightnessBridge::new(window, settings, ui))
        .spawn()
        .await
        .expect("Bridge server failed to start")
}

#[tokio::test]
async fn test_basic_flow() {
    let window = MockWindow::new(None);
    let port = spawn_bridge(window.clone(), MockSystemSettings::new(255)).await;
    assert_eq!(
        call_bridge(&port, BridgeCall::GetBrightness).await.unwrap(),
        BridgeResponse::Brightness(1.0)
    );
    assert_eq!(
        call_bridge(
            &port,
            BridgeCall::SetBrightness {
                brightness: Some(0.2)
            }
        )
        .await
        .unwrap(),
        BridgeResponse::Done
    );
    assert_eq!(window.current(), Some(0.2));
    assert_eq!(
        call_bridge(&port, BridgeCall::IsUsingSystemBrightness)
            .await
            .unwrap(),
        BridgeResponse::IsUsing(false)
    );
}

#[tokio::test]
async fn test_typed_errors_survive_the_port() {
    let port = spawn_bridge(MockWindow::new(None), MockSystemSettings::new(0)).await;
    let error = call_bridge(
        &port,
        BridgeCall::SetSystemBrightness {
            brightness: Some(0.5),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(error, BridgeError::PermissionDenied));
    let error = call_bridge(&port, BridgeCall::SetBrightness { brightness: None })
        .await
        .unwrap_err();
    assert!(matches!(error, BridgeError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_clients_share_one_bridge() {
    let window = MockWindow::new(None);
    let port = spawn_bridge(window.clone(), MockSystemSettings::new(0)).await;
    let other = port.clone();
    let calls = (1..=10).map(|i| {
        let port = if i % 2 == 0 { port.clone() } else { other.clone() };
        tokio::spawn(async move {
            call_bridge(
                &port,
                BridgeCall::SetBrightness {
                    brightness: Some(i as f64 / 10.0),
                },
            )
            .await
        })
    });
    for call in calls.collect::<Vec<_>>() {
        call.await.unwrap().unwrap();
    }
    assert_eq!(window.write_count(), 10);
}

#[tokio::test]
async fn test_override_dropped_on_termination() {
    let window = MockWindow::new(None);
    let port = spawn_bridge(window.clone(), MockSystemSettings::new(0)).await;
    call_bridge(
        &port,
        BridgeCall::SetBrightness {
            brightness: Some(0.8),
        },
    )
    .await
    .unwrap();
    assert_eq!(window.current(), Some(0.8));
    port.await_shutdown().await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(window.current(), None);
}

#[tokio::test]
async fn test_stopped_bridge() {
    let port = spawn_bridge(MockWindow::new(None), MockSystemSettings::new(0)).await;
    let stale = port.clone();
    drop(port);
    // The clone keeps the server alive
    assert!(call_bridge(&stale, BridgeCall::IsAvailable).await.is_ok());
}
