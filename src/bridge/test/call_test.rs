use crate::{
    bridge::{
        call::METHODS, BridgeCall, BridgeError, BridgeResponse, BrightnessBridge, BrightnessMode,
        PermissionState,
    },
    external::{
        system_settings::{mock::MockSystemSettings, SettingKey},
        ui_context::inline::InlineUiContext,
        window::mock::MockWindow,
    },
};
use serde_json::{json, Value};

type TestBridge = BrightnessBridge<MockWindow, MockSystemSettings, InlineUiContext>;

fn make_bridge() -> (TestBridge, MockSystemSettings) {
    let settings = MockSystemSettings::new(128);
    let bridge = BrightnessBridge::new(MockWindow::new(None), settings.clone(), InlineUiContext);
    (bridge, settings)
}

async fn call(bridge: &mut TestBridge, method: &str, options: Value) -> Result<Value, Value> {
    let call = BridgeCall::parse(method, &options).map_err(|e| e.to_json())?;
    call.invoke(bridge)
        .await
        .map(|r| r.to_json())
        .map_err(|e| e.to_json())
}

#[test]
fn test_parse() {
    assert_eq!(
        BridgeCall::parse("setBrightness", &json!({"brightness": 0.4})).unwrap(),
        BridgeCall::SetBrightness {
            brightness: Some(0.4)
        }
    );
    assert_eq!(
        BridgeCall::parse("setBrightness", &json!({})).unwrap(),
        BridgeCall::SetBrightness { brightness: None }
    );
    assert_eq!(
        BridgeCall::parse("setSystemBrightness", &Value::Null).unwrap(),
        BridgeCall::SetSystemBrightness { brightness: None }
    );
    assert_eq!(
        BridgeCall::parse("setSystemBrightnessMode", &json!({"mode": 7})).unwrap(),
        BridgeCall::SetSystemBrightnessMode {
            mode: Some(BrightnessMode::Manual)
        }
    );
    assert_eq!(
        BridgeCall::parse("getPluginVersion", &json!({"ignored": true})).unwrap(),
        BridgeCall::GetPluginVersion
    );
}

#[test]
fn test_parse_errors() {
    assert!(matches!(
        BridgeCall::parse("setBrightness", &json!({"brightness": "bright"})),
        Err(BridgeError::InvalidArgument(_))
    ));
    let err = BridgeCall::parse("setVolume", &Value::Null).unwrap_err();
    assert_eq!(err.to_string(), "setVolume is not implemented");
    assert_eq!(err.code(), "INVALID_ARGUMENT");
}

#[test]
fn test_every_listed_method_parses() {
    for (method, _) in METHODS {
        let call = BridgeCall::parse(method, &Value::Null).expect("Listed method doesn't parse");
        assert_eq!(call.method(), *method);
    }
    assert_eq!(METHODS.len(), 12);
}

#[test]
fn test_response_shapes() {
    assert_eq!(
        BridgeResponse::Permission(PermissionState::Granted).to_json(),
        json!({"brightness": "granted"})
    );
    assert_eq!(
        BridgeResponse::Mode(BrightnessMode::Unknown).to_json(),
        json!({"mode": 0})
    );
    assert_eq!(
        BridgeResponse::IsUsing(true).to_json(),
        json!({"isUsing": true})
    );
    assert_eq!(BridgeResponse::Done.to_json(), json!({}));
}

#[tokio::test]
async fn test_override_scenario() {
    let (mut bridge, _) = make_bridge();
    assert_eq!(
        call(&mut bridge, "setBrightness", json!({"brightness": 1.5})).await,
        Ok(json!({}))
    );
    assert_eq!(
        call(&mut bridge, "getBrightness", Value::Null).await,
        Ok(json!({"brightness": 1.0}))
    );
    assert_eq!(
        call(&mut bridge, "isUsingSystemBrightness", Value::Null).await,
        Ok(json!({"isUsing": false}))
    );
    call(&mut bridge, "restoreSystemBrightness", Value::Null)
        .await
        .unwrap();
    assert_eq!(
        call(&mut bridge, "isUsingSystemBrightness", Value::Null).await,
        Ok(json!({"isUsing": true}))
    );
}

#[tokio::test]
async fn test_no_permission_scenario() {
    let (mut bridge, settings) = make_bridge();
    assert_eq!(
        call(&mut bridge, "checkPermissions", Value::Null).await,
        Ok(json!({"brightness": "prompt"}))
    );
    let rejection = call(&mut bridge, "setSystemBrightnessMode", json!({"mode": 1}))
        .await
        .unwrap_err();
    assert_eq!(rejection["code"], "PERMISSION_DENIED");
    assert_eq!(rejection["message"], "WRITE_SETTINGS permission not granted");
    assert!(settings.writes().is_empty());
}

#[tokio::test]
async fn test_unknown_native_mode_scenario() {
    let (mut bridge, settings) = make_bridge();
    settings.set_can_write(true);
    settings.put_raw(SettingKey::ScreenBrightnessMode, 99);
    assert_eq!(
        call(&mut bridge, "getSystemBrightnessMode", Value::Null).await,
        Ok(json!({"mode": 0}))
    );
    let rejection = call(&mut bridge, "setSystemBrightnessMode", json!({"mode": 0}))
        .await
        .unwrap_err();
    assert_eq!(rejection["code"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_missing_setting_rejection() {
    let mut bridge =
        BrightnessBridge::new(MockWindow::new(None), MockSystemSettings::empty(), InlineUiContext);
    let rejection = call(&mut bridge, "getSystemBrightness", Value::Null)
        .await
        .unwrap_err();
    assert_eq!(rejection["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_static_calls() {
    let (mut bridge, _) = make_bridge();
    assert_eq!(
        call(&mut bridge, "isAvailable", Value::Null).await,
        Ok(json!({"available": true}))
    );
    assert_eq!(
        call(&mut bridge, "getPluginVersion", Value::Null).await,
        Ok(json!({"version": env!("CARGO_PKG_VERSION")}))
    );
}
