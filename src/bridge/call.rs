//! The bridge's method surface: method names and option objects in, result
//! objects out.

use super::{
    brightness_bridge::BrightnessBridge,
    error::BridgeError,
    types::{BrightnessMode, PermissionState},
};
use crate::external::{
    system_settings::SystemSettings, ui_context::UiContext, window::WindowBrightnessStore,
};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};

/// Method names with a short description, in the order hosts list them
pub const METHODS: &[(&str, &str)] = &[
    ("getBrightness", "Current brightness of the window (0-1)."),
    ("setBrightness", "Override the window brightness. Options: {\"brightness\": 0-1}."),
    ("getSystemBrightness", "System-wide brightness (0-1)."),
    (
        "setSystemBrightness",
        "Set the system-wide brightness and switch to manual mode. Needs the write-settings permission. Options: {\"brightness\": 0-1}.",
    ),
    (
        "getSystemBrightnessMode",
        "System brightness mode: 0 unknown, 1 automatic, 2 manual. Needs the write-settings permission.",
    ),
    (
        "setSystemBrightnessMode",
        "Set the system brightness mode. Needs the write-settings permission. Options: {\"mode\": 1|2}.",
    ),
    ("isUsingSystemBrightness", "Whether the window follows the system brightness."),
    ("restoreSystemBrightness", "Drop the window override."),
    ("isAvailable", "Whether brightness control is available."),
    ("checkPermissions", "State of the write-settings permission."),
    (
        "requestPermissions",
        "Open the write-settings screen unless the permission is held.",
    ),
    ("getPluginVersion", "Version of the bridge."),
];

/// A decoded call of the method surface
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeCall {
    GetBrightness,
    SetBrightness { brightness: Option<f64> },
    GetSystemBrightness,
    SetSystemBrightness { brightness: Option<f64> },
    GetSystemBrightnessMode,
    SetSystemBrightnessMode { mode: Option<BrightnessMode> },
    IsUsingSystemBrightness,
    RestoreSystemBrightness,
    IsAvailable,
    CheckPermissions,
    RequestPermissions,
    GetPluginVersion,
}

/// The result of a successful [BridgeCall]
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeResponse {
    Brightness(f64),
    Mode(BrightnessMode),
    IsUsing(bool),
    Available(bool),
    Permission(PermissionState),
    Version(String),
    Done,
}

#[derive(Debug, Default, Deserialize)]
struct BrightnessOptions {
    brightness: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct ModeOptions {
    mode: Option<i64>,
}

impl BridgeCall {
    /// Decode `method` and its options object. A `null` options value is
    /// the same as an empty object.
    pub fn parse(method: &str, options: &Value) -> Result<BridgeCall, BridgeError> {
        let call = match method {
            "getBrightness" => BridgeCall::GetBrightness,
            "setBrightness" => BridgeCall::SetBrightness {
                brightness: decode_options::<BrightnessOptions>(options)?.brightness,
            },
            "getSystemBrightness" => BridgeCall::GetSystemBrightness,
            "setSystemBrightness" => BridgeCall::SetSystemBrightness {
                brightness: decode_options::<BrightnessOptions>(options)?.brightness,
            },
            "getSystemBrightnessMode" => BridgeCall::GetSystemBrightnessMode,
            "setSystemBrightnessMode" => BridgeCall::SetSystemBrightnessMode {
                mode: decode_options::<ModeOptions>(options)?
                    .mode
                    .map(BrightnessMode::from_code),
            },
            "isUsingSystemBrightness" => BridgeCall::IsUsingSystemBrightness,
            "restoreSystemBrightness" => BridgeCall::RestoreSystemBrightness,
            "isAvailable" => BridgeCall::IsAvailable,
            "checkPermissions" => BridgeCall::CheckPermissions,
            "requestPermissions" => BridgeCall::RequestPermissions,
            "getPluginVersion" => BridgeCall::GetPluginVersion,
            other => {
                return Err(BridgeError::invalid_argument(format!(
                    "{} is not implemented",
                    other
                )))
            }
        };
        Ok(call)
    }

    pub fn method(&self) -> &'static str {
        match self {
            BridgeCall::GetBrightness => "getBrightness",
            BridgeCall::SetBrightness { .. } => "setBrightness",
            BridgeCall::GetSystemBrightness => "getSystemBrightness",
            BridgeCall::SetSystemBrightness { .. } => "setSystemBrightness",
            BridgeCall::GetSystemBrightnessMode => "getSystemBrightnessMode",
            BridgeCall::SetSystemBrightnessMode { .. } => "setSystemBrightnessMode",
            BridgeCall::IsUsingSystemBrightness => "isUsingSystemBrightness",
            BridgeCall::RestoreSystemBrightness => "restoreSystemBrightness",
            BridgeCall::IsAvailable => "isAvailable",
            BridgeCall::CheckPermissions => "checkPermissions",
            BridgeCall::RequestPermissions => "requestPermissions",
            BridgeCall::GetPluginVersion => "getPluginVersion",
        }
    }

    pub async fn invoke<W, S, U>(
        self,
        bridge: &mut BrightnessBridge<W, S, U>,
    ) -> Result<BridgeResponse, BridgeError>
    where
        W: WindowBrightnessStore,
        S: SystemSettings,
        U: UiContext,
    {
        log::debug!("Invoking {}", self.method());
        let response = match self {
            BridgeCall::GetBrightness => BridgeResponse::Brightness(bridge.get_brightness().await?),
            BridgeCall::SetBrightness { brightness } => {
                bridge.set_brightness(brightness).await?;
                BridgeResponse::Done
            }
            BridgeCall::GetSystemBrightness => {
                BridgeResponse::Brightness(bridge.get_system_brightness().await?)
            }
            BridgeCall::SetSystemBrightness { brightness } => {
                bridge.set_system_brightness(brightness).await?;
                BridgeResponse::Done
            }
            BridgeCall::GetSystemBrightnessMode => {
                BridgeResponse::Mode(bridge.get_system_brightness_mode().await?)
            }
            BridgeCall::SetSystemBrightnessMode { mode } => {
                bridge.set_system_brightness_mode(mode).await?;
                BridgeResponse::Done
            }
            BridgeCall::IsUsingSystemBrightness => {
                BridgeResponse::IsUsing(bridge.is_using_system_brightness()?)
            }
            BridgeCall::RestoreSystemBrightness => {
                bridge.restore_system_brightness().await?;
                BridgeResponse::Done
            }
            BridgeCall::IsAvailable => BridgeResponse::Available(bridge.is_available()),
            BridgeCall::CheckPermissions => {
                BridgeResponse::Permission(bridge.check_permissions().await)
            }
            BridgeCall::RequestPermissions => {
                BridgeResponse::Permission(bridge.request_permissions().await)
            }
            BridgeCall::GetPluginVersion => {
                BridgeResponse::Version(bridge.get_plugin_version().to_owned())
            }
        };
        Ok(response)
    }
}

impl BridgeResponse {
    /// The result object handed back to the caller
    pub fn to_json(&self) -> Value {
        match self {
            BridgeResponse::Brightness(brightness) => json!({ "brightness": brightness }),
            BridgeResponse::Mode(mode) => json!({ "mode": mode.code() }),
            BridgeResponse::IsUsing(is_using) => json!({ "isUsing": is_using }),
            BridgeResponse::Available(available) => json!({ "available": available }),
            BridgeResponse::Permission(state) => json!({ "brightness": state }),
            BridgeResponse::Version(version) => json!({ "version": version }),
            BridgeResponse::Done => json!({}),
        }
    }
}

fn decode_options<T: DeserializeOwned + Default>(options: &Value) -> Result<T, BridgeError> {
    if options.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(options.clone())
        .map_err(|e| BridgeError::invalid_argument(format!("Invalid options: {}", e)))
}
