use super::bridge_server::{call_bridge, BridgePort};
use crate::{
    armaf::Handle,
    bridge::{BridgeCall, BridgeError, BridgeResponse, BrightnessMode},
};
use zbus::fdo;

pub const BUS_NAME: &str = "org.brightness.Bridge";
pub const DEFAULT_PATH: &str = "/org/brightness/Bridge";

/// Exposes the bridge on the session bus, one D-Bus method per bridge
/// method plus a generic JSON `Call`.
pub struct DBusController {
    path: Option<String>,
    bridge: BridgePort,
}

impl DBusController {
    pub fn new(path: Option<&str>, bridge: BridgePort) -> DBusController {
        DBusController {
            path: path.map(|s| s.to_owned()),
            bridge,
        }
    }

    pub async fn spawn(self) -> anyhow::Result<Handle> {
        let (handle, mut handle_child) = Handle::new();
        let path = self
            .path
            .clone()
            .unwrap_or_else(|| DEFAULT_PATH.to_string());
        let connection = zbus::ConnectionBuilder::session()?
            .name(BUS_NAME)?
            .serve_at(path.as_str(), self)?
            .build()
            .await?;

        log::debug!("Bound to D-Bus at {}", path);
        tokio::spawn(async move {
            let moved_connection = connection;
            handle_child.should_terminate().await;
            if let Err(e) = moved_connection
                .object_server()
                .remove::<Self, String>(path)
                .await
            {
                log::error!("Failed to unregister server: {}", e);
            }
            log::debug!("Terminated");
        });
        Ok(handle)
    }

    async fn request(&self, call: BridgeCall) -> fdo::Result<BridgeResponse> {
        call_bridge(&self.bridge, call).await.map_err(to_fdo_error)
    }
}

#[zbus::dbus_interface(name = "org.brightness.Bridge")]
impl DBusController {
    async fn get_brightness(&self) -> fdo::Result<f64> {
        brightness(self.request(BridgeCall::GetBrightness).await?)
    }

    async fn set_brightness(&self, brightness: f64) -> fdo::Result<()> {
        done(
            self.request(BridgeCall::SetBrightness {
                brightness: Some(brightness),
            })
            .await?,
        )
    }

    async fn get_system_brightness(&self) -> fdo::Result<f64> {
        brightness(self.request(BridgeCall::GetSystemBrightness).await?)
    }

    async fn set_system_brightness(&self, brightness: f64) -> fdo::Result<()> {
        done(
            self.request(BridgeCall::SetSystemBrightness {
                brightness: Some(brightness),
            })
            .await?,
        )
    }

    async fn get_system_brightness_mode(&self) -> fdo::Result<u8> {
        match self.request(BridgeCall::GetSystemBrightnessMode).await? {
            BridgeResponse::Mode(mode) => Ok(mode.code()),
            other => Err(unexpected(other)),
        }
    }

    async fn set_system_brightness_mode(&self, mode: i32) -> fdo::Result<()> {
        done(
            self.request(BridgeCall::SetSystemBrightnessMode {
                mode: Some(BrightnessMode::from_code(mode.into())),
            })
            .await?,
        )
    }

    async fn is_using_system_brightness(&self) -> fdo::Result<bool> {
        match self.request(BridgeCall::IsUsingSystemBrightness).await? {
            BridgeResponse::IsUsing(is_using) => Ok(is_using),
            other => Err(unexpected(other)),
        }
    }

    async fn restore_system_brightness(&self) -> fdo::Result<()> {
        done(self.request(BridgeCall::RestoreSystemBrightness).await?)
    }

    async fn is_available(&self) -> fdo::Result<bool> {
        match self.request(BridgeCall::IsAvailable).await? {
            BridgeResponse::Available(available) => Ok(available),
            other => Err(unexpected(other)),
        }
    }

    async fn check_permissions(&self) -> fdo::Result<String> {
        permission(self.request(BridgeCall::CheckPermissions).await?)
    }

    async fn request_permissions(&self) -> fdo::Result<String> {
        permission(self.request(BridgeCall::RequestPermissions).await?)
    }

    async fn get_plugin_version(&self) -> fdo::Result<String> {
        match self.request(BridgeCall::GetPluginVersion).await? {
            BridgeResponse::Version(version) => Ok(version),
            other => Err(unexpected(other)),
        }
    }

    /// Any bridge method by name, with options and result as JSON objects
    async fn call(&self, method: String, options_json: String) -> fdo::Result<String> {
        let options = parse_options(&options_json).map_err(to_fdo_error)?;
        let call = BridgeCall::parse(&method, &options).map_err(to_fdo_error)?;
        Ok(self.request(call).await?.to_json().to_string())
    }
}

/// An empty string stands for no options at all
pub fn parse_options(options_json: &str) -> Result<serde_json::Value, BridgeError> {
    if options_json.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_str(options_json)
        .map_err(|e| BridgeError::invalid_argument(format!("Options are not JSON: {}", e)))
}

pub fn to_fdo_error(error: BridgeError) -> fdo::Error {
    let message = error.to_string();
    match error {
        BridgeError::InvalidArgument(_) => fdo::Error::InvalidArgs(message),
        BridgeError::PermissionDenied => fdo::Error::AccessDenied(message),
        BridgeError::NotFound { .. } => fdo::Error::FileNotFound(message),
        BridgeError::Platform { .. } => fdo::Error::Failed(message),
    }
}

fn unexpected(response: BridgeResponse) -> fdo::Error {
    fdo::Error::Failed(format!("Unexpected bridge response {:?}", response))
}

fn brightness(response: BridgeResponse) -> fdo::Result<f64> {
    match response {
        BridgeResponse::Brightness(brightness) => Ok(brightness),
        other => Err(unexpected(other)),
    }
}

fn permission(response: BridgeResponse) -> fdo::Result<String> {
    match response {
        BridgeResponse::Permission(state) => Ok(state.to_string()),
        other => Err(unexpected(other)),
    }
}

fn done(response: BridgeResponse) -> fdo::Result<()> {
    match response {
        BridgeResponse::Done => Ok(()),
        other => Err(unexpected(other)),
    }
}
