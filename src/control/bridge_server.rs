use crate::{
    armaf::{spawn_server, ActorPort, Server},
    bridge::{BridgeCall, BridgeError, BridgeResponse, BrightnessBridge},
    external::{
        system_settings::SystemSettings, ui_context::UiContext, window::WindowBrightnessStore,
    },
};
use anyhow::Result;
use async_trait::async_trait;

/// Port of a running [BridgeServer]
pub type BridgePort = ActorPort<BridgeCall, BridgeResponse, anyhow::Error>;

/// Hosts a [BrightnessBridge] on its own task, so calls from any number of
/// clients are executed one at a time.
///
/// When the last port goes away, a window override still in place is
/// dropped.
pub struct BridgeServer<W: WindowBrightnessStore, S: SystemSettings, U: UiContext> {
    bridge: BrightnessBridge<W, S, U>,
}

impl<W: WindowBrightnessStore, S: SystemSettings, U: UiContext> BridgeServer<W, S, U> {
    pub fn new(bridge: BrightnessBridge<W, S, U>) -> BridgeServer<W, S, U> {
        BridgeServer { bridge }
    }

    pub async fn spawn(self) -> Result<BridgePort> {
        spawn_server(self).await
    }
}

#[async_trait]
impl<W: WindowBrightnessStore, S: SystemSettings, U: UiContext> Server<BridgeCall, BridgeResponse>
    for BridgeServer<W, S, U>
{
    fn get_name(&self) -> String {
        "BridgeServer".to_owned()
    }

    async fn handle_message(&mut self, call: BridgeCall) -> Result<BridgeResponse> {
        Ok(call.invoke(&mut self.bridge).await?)
    }

    async fn tear_down(&mut self) -> Result<()> {
        if !self.bridge.is_using_system_brightness()? {
            log::info!("Dropping window brightness override");
            self.bridge.restore_system_brightness().await?;
        }
        Ok(())
    }
}

/// Send `call` to the bridge behind `port`, recovering the typed error.
pub async fn call_bridge(
    port: &BridgePort,
    call: BridgeCall,
) -> Result<BridgeResponse, BridgeError> {
    port.request(call)
        .await
        .map_err(|e| match e.into_anyhow().downcast::<BridgeError>() {
            Ok(bridge_error) => bridge_error,
            Err(other) => BridgeError::platform("Bridge is not running", other),
        })
}
