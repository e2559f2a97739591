use super::{
    dbus,
    system_settings::{backlight::BacklightSettings, mock::MockSystemSettings, SystemSettings},
    window::{attributes::WindowAttributes, mock::MockWindow, WindowBrightnessStore},
};
use crate::config::BacklightConfig;
use anyhow::{Context, Result};

/// Builds the collaborators the bridge is wired to
pub struct DependencyProvider<W: WindowBrightnessStore, S: SystemSettings> {
    window: W,
    system_settings: S,
}

impl<W: WindowBrightnessStore, S: SystemSettings> DependencyProvider<W, S> {
    pub fn new(window: W, system_settings: S) -> DependencyProvider<W, S> {
        DependencyProvider {
            window,
            system_settings,
        }
    }

    pub fn get_window(&self) -> W {
        self.window.clone()
    }

    pub fn get_system_settings(&self) -> S {
        self.system_settings.clone()
    }
}

impl DependencyProvider<WindowAttributes, BacklightSettings<'static>> {
    /// Wire the bridge to the backlight of the current logind session
    pub async fn make_system(config: &BacklightConfig) -> Result<Self> {
        let mut dbus_factory = dbus::ConnectionFactory::new();
        let connection = dbus_factory.get_system().await?;
        let manager_proxy = logind_zbus::manager::ManagerProxy::new(&connection).await?;
        let path = manager_proxy
            .get_session_by_PID(std::process::id())
            .await
            .context("Couldn't find the logind session of this process")?;
        let system_settings = BacklightSettings::new(
            &config.device,
            connection,
            path.into_inner(),
            config.state_file.clone(),
            &config.opener,
        )
        .await?;
        Ok(DependencyProvider::new(
            WindowAttributes::new(),
            system_settings,
        ))
    }
}

impl DependencyProvider<MockWindow, MockSystemSettings> {
    /// In-memory collaborators, with the write-settings permission granted
    pub fn make_mock() -> Self {
        let system_settings = MockSystemSettings::new(128);
        system_settings.set_can_write(true);
        DependencyProvider::new(MockWindow::new(None), system_settings)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::external::system_settings::SettingKey;

    #[tokio::test]
    async fn test_mock() {
        let provider = DependencyProvider::make_mock();
        let settings = provider.get_system_settings();
        assert_eq!(
            settings.get_int(SettingKey::ScreenBrightness).await.unwrap(),
            128
        );
        assert!(settings.can_write().await.unwrap());
        assert_eq!(provider.get_window().override_brightness().unwrap(), None);
    }
}
