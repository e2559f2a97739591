use log::info;
use zbus;

/// Hands out clones of a lazily created system [zbus::Connection]. Connections are
/// refcounted internally, so every component can own its own clone.
#[derive(Default)]
pub struct ConnectionFactory {
    system: Option<zbus::Connection>,
}

impl ConnectionFactory {
    /// No connections are created upon calling this method.
    pub fn new() -> ConnectionFactory {
        ConnectionFactory::default()
    }

    /// Get a connection to the system-wide D-Bus
    pub async fn get_system(&mut self) -> zbus::Result<zbus::Connection> {
        if let Some(c) = &self.system {
            return Ok(c.clone());
        }
        info!("Creating a new connection to the system bus");
        let connection = zbus::Connection::system().await?;
        self.system = Some(connection.clone());
        Ok(connection)
    }
}
