use super::{override_from_native, override_to_native, WindowBrightnessStore};
use anyhow::{anyhow, Result};
use std::sync::{Arc, Mutex};

/// The brightness attribute of a window owned by this process.
///
/// Clones share the same attribute. The host reads [WindowAttributes::native_brightness]
/// when it renders, the way a compositor reads a window's layout parameters.
#[derive(Debug, Clone)]
pub struct WindowAttributes {
    screen_brightness: Arc<Mutex<f64>>,
}

impl WindowAttributes {
    /// A window following the system brightness.
    pub fn new() -> WindowAttributes {
        WindowAttributes {
            screen_brightness: Arc::new(Mutex::new(override_to_native(None))),
        }
    }

    /// The raw attribute, negative when no override is applied.
    pub fn native_brightness(&self) -> Result<f64> {
        let guard = self
            .screen_brightness
            .lock()
            .map_err(|_| anyhow!("Window attributes are poisoned"))?;
        Ok(*guard)
    }
}

impl Default for WindowAttributes {
    fn default() -> Self {
        WindowAttributes::new()
    }
}

impl WindowBrightnessStore for WindowAttributes {
    fn override_brightness(&self) -> Result<Option<f64>> {
        Ok(override_from_native(self.native_brightness()?))
    }

    fn set_override_brightness(&self, brightness: Option<f64>) -> Result<()> {
        let mut guard = self
            .screen_brightness
            .lock()
            .map_err(|_| anyhow!("Window attributes are poisoned"))?;
        *guard = override_to_native(brightness);
        Ok(())
    }
}
