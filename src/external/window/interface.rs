use anyhow::Result;

/// Native value of the window attribute meaning "follow the system
/// brightness". Any negative value is read the same way.
pub const BRIGHTNESS_OVERRIDE_NONE: f64 = -1.0;

/// Access to the brightness override of the foreground window.
///
/// The override only lasts while the window is in the foreground and never
/// touches the system-wide setting. Implementations are plain in-process
/// data, so the methods are synchronous; callers are responsible for
/// invoking the setter on the UI-owning context.
pub trait WindowBrightnessStore: 'static + Send + Sync + Clone {
    /// The window's override in 0.0..=1.0, or `None` when the window follows
    /// the system brightness.
    fn override_brightness(&self) -> Result<Option<f64>>;

    /// Apply an override, or drop it with `None`.
    fn set_override_brightness(&self, brightness: Option<f64>) -> Result<()>;
}

/// Decode the native attribute value.
pub fn override_from_native(raw: f64) -> Option<f64> {
    if raw < 0.0 {
        None
    } else {
        Some(raw)
    }
}

/// Encode an override into the native attribute value.
pub fn override_to_native(brightness: Option<f64>) -> f64 {
    brightness.unwrap_or(BRIGHTNESS_OVERRIDE_NONE)
}
