use std::{
    cell::Cell,
    sync::{Arc, Mutex},
};

use anyhow::Result;

use super::WindowBrightnessStore;

/// A mock [WindowBrightnessStore], usable when testing the bridge.
#[derive(Clone)]
pub struct MockWindow {
    brightness: Arc<Mutex<Cell<Option<f64>>>>,
    should_fail: Arc<Mutex<Cell<bool>>>,
    writes: Arc<Mutex<Cell<usize>>>,
}

impl MockWindow {
    /// Create a window with the given initial override
    pub fn new(initial_override: Option<f64>) -> MockWindow {
        MockWindow {
            brightness: Arc::new(Mutex::new(Cell::new(initial_override))),
            should_fail: Arc::new(Mutex::new(Cell::new(false))),
            writes: Arc::new(Mutex::new(Cell::new(0))),
        }
    }

    /// Set whether operations on this window should return an error or not
    pub fn set_failure_mode(&self, should_fail: bool) {
        self.should_fail.lock().unwrap().set(should_fail);
    }

    /// Number of successful override writes
    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().get()
    }

    /// Peek at the override without going through the failure switch
    pub fn current(&self) -> Option<f64> {
        self.brightness.lock().unwrap().get()
    }
}

impl WindowBrightnessStore for MockWindow {
    fn override_brightness(&self) -> Result<Option<f64>> {
        if self.should_fail.lock().unwrap().get() {
            Err(anyhow::anyhow!("Mock window is failing"))
        } else {
            Ok(self.brightness.lock().unwrap().get())
        }
    }

    fn set_override_brightness(&self, brightness: Option<f64>) -> Result<()> {
        if self.should_fail.lock().unwrap().get() {
            return Err(anyhow::anyhow!("Mock window is failing"));
        }
        self.brightness.lock().unwrap().set(brightness);
        let writes = self.writes.lock().unwrap();
        writes.set(writes.get() + 1);
        Ok(())
    }
}
