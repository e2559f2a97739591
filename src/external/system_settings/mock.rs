use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use anyhow::Result;
use async_trait::async_trait;

use super::{
    SettingKey, SettingsError, SystemSettings, SCREEN_BRIGHTNESS_MODE_AUTOMATIC,
};

#[derive(Default)]
struct MockState {
    values: HashMap<SettingKey, i32>,
    can_write: bool,
    should_fail: bool,
    fail_writes_to: Option<SettingKey>,
    settings_screen_openings: usize,
    writes: Vec<(SettingKey, i32)>,
}

/// A mock [SystemSettings], usable when testing the bridge.
#[derive(Clone)]
pub struct MockSystemSettings {
    state: Arc<Mutex<MockState>>,
}

impl MockSystemSettings {
    /// A store holding `brightness` in automatic mode, without the
    /// write-settings permission
    pub fn new(brightness: i32) -> MockSystemSettings {
        let mut values = HashMap::new();
        values.insert(SettingKey::ScreenBrightness, brightness);
        values.insert(
            SettingKey::ScreenBrightnessMode,
            SCREEN_BRIGHTNESS_MODE_AUTOMATIC,
        );
        MockSystemSettings {
            state: Arc::new(Mutex::new(MockState {
                values,
                ..Default::default()
            })),
        }
    }

    /// A store in which no setting exists
    pub fn empty() -> MockSystemSettings {
        MockSystemSettings {
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    pub fn set_can_write(&self, can_write: bool) {
        self.state.lock().unwrap().can_write = can_write;
    }

    /// Set whether every operation on this store should return an error or not
    pub fn set_failure_mode(&self, should_fail: bool) {
        self.state.lock().unwrap().should_fail = should_fail;
    }

    /// Make only writes to `key` fail
    pub fn fail_writes_to(&self, key: Option<SettingKey>) {
        self.state.lock().unwrap().fail_writes_to = key;
    }

    /// Change a value behind the bridge's back
    pub fn put_raw(&self, key: SettingKey, value: i32) {
        self.state.lock().unwrap().values.insert(key, value);
    }

    pub fn remove(&self, key: SettingKey) {
        self.state.lock().unwrap().values.remove(&key);
    }

    pub fn value(&self, key: SettingKey) -> Option<i32> {
        self.state.lock().unwrap().values.get(&key).copied()
    }

    /// Successful writes, in order
    pub fn writes(&self) -> Vec<(SettingKey, i32)> {
        self.state.lock().unwrap().writes.clone()
    }

    pub fn settings_screen_openings(&self) -> usize {
        self.state.lock().unwrap().settings_screen_openings
    }
}

#[async_trait]
impl SystemSettings for MockSystemSettings {
    async fn get_int(&self, key: SettingKey) -> Result<i32, SettingsError> {
        let state = self.state.lock().unwrap();
        if state.should_fail {
            return Err(anyhow::anyhow!("Mock SystemSettings is failing").into());
        }
        state
            .values
            .get(&key)
            .copied()
            .ok_or(SettingsError::NotFound(key))
    }

    async fn put_int(&self, key: SettingKey, value: i32) -> Result<(), SettingsError> {
        let mut state = self.state.lock().unwrap();
        if state.should_fail || state.fail_writes_to == Some(key) {
            return Err(anyhow::anyhow!("Mock SystemSettings is failing").into());
        }
        state.values.insert(key, value);
        state.writes.push((key, value));
        Ok(())
    }

    async fn can_write(&self) -> Result<bool> {
        let state = self.state.lock().unwrap();
        if state.should_fail {
            Err(anyhow::anyhow!("Mock SystemSettings is failing"))
        } else {
            Ok(state.can_write)
        }
    }

    async fn open_write_settings(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.should_fail {
            return Err(anyhow::anyhow!("Mock SystemSettings is failing"));
        }
        state.settings_screen_openings += 1;
        Ok(())
    }
}
