// ── Configuration view ──
//
// Read-model of the remote configured-device set for one gateway. Every
// successful load replaces it wholesale; failures never touch it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::DeviceMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigurationView {
    gateway: Option<String>,
    devices: DeviceMap,
    loaded_at: Option<DateTime<Utc>>,
}

impl ConfigurationView {
    /// Gateway the current devices belong to.
    pub fn gateway(&self) -> Option<&str> {
        self.gateway.as_deref()
    }

    pub fn devices(&self) -> &DeviceMap {
        &self.devices
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }

    /// Adopt a server listing verbatim, discarding whatever was held.
    pub fn replace(&mut self, gateway: &str, devices: DeviceMap) {
        self.gateway = Some(gateway.to_owned());
        self.devices = devices;
        self.loaded_at = Some(Utc::now());
    }

    /// Drop everything, e.g. on gateway switch.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
