use serde::{Deserialize, Serialize};

use super::platform::Platform;

/// Endpoints a gateway has observed by activation but that are not
/// configured yet. Superseded wholesale on each refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverySnapshot {
    pub gateway: String,
    /// Passive discovery status as reported by the gateway.
    pub enabled: bool,
    /// The pending list was dropped by this request.
    #[serde(default)]
    pub cleared: bool,
    pub light: Vec<String>,
    pub cover: Vec<String>,
    pub climate: Vec<String>,
    /// Reported by the server as `new_power`.
    pub sensor: Vec<String>,
}

impl DiscoverySnapshot {
    pub fn addresses(&self, platform: Platform) -> &[String] {
        match platform {
            Platform::Light => &self.light,
            Platform::Cover => &self.cover,
            Platform::Climate => &self.climate,
            Platform::Sensor => &self.sensor,
        }
    }

    pub fn total(&self) -> usize {
        Platform::ALL.iter().map(|p| self.addresses(*p).len()).sum()
    }
}
