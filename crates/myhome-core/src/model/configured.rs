// ── Configured devices ──
//
// The remote, authoritative device set. Locally this is a disposable
// cache: it is replaced wholesale on every reload, never patched.

use serde::{Deserialize, Serialize};

use super::device::DeviceRecord;
use super::platform::Platform;

/// An already-imported device plus the gateway-reported metadata.
///
/// `who`, `interface`, `manufacturer` and `model` are opaque pass-through
/// strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfiguredDevice {
    #[serde(flatten)]
    pub record: DeviceRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub who: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ConfiguredDevice {
    pub fn key(&self) -> &str {
        &self.record.key
    }

    pub fn platform(&self) -> Platform {
        self.record.platform()
    }

    /// One-line summary of the platform fields and metadata, e.g.
    /// `dimmable=true, who=1, manufacturer=BTicino`.
    pub fn details(&self) -> String {
        let mut parts = self.record.kind.options();
        let meta = [
            ("who", &self.who),
            ("interface", &self.interface),
            ("manufacturer", &self.manufacturer),
            ("model", &self.model),
        ];
        parts.extend(
            meta.into_iter()
                .filter_map(|(label, value)| value.as_ref().map(|v| format!("{label}={v}"))),
        );
        parts.join(", ")
    }
}

/// Configured devices grouped by platform, in server order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceMap {
    #[serde(default)]
    pub light: Vec<ConfiguredDevice>,
    #[serde(default)]
    pub cover: Vec<ConfiguredDevice>,
    #[serde(default)]
    pub climate: Vec<ConfiguredDevice>,
    #[serde(default)]
    pub sensor: Vec<ConfiguredDevice>,
}

impl DeviceMap {
    pub fn platform(&self, platform: Platform) -> &[ConfiguredDevice] {
        match platform {
            Platform::Light => &self.light,
            Platform::Cover => &self.cover,
            Platform::Climate => &self.climate,
            Platform::Sensor => &self.sensor,
        }
    }

    /// Look up a device by its `(platform, key)` identity.
    pub fn get(&self, platform: Platform, key: &str) -> Option<&ConfiguredDevice> {
        self.platform(platform).iter().find(|d| d.key() == key)
    }

    pub fn total(&self) -> usize {
        Platform::ALL.iter().map(|p| self.platform(*p).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// All devices in platform order.
    pub fn iter(&self) -> impl Iterator<Item = &ConfiguredDevice> {
        Platform::ALL
            .into_iter()
            .flat_map(move |p| self.platform(p).iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeviceKind, SensorClass};
    use pretty_assertions::assert_eq;

    fn configured(record: DeviceRecord) -> ConfiguredDevice {
        ConfiguredDevice {
            record,
            who: None,
            interface: None,
            manufacturer: None,
            model: None,
        }
    }

    #[test]
    fn details_lists_platform_fields_then_metadata() {
        let mut light = configured(DeviceRecord::new(Platform::Light, "hall", "Hall", "11"));
        light.record.kind = DeviceKind::Light { dimmable: true };
        light.who = Some("1".into());
        light.manufacturer = Some("BTicino".into());
        assert_eq!(light.details(), "dimmable=true, who=1, manufacturer=BTicino");

        let cover = configured(DeviceRecord::new(Platform::Cover, "blind", "Blind", "21"));
        assert_eq!(cover.details(), "");

        let mut sensor = configured(DeviceRecord::new(Platform::Sensor, "meter", "Meter", "51"));
        sensor.record.kind = DeviceKind::Sensor {
            class: SensorClass::Energy,
        };
        assert_eq!(sensor.details(), "class=energy");
    }

    #[test]
    fn lookup_is_scoped_by_platform() {
        let mut map = DeviceMap::default();
        map.light
            .push(configured(DeviceRecord::new(Platform::Light, "a", "A", "11")));
        map.cover
            .push(configured(DeviceRecord::new(Platform::Cover, "a", "A", "21")));

        assert_eq!(map.total(), 2);
        assert_eq!(
            map.get(Platform::Cover, "a").map(|d| d.record.address.as_str()),
            Some("21")
        );
        assert!(map.get(Platform::Climate, "a").is_none());
        assert_eq!(map.iter().count(), 2);
    }
}
