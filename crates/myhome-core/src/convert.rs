// ── API-to-domain type conversions ──
//
// Bridges raw `myhome_api` wire types into `myhome_core::model` domain
// types and back. The platform-dependent `where` / `zone` split is
// resolved here so the rest of the crate only sees `address`.

use myhome_api::{
    ActivationDiscoveryResponse, DeleteDeviceRequest, DeviceListing, DeviceWriteRequest,
    GatewayInfo, RawConfiguredDevice,
};
use tracing::warn;

use crate::model::{
    ConfiguredDevice, DeviceKind, DeviceMap, DeviceRecord, DiscoverySnapshot, Gateway, Platform,
    SensorClass,
};

// ── Gateway ────────────────────────────────────────────────────────

impl From<GatewayInfo> for Gateway {
    fn from(g: GatewayInfo) -> Self {
        Self {
            mac: g.mac,
            name: g.name,
            host: g.host,
            discovery_by_activation: g.discovery_by_activation,
        }
    }
}

// ── Discovery ──────────────────────────────────────────────────────

impl From<ActivationDiscoveryResponse> for DiscoverySnapshot {
    fn from(r: ActivationDiscoveryResponse) -> Self {
        Self {
            gateway: r.gateway,
            enabled: r.enabled,
            cleared: r.cleared,
            light: r.new_light,
            cover: r.new_cover,
            climate: r.new_climate,
            sensor: r.new_power,
        }
    }
}

// ── Configured devices ─────────────────────────────────────────────

/// Climate flags default to on when the server omits them.
fn flag_or_on(value: Option<bool>) -> bool {
    value.unwrap_or(true)
}

fn sensor_class(raw: Option<&str>, key: &str) -> SensorClass {
    match raw {
        None => SensorClass::default(),
        Some(s) => s.parse().unwrap_or_else(|_| {
            warn!(key, class = s, "unknown sensor class, treating as power");
            SensorClass::default()
        }),
    }
}

/// Build the domain device for one raw entry of a platform list.
pub fn configured_device(platform: Platform, raw: RawConfiguredDevice) -> ConfiguredDevice {
    let kind = match platform {
        Platform::Light => DeviceKind::Light {
            dimmable: raw.dimmable.unwrap_or(false),
        },
        Platform::Cover => DeviceKind::Cover,
        Platform::Climate => DeviceKind::Climate {
            heat: flag_or_on(raw.heat),
            cool: flag_or_on(raw.cool),
            fan: flag_or_on(raw.fan),
            standalone: flag_or_on(raw.standalone),
        },
        Platform::Sensor => DeviceKind::Sensor {
            class: sensor_class(raw.class.as_deref(), &raw.key),
        },
    };

    // The platform decides which field carries the address; fall back to
    // the other one rather than losing it.
    let address = match platform {
        Platform::Climate => raw.zone.or(raw.where_),
        Platform::Light | Platform::Cover | Platform::Sensor => raw.where_.or(raw.zone),
    }
    .unwrap_or_default();

    let name = raw.name.unwrap_or_else(|| raw.key.clone());

    ConfiguredDevice {
        record: DeviceRecord {
            key: raw.key,
            name,
            address,
            kind,
        },
        who: raw.who,
        interface: raw.interface,
        manufacturer: raw.manufacturer,
        model: raw.model,
    }
}

impl From<DeviceListing> for DeviceMap {
    fn from(listing: DeviceListing) -> Self {
        let convert = |platform: Platform, raw: Vec<RawConfiguredDevice>| {
            raw.into_iter()
                .map(|d| configured_device(platform, d))
                .collect::<Vec<_>>()
        };
        Self {
            light: convert(Platform::Light, listing.light),
            cover: convert(Platform::Cover, listing.cover),
            climate: convert(Platform::Climate, listing.climate),
            sensor: convert(Platform::Sensor, listing.sensor),
        }
    }
}

// ── Requests ───────────────────────────────────────────────────────

/// Build the create/replace request for a record on a gateway.
///
/// Only the fields of the record's platform are set; the address goes
/// to `zone` for climate and `where` otherwise, never both.
pub fn write_request(gateway: &str, record: &DeviceRecord) -> DeviceWriteRequest {
    let platform = record.platform();
    let mut req = DeviceWriteRequest {
        gateway: gateway.to_owned(),
        platform: platform.as_str().to_owned(),
        key: record.key.clone(),
        name: record.name.clone(),
        ..DeviceWriteRequest::default()
    };

    match platform {
        Platform::Climate => req.zone = Some(record.address.clone()),
        Platform::Light | Platform::Cover | Platform::Sensor => {
            req.where_ = Some(record.address.clone());
        }
    }

    match record.kind {
        DeviceKind::Light { dimmable } => req.dimmable = Some(dimmable),
        DeviceKind::Cover => {}
        DeviceKind::Climate {
            heat,
            cool,
            fan,
            standalone,
        } => {
            req.heat = Some(heat);
            req.cool = Some(cool);
            req.fan = Some(fan);
            req.standalone = Some(standalone);
        }
        DeviceKind::Sensor { class } => req.class = Some(class.as_str().to_owned()),
    }

    req
}

pub fn delete_request(gateway: &str, platform: Platform, key: &str) -> DeleteDeviceRequest {
    DeleteDeviceRequest {
        gateway: gateway.to_owned(),
        platform: platform.as_str().to_owned(),
        key: key.to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn climate_device_reads_zone_and_defaults_flags() {
        let raw = RawConfiguredDevice {
            key: "zone_1".into(),
            name: Some("Zone 1".into()),
            zone: Some("1".into()),
            cool: Some(false),
            who: Some("4".into()),
            ..RawConfiguredDevice::default()
        };
        let dev = configured_device(Platform::Climate, raw);
        assert_eq!(dev.record.address, "1");
        assert_eq!(
            dev.record.kind,
            DeviceKind::Climate {
                heat: true,
                cool: false,
                fan: true,
                standalone: true
            }
        );
        assert_eq!(dev.who.as_deref(), Some("4"));
    }

    #[test]
    fn unknown_sensor_class_falls_back_to_power() {
        let raw = RawConfiguredDevice {
            key: "meter".into(),
            where_: Some("51".into()),
            class: Some("voltage".into()),
            ..RawConfiguredDevice::default()
        };
        let dev = configured_device(Platform::Sensor, raw);
        assert_eq!(
            dev.record.kind,
            DeviceKind::Sensor {
                class: SensorClass::Power
            }
        );
        assert_eq!(dev.record.name, "meter");
    }

    #[test]
    fn light_request_carries_where_and_dimmable_only() {
        let mut record = DeviceRecord::new(Platform::Light, "hall", "Hall", "11");
        record.kind = DeviceKind::Light { dimmable: true };
        let value = serde_json::to_value(write_request("gw", &record)).unwrap();
        assert_eq!(
            value,
            json!({
                "gateway": "gw",
                "platform": "light",
                "key": "hall",
                "name": "Hall",
                "where": "11",
                "dimmable": true
            })
        );
    }

    #[test]
    fn climate_request_uses_zone() {
        let record = DeviceRecord::new(Platform::Climate, "zone_2", "Zone 2", "2");
        let req = write_request("gw", &record);
        assert_eq!(req.zone.as_deref(), Some("2"));
        assert_eq!(req.where_, None);
        assert_eq!(req.heat, Some(true));
        assert_eq!(req.class, None);
    }

    #[test]
    fn sensor_request_uses_class() {
        let record = DeviceRecord::new(Platform::Sensor, "p", "Power 51", "51");
        let req = write_request("gw", &record);
        assert_eq!(req.class.as_deref(), Some("power"));
        assert_eq!(req.where_.as_deref(), Some("51"));
        assert_eq!(req.dimmable, None);
    }

    #[test]
    fn discovery_response_maps_power_to_sensor() {
        let resp: ActivationDiscoveryResponse = serde_json::from_value(json!({
            "gateway": "gw",
            "enabled": true,
            "new_power": ["51"],
            "cleared": true
        }))
        .unwrap();
        let snap = DiscoverySnapshot::from(resp);
        assert_eq!(snap.sensor, vec!["51".to_string()]);
        assert!(snap.cleared);
        assert_eq!(snap.addresses(Platform::Sensor).len(), 1);
    }
}
