// ── Device record domain types ──
//
// A record is the platform-independent part (key, name, address) plus a
// tagged platform payload. The wire split between `where` and `zone` is
// handled in `convert`; here the address is always just `address`.

use serde::{Deserialize, Serialize};

use super::platform::{Platform, SensorClass};
use crate::error::CoreError;

/// Platform-specific fields. Exactly one variant per record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "platform", rename_all = "lowercase")]
pub enum DeviceKind {
    Light {
        #[serde(default)]
        dimmable: bool,
    },
    Cover,
    Climate {
        #[serde(default = "enabled")]
        heat: bool,
        #[serde(default = "enabled")]
        cool: bool,
        #[serde(default = "enabled")]
        fan: bool,
        #[serde(default = "enabled")]
        standalone: bool,
    },
    Sensor {
        #[serde(default)]
        class: SensorClass,
    },
}

fn enabled() -> bool {
    true
}

impl DeviceKind {
    /// Default payload for a platform: non-dimmable light, climate zone
    /// with every mode on, power sensor.
    pub fn default_for(platform: Platform) -> Self {
        match platform {
            Platform::Light => Self::Light { dimmable: false },
            Platform::Cover => Self::Cover,
            Platform::Climate => Self::Climate {
                heat: true,
                cool: true,
                fan: true,
                standalone: true,
            },
            Platform::Sensor => Self::Sensor {
                class: SensorClass::Power,
            },
        }
    }

    /// `field=value` pairs for the platform payload, in schema order.
    pub fn options(&self) -> Vec<String> {
        match self {
            Self::Light { dimmable } => vec![format!("dimmable={dimmable}")],
            Self::Cover => Vec::new(),
            Self::Climate {
                heat,
                cool,
                fan,
                standalone,
            } => vec![
                format!("heat={heat}"),
                format!("cool={cool}"),
                format!("fan={fan}"),
                format!("standalone={standalone}"),
            ],
            Self::Sensor { class } => vec![format!("class={class}")],
        }
    }

    pub fn platform(&self) -> Platform {
        match self {
            Self::Light { .. } => Platform::Light,
            Self::Cover => Platform::Cover,
            Self::Climate { .. } => Platform::Climate,
            Self::Sensor { .. } => Platform::Sensor,
        }
    }
}

/// A device definition as the operator edits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Unique within a platform.
    pub key: String,
    #[serde(default)]
    pub name: String,
    /// `where` for light/cover/sensor, `zone` for climate.
    pub address: String,
    #[serde(flatten)]
    pub kind: DeviceKind,
}

impl DeviceRecord {
    /// Build a record with the platform's default payload.
    pub fn new(
        platform: Platform,
        key: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            address: address.into(),
            kind: DeviceKind::default_for(platform),
        }
    }

    pub fn platform(&self) -> Platform {
        self.kind.platform()
    }

    /// Reject records the server would refuse outright.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.key.trim().is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "Field `key` is required.".into(),
            });
        }
        if self.address.trim().is_empty() {
            return Err(CoreError::ValidationFailed {
                message: format!(
                    "Field `{}` is required.",
                    self.platform().address_field()
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn climate_defaults_to_all_modes() {
        let rec = DeviceRecord::new(Platform::Climate, "zone_1", "Zone 1", "1");
        assert_eq!(
            rec.kind,
            DeviceKind::Climate {
                heat: true,
                cool: true,
                fan: true,
                standalone: true
            }
        );
    }

    #[test]
    fn climate_deserializes_missing_flags_as_true() {
        let rec: DeviceRecord = serde_json::from_value(json!({
            "platform": "climate",
            "key": "zone_2",
            "address": "2",
            "cool": false
        }))
        .unwrap();
        assert_eq!(
            rec.kind,
            DeviceKind::Climate {
                heat: true,
                cool: false,
                fan: true,
                standalone: true
            }
        );
        assert_eq!(rec.name, "");
    }

    #[test]
    fn light_has_no_foreign_fields() {
        let rec = DeviceRecord::new(Platform::Light, "hall", "Hall", "11");
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(
            value,
            json!({
                "platform": "light",
                "key": "hall",
                "name": "Hall",
                "address": "11",
                "dimmable": false
            })
        );
        assert!(value.get("class").is_none());
        assert!(value.get("heat").is_none());
    }

    #[test]
    fn validate_requires_key_and_address() {
        let mut rec = DeviceRecord::new(Platform::Climate, " ", "Zone", "3");
        assert!(matches!(
            rec.validate(),
            Err(CoreError::ValidationFailed { .. })
        ));

        rec.key = "zone_3".into();
        rec.address = String::new();
        let err = rec.validate().unwrap_err();
        assert!(err.to_string().contains("zone"), "got: {err}");

        rec.address = "3".into();
        assert!(rec.validate().is_ok());
    }

    #[test]
    fn options_follow_schema_order() {
        assert!(DeviceKind::Cover.options().is_empty());
        assert_eq!(
            DeviceKind::default_for(Platform::Climate).options(),
            vec!["heat=true", "cool=true", "fan=true", "standalone=true"]
        );
        assert_eq!(
            DeviceKind::default_for(Platform::Sensor).options(),
            vec!["class=power"]
        );
    }
}
