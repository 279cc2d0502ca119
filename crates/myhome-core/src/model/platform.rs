// ── Platform and sensor class enums ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Device category; determines the field schema of a record.
///
/// Declaration order is the fixed traversal order used when merging
/// discovery results (light, cover, climate, sensor).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Platform {
    Light,
    Cover,
    Climate,
    Sensor,
}

impl Platform {
    pub const ALL: [Self; 4] = [Self::Light, Self::Cover, Self::Climate, Self::Sensor];

    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Label used in synthesized keys. Discovered sensors are always
    /// power meters, hence `power` rather than `sensor`.
    pub fn discovery_label(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Cover => "cover",
            Self::Climate => "climate",
            Self::Sensor => "power",
        }
    }

    /// Title used in synthesized display names.
    pub fn title(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Cover => "Cover",
            Self::Climate => "Climate",
            Self::Sensor => "Power",
        }
    }

    /// Wire name of the address field: `zone` for climate, `where` otherwise.
    pub fn address_field(self) -> &'static str {
        match self {
            Self::Climate => "zone",
            Self::Light | Self::Cover | Self::Sensor => "where",
        }
    }
}

/// Measurement class of a sensor record.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SensorClass {
    #[default]
    Power,
    Energy,
    Temperature,
    Illuminance,
}

impl SensorClass {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}
