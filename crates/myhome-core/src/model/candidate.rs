// ── Discovery candidates ──
//
// A candidate is a discovered-but-not-imported endpoint the operator can
// edit before import. Its identity derives from the discovered address,
// never from the editable key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::device::{DeviceKind, DeviceRecord};
use super::platform::Platform;
use crate::error::CoreError;

// ── CandidateId ─────────────────────────────────────────────────────

/// Natural key of a discovered endpoint: `"{platform}:{address}"`.
///
/// Ordering is plain string ordering, which is the stable display order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(String);

impl CandidateId {
    pub fn new(platform: Platform, address: &str) -> Self {
        Self(format!("{platform}:{address}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CandidateId {
    type Err = CoreError;

    /// Parse `platform:address`, normalizing the platform spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (platform, address) = s.split_once(':').ok_or_else(|| CoreError::ValidationFailed {
            message: format!("candidate id `{s}` must look like `platform:address`"),
        })?;
        let platform: Platform = platform.parse().map_err(|_| CoreError::ValidationFailed {
            message: format!("unknown platform `{platform}` in candidate id `{s}`"),
        })?;
        if address.is_empty() {
            return Err(CoreError::ValidationFailed {
                message: format!("candidate id `{s}` has an empty address"),
            });
        }
        Ok(Self::new(platform, address))
    }
}

// ── CandidateDraft ──────────────────────────────────────────────────

/// An editable, not-yet-committed device built from a discovered address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDraft {
    pub id: CandidateId,
    /// Opted in for bulk import.
    pub selected: bool,
    #[serde(flatten)]
    pub record: DeviceRecord,
}

impl CandidateDraft {
    pub fn platform(&self) -> Platform {
        self.record.platform()
    }

    pub fn address(&self) -> &str {
        &self.record.address
    }
}

/// Synthesize the draft shown for a freshly discovered address.
///
/// Deterministic: the same inputs always produce the same draft, so a
/// re-merge never perturbs drafts the operator left untouched.
pub fn default_candidate(platform: Platform, address: &str) -> CandidateDraft {
    CandidateDraft {
        id: CandidateId::new(platform, address),
        selected: true,
        record: DeviceRecord {
            key: format!("discovered_{}_{address}", platform.discovery_label()),
            name: format!("{} {address}", platform.title()),
            address: address.to_owned(),
            kind: DeviceKind::default_for(platform),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::SensorClass;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_candidate_is_deterministic() {
        for platform in Platform::ALL {
            assert_eq!(
                default_candidate(platform, "21"),
                default_candidate(platform, "21")
            );
        }
    }

    #[test]
    fn sensor_candidate_uses_power_naming() {
        let draft = default_candidate(Platform::Sensor, "51");
        assert_eq!(draft.id.as_str(), "sensor:51");
        assert_eq!(draft.record.key, "discovered_power_51");
        assert_eq!(draft.record.name, "Power 51");
        assert_eq!(
            draft.record.kind,
            DeviceKind::Sensor {
                class: SensorClass::Power
            }
        );
        assert!(draft.selected);
    }

    #[test]
    fn light_and_climate_defaults() {
        let light = default_candidate(Platform::Light, "12");
        assert_eq!(light.record.key, "discovered_light_12");
        assert_eq!(light.record.name, "Light 12");
        assert_eq!(light.record.kind, DeviceKind::Light { dimmable: false });

        let climate = default_candidate(Platform::Climate, "3");
        assert_eq!(climate.record.name, "Climate 3");
        assert_eq!(climate.record.kind, DeviceKind::default_for(Platform::Climate));
    }

    #[test]
    fn candidate_id_parses_and_normalizes() {
        let id: CandidateId = "Light:12".parse().unwrap();
        assert_eq!(id, CandidateId::new(Platform::Light, "12"));

        let hashed: CandidateId = "cover:0112#4#01".parse().unwrap();
        assert_eq!(hashed.as_str(), "cover:0112#4#01");

        assert!("12".parse::<CandidateId>().is_err());
        assert!("switch:12".parse::<CandidateId>().is_err());
        assert!("light:".parse::<CandidateId>().is_err());
    }
}
