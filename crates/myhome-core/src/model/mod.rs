// ── Domain model ──
//
// Typed representation of gateways, device records, discovery results
// and the configured device set. Wire shapes live in `myhome-api`;
// `convert` bridges the two.

pub mod candidate;
pub mod configured;
pub mod device;
pub mod gateway;
pub mod platform;
pub mod snapshot;

pub use candidate::{CandidateDraft, CandidateId, default_candidate};
pub use configured::{ConfiguredDevice, DeviceMap};
pub use device::{DeviceKind, DeviceRecord};
pub use gateway::{Gateway, same_mac};
pub use platform::{Platform, SensorClass};
pub use snapshot::DiscoverySnapshot;
