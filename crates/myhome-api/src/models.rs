// Wire types for the management API.
//
// These mirror the JSON exactly (including the platform-dependent
// `where` / `zone` split). `myhome-core` converts them into its typed
// domain model; nothing here is interpreted beyond decoding.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ── Gateways ────────────────────────────────────────────────────────

/// `GET gateways`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayListResponse {
    #[serde(default)]
    pub gateways: Vec<GatewayInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayInfo {
    pub mac: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub discovery_by_activation: bool,
}

/// `POST discovery_by_activation`
#[derive(Debug, Clone, Serialize)]
pub(crate) struct PassiveDiscoveryRequest<'a> {
    pub gateway: &'a str,
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PassiveDiscoveryResponse {
    pub gateway: String,
    #[serde(default)]
    pub enabled: bool,
}

// ── Activation discovery ────────────────────────────────────────────

/// `POST activation_discovery`
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ActivationDiscoveryRequest<'a> {
    pub gateway: &'a str,
    pub clear: bool,
}

/// Endpoints observed by activation that are not configured yet.
///
/// The server also returns raw and already-mapped lists plus a YAML
/// snippet; only the `new_*` lists and flags are decoded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivationDiscoveryResponse {
    pub gateway: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, deserialize_with = "addresses")]
    pub new_light: Vec<String>,
    #[serde(default, deserialize_with = "addresses")]
    pub new_cover: Vec<String>,
    #[serde(default, deserialize_with = "addresses")]
    pub new_climate: Vec<String>,
    #[serde(default, deserialize_with = "addresses")]
    pub new_power: Vec<String>,
    #[serde(default)]
    pub cleared: bool,
}

// ── Configuration ───────────────────────────────────────────────────

/// `GET configuration?gateway=` and `POST configuration/device_delete`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigurationResponse {
    pub gateway: Option<String>,
    pub devices: Option<DeviceListing>,
}

/// Configured devices grouped by platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceListing {
    #[serde(default)]
    pub light: Vec<RawConfiguredDevice>,
    #[serde(default)]
    pub cover: Vec<RawConfiguredDevice>,
    #[serde(default)]
    pub climate: Vec<RawConfiguredDevice>,
    #[serde(default)]
    pub sensor: Vec<RawConfiguredDevice>,
}

/// One configured device as the server reports it. Platform-specific
/// fields are present only for their platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawConfiguredDevice {
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "where")]
    pub where_: Option<String>,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default, deserialize_with = "opaque")]
    pub who: Option<String>,
    #[serde(default, deserialize_with = "opaque")]
    pub interface: Option<String>,
    #[serde(default, deserialize_with = "opaque")]
    pub manufacturer: Option<String>,
    #[serde(default, deserialize_with = "opaque")]
    pub model: Option<String>,
    #[serde(default)]
    pub dimmable: Option<bool>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub heat: Option<bool>,
    #[serde(default)]
    pub cool: Option<bool>,
    #[serde(default)]
    pub fan: Option<bool>,
    #[serde(default)]
    pub standalone: Option<bool>,
}

/// `POST configuration/device`
///
/// Exactly one of `where_` / `zone` is set, chosen by platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct DeviceWriteRequest {
    pub gateway: String,
    pub platform: String,
    pub key: String,
    pub name: String,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub where_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimmable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heat: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cool: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fan: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standalone: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceWriteResponse {
    pub platform: String,
    pub key: String,
    #[serde(default)]
    pub devices: Option<DeviceListing>,
}

/// `POST configuration/device_delete`
#[derive(Debug, Clone, Serialize)]
pub struct DeleteDeviceRequest {
    pub gateway: String,
    pub platform: String,
    pub key: String,
}

// ── Lenient decoders ────────────────────────────────────────────────

/// Render a scalar JSON value as a string; `null` becomes `None`.
fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Metadata fields are pass-through; the server may send numbers.
fn opaque<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(scalar_to_string))
}

/// Address lists may contain bare numbers (`[12, "#3"]`).
fn addresses<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw.into_iter().filter_map(scalar_to_string).collect())
}
