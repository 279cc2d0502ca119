// ── Remote API seam ──
//
// The controller talks to the management API only through `GatewayApi`,
// in domain types. `MyHomeClient` is the production implementation;
// tests substitute scripted in-memory fakes.

use async_trait::async_trait;
use myhome_api::MyHomeClient;

use crate::convert::{delete_request, write_request};
use crate::error::CoreError;
use crate::model::{DeviceMap, DeviceRecord, DiscoverySnapshot, Gateway, Platform};

/// A response tagged with the gateway its request was issued against.
///
/// Callers compare `gateway` with the current selection and drop the
/// value when they differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayScoped<T> {
    pub gateway: String,
    pub value: T,
}

impl<T> GatewayScoped<T> {
    pub fn new(gateway: impl Into<String>, value: T) -> Self {
        Self {
            gateway: gateway.into(),
            value,
        }
    }

    pub fn is_for(&self, mac: Option<&str>) -> bool {
        mac == Some(self.gateway.as_str())
    }
}

/// Result of a create/replace write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDevice {
    pub platform: Platform,
    /// Key as stored by the server, which may sanitize the requested one.
    pub key: String,
    /// Full post-write listing, when the server returned one.
    pub devices: Option<DeviceMap>,
}

/// Contract the session requires from the management API.
#[async_trait]
pub trait GatewayApi: Send + Sync {
    async fn list_gateways(&self) -> Result<Vec<Gateway>, CoreError>;

    /// Returns the passive-discovery state the server reports afterwards.
    async fn set_passive_discovery(
        &self,
        gateway: &str,
        enabled: bool,
    ) -> Result<GatewayScoped<bool>, CoreError>;

    async fn activation_discovery(
        &self,
        gateway: &str,
        clear: bool,
    ) -> Result<GatewayScoped<DiscoverySnapshot>, CoreError>;

    /// `None` when the server omitted the device listing.
    async fn configuration(
        &self,
        gateway: &str,
    ) -> Result<GatewayScoped<Option<DeviceMap>>, CoreError>;

    async fn save_device(
        &self,
        gateway: &str,
        record: &DeviceRecord,
    ) -> Result<GatewayScoped<SavedDevice>, CoreError>;

    async fn delete_device(
        &self,
        gateway: &str,
        platform: Platform,
        key: &str,
    ) -> Result<GatewayScoped<Option<DeviceMap>>, CoreError>;
}

#[async_trait]
impl GatewayApi for MyHomeClient {
    async fn list_gateways(&self) -> Result<Vec<Gateway>, CoreError> {
        let gateways = MyHomeClient::list_gateways(self).await?;
        Ok(gateways.into_iter().map(Gateway::from).collect())
    }

    async fn set_passive_discovery(
        &self,
        gateway: &str,
        enabled: bool,
    ) -> Result<GatewayScoped<bool>, CoreError> {
        let resp = self.set_discovery_by_activation(gateway, enabled).await?;
        Ok(GatewayScoped::new(gateway, resp.enabled))
    }

    async fn activation_discovery(
        &self,
        gateway: &str,
        clear: bool,
    ) -> Result<GatewayScoped<DiscoverySnapshot>, CoreError> {
        let resp = MyHomeClient::activation_discovery(self, gateway, clear).await?;
        let mut snapshot = DiscoverySnapshot::from(resp);
        if snapshot.gateway.is_empty() {
            gateway.clone_into(&mut snapshot.gateway);
        }
        Ok(GatewayScoped::new(gateway, snapshot))
    }

    async fn configuration(
        &self,
        gateway: &str,
    ) -> Result<GatewayScoped<Option<DeviceMap>>, CoreError> {
        let resp = self.get_configuration(gateway).await?;
        Ok(GatewayScoped::new(gateway, resp.devices.map(DeviceMap::from)))
    }

    async fn save_device(
        &self,
        gateway: &str,
        record: &DeviceRecord,
    ) -> Result<GatewayScoped<SavedDevice>, CoreError> {
        let resp = self.upsert_device(&write_request(gateway, record)).await?;
        let platform = resp.platform.parse().unwrap_or_else(|_| record.platform());
        Ok(GatewayScoped::new(
            gateway,
            SavedDevice {
                platform,
                key: resp.key,
                devices: resp.devices.map(DeviceMap::from),
            },
        ))
    }

    async fn delete_device(
        &self,
        gateway: &str,
        platform: Platform,
        key: &str,
    ) -> Result<GatewayScoped<Option<DeviceMap>>, CoreError> {
        let resp = MyHomeClient::delete_device(self, &delete_request(gateway, platform, key)).await?;
        Ok(GatewayScoped::new(gateway, resp.devices.map(DeviceMap::from)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_value_matches_only_its_gateway() {
        let scoped = GatewayScoped::new("00:03:50:aa:bb:cc", 3_usize);
        assert!(scoped.is_for(Some("00:03:50:aa:bb:cc")));
        assert!(!scoped.is_for(Some("00:03:50:dd:ee:ff")));
        assert!(!scoped.is_for(None));
    }
}
