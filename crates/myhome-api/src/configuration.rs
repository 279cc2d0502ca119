// Device configuration endpoints
//
// Reads are gateway-scoped through a query parameter; writes carry the
// gateway in the JSON body and answer with the full refreshed listing.

use tracing::debug;

use crate::client::MyHomeClient;
use crate::error::Error;
use crate::models::{
    ConfigurationResponse, DeleteDeviceRequest, DeviceWriteRequest, DeviceWriteResponse,
};

impl MyHomeClient {
    /// Fetch the configured devices of a gateway.
    ///
    /// `GET /api/myhome/configuration?gateway={mac}`
    pub async fn get_configuration(&self, gateway: &str) -> Result<ConfigurationResponse, Error> {
        let mut url = self.api_url("configuration")?;
        url.query_pairs_mut().append_pair("gateway", gateway);
        debug!(gateway, "loading configuration");
        self.get(url).await
    }

    /// Create or replace one configured device.
    ///
    /// `POST /api/myhome/configuration/device`. The server sanitizes the
    /// key; the response carries the key actually stored.
    pub async fn upsert_device(
        &self,
        request: &DeviceWriteRequest,
    ) -> Result<DeviceWriteResponse, Error> {
        let url = self.api_url("configuration/device")?;
        debug!(
            gateway = %request.gateway,
            platform = %request.platform,
            key = %request.key,
            "writing device"
        );
        self.post(url, request).await
    }

    /// Remove one configured device.
    ///
    /// `POST /api/myhome/configuration/device_delete`
    pub async fn delete_device(
        &self,
        request: &DeleteDeviceRequest,
    ) -> Result<ConfigurationResponse, Error> {
        let url = self.api_url("configuration/device_delete")?;
        debug!(
            gateway = %request.gateway,
            platform = %request.platform,
            key = %request.key,
            "deleting device"
        );
        self.post(url, request).await
    }
}
