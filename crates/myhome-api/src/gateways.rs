// Gateway endpoints
//
// Gateway listing is global; enabling passive discovery targets one
// gateway by MAC.

use tracing::debug;

use crate::client::MyHomeClient;
use crate::error::Error;
use crate::models::{
    GatewayInfo, GatewayListResponse, PassiveDiscoveryRequest, PassiveDiscoveryResponse,
};

impl MyHomeClient {
    /// List all configured gateways.
    ///
    /// `GET /api/myhome/gateways`
    pub async fn list_gateways(&self) -> Result<Vec<GatewayInfo>, Error> {
        let url = self.api_url("gateways")?;
        debug!("listing gateways");
        let resp: GatewayListResponse = self.get(url).await?;
        Ok(resp.gateways)
    }

    /// Turn discovery-by-activation on or off for a gateway.
    ///
    /// `POST /api/myhome/discovery_by_activation` with `{"gateway", "enabled"}`
    pub async fn set_discovery_by_activation(
        &self,
        gateway: &str,
        enabled: bool,
    ) -> Result<PassiveDiscoveryResponse, Error> {
        let url = self.api_url("discovery_by_activation")?;
        debug!(gateway, enabled, "setting discovery by activation");
        self.post(url, &PassiveDiscoveryRequest { gateway, enabled })
            .await
    }
}
