// Activation discovery endpoint

use tracing::debug;

use crate::client::MyHomeClient;
use crate::error::Error;
use crate::models::{ActivationDiscoveryRequest, ActivationDiscoveryResponse};

impl MyHomeClient {
    /// Read the endpoints a gateway has seen activated but that are not
    /// configured yet. With `clear = true` the pending list is dropped
    /// and the returned lists are empty.
    ///
    /// `POST /api/myhome/activation_discovery` with `{"gateway", "clear"}`
    pub async fn activation_discovery(
        &self,
        gateway: &str,
        clear: bool,
    ) -> Result<ActivationDiscoveryResponse, Error> {
        let url = self.api_url("activation_discovery")?;
        debug!(gateway, clear, "reading activation discovery results");
        self.post(url, &ActivationDiscoveryRequest { gateway, clear })
            .await
    }
}
