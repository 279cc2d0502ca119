// ── Gateway registry ──
//
// Known gateways plus the current selection. Pure state: remote calls
// are made by the controller, which feeds the results back in here.

use serde::Serialize;

use crate::model::{Gateway, same_mac};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GatewayRegistry {
    gateways: Vec<Gateway>,
    selected: Option<String>,
    #[serde(skip)]
    preselected: Option<String>,
}

impl GatewayRegistry {
    pub fn list(&self) -> &[Gateway] {
        &self.gateways
    }

    /// Look a gateway up by MAC, ignoring case and separators.
    pub fn get(&self, mac: &str) -> Option<&Gateway> {
        self.gateways.iter().find(|g| g.has_mac(mac))
    }

    pub fn selected(&self) -> Option<&Gateway> {
        self.selected.as_deref().and_then(|mac| self.get(mac))
    }

    /// MAC of the selection, in the server's form.
    pub fn selected_mac(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_selected(&self, mac: &str) -> bool {
        self.selected.as_deref().is_some_and(|s| same_mac(s, mac))
    }

    /// Ask for a gateway before the list is loaded. The next load must
    /// honour it or fail.
    pub fn preselect(&mut self, mac: impl Into<String>) {
        self.preselected = Some(mac.into());
    }

    /// Hand over the pending preselection, if any.
    pub fn take_preselection(&mut self) -> Option<String> {
        self.preselected.take()
    }

    /// Replace the list wholesale.
    ///
    /// The selection survives when its gateway is still present;
    /// otherwise it is cleared and the caller picks a new one.
    pub fn replace(&mut self, gateways: Vec<Gateway>) {
        self.gateways = gateways;
        self.selected = self.selected().map(|g| g.mac.clone());
    }

    /// Select a gateway; `None` picks the first one.
    ///
    /// An unknown MAC returns `None` and leaves the selection unchanged.
    /// The selected gateway is always marked as passively discovering.
    pub fn select(&mut self, mac: Option<&str>) -> Option<&Gateway> {
        let idx = match mac {
            Some(mac) => self.gateways.iter().position(|g| g.has_mac(mac))?,
            None if self.gateways.is_empty() => return None,
            None => 0,
        };
        let gateway = &mut self.gateways[idx];
        gateway.discovery_by_activation = true;
        self.selected = Some(gateway.mac.clone());
        Some(&self.gateways[idx])
    }

    /// Record the passive-discovery state the server reported.
    pub fn set_passive_discovery(&mut self, mac: &str, enabled: bool) -> Option<&Gateway> {
        let gateway = self.gateways.iter_mut().find(|g| g.has_mac(mac))?;
        gateway.discovery_by_activation = enabled;
        Some(gateway)
    }
}
