// ── Session controller ──
//
// Owns the operator session for one Home Assistant instance: the gateway
// registry, the configuration view, the latest discovery snapshot and
// the draft set. Read-models are published through `watch` channels.
//
// Every gateway-scoped response is checked against the selection at the
// time it resolves; responses for a gateway that is no longer selected
// are dropped and reported as `Refresh::Stale`.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use myhome_api::MyHomeClient;

use crate::api::{GatewayApi, SavedDevice};
use crate::config::ConnectionConfig;
use crate::error::CoreError;
use crate::import::{ImportOrchestrator, ImportOutcome, NOTHING_SELECTED, ProgressObserver};
use crate::model::{
    CandidateDraft, DeviceMap, DeviceRecord, DiscoverySnapshot, Gateway, Platform,
};
use crate::reconcile::{self, DraftEdit, DraftSet};
use crate::registry::GatewayRegistry;
use crate::sequencer::{MutationSequencer, OpClass};
use crate::status::StatusLine;
use crate::view::ConfigurationView;

const DISCOVERY_CLEARED: &str = "Automatic discovery list cleared.";

/// Whether a gateway-scoped result was applied to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    Applied,
    /// The selection changed while the request was outstanding.
    Stale,
}

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    api: Arc<dyn GatewayApi>,
    sequencer: MutationSequencer,
    registry: watch::Sender<GatewayRegistry>,
    view: watch::Sender<ConfigurationView>,
    discovery: watch::Sender<Option<DiscoverySnapshot>>,
    drafts: watch::Sender<DraftSet>,
    status: watch::Sender<StatusLine>,
}

impl Controller {
    pub fn new(api: Arc<dyn GatewayApi>) -> Self {
        let (registry, _) = watch::channel(GatewayRegistry::default());
        let (view, _) = watch::channel(ConfigurationView::default());
        let (discovery, _) = watch::channel(None);
        let (drafts, _) = watch::channel(DraftSet::new());
        let (status, _) = watch::channel(StatusLine::default());

        Self {
            inner: Arc::new(ControllerInner {
                api,
                sequencer: MutationSequencer::default(),
                registry,
                view,
                discovery,
                drafts,
                status,
            }),
        }
    }

    /// Build a controller backed by the HTTP client. Does not contact the
    /// server; call [`load_gateways`](Self::load_gateways) next.
    pub fn connect(config: &ConnectionConfig) -> Result<Self, CoreError> {
        let client = MyHomeClient::new(config.url.clone(), &config.token, &config.transport())?;
        debug!(url = %config.url, "management API client ready");
        Ok(Self::new(Arc::new(client)))
    }

    /// Whether an operation of `op` is outstanding. Callers should not
    /// trigger the same class again while this is `true`.
    pub fn is_in_flight(&self, op: OpClass) -> bool {
        self.inner.sequencer.is_in_flight(op)
    }

    // ── Gateways ─────────────────────────────────────────────────

    /// Prefer `mac` when the gateway list is (re)loaded.
    pub fn preselect_gateway(&self, mac: &str) {
        self.inner.registry.send_modify(|reg| reg.preselect(mac));
    }

    /// Fetch the gateway list, settle the selection and sync it.
    ///
    /// A preselected gateway must be listed, otherwise nothing is synced
    /// and `GatewayNotFound` is returned. Without one, the current
    /// selection is kept if the gateway is still listed, else the first
    /// one is selected. Failures of the follow-up loads are recorded on
    /// the status line, not returned.
    pub async fn load_gateways(&self) -> Result<Option<Gateway>, CoreError> {
        let guard = self.inner.sequencer.begin(OpClass::GatewayLoad);
        self.inner.status.send_modify(StatusLine::clear);

        let gateways = match self.inner.api.list_gateways().await {
            Ok(gateways) => gateways,
            Err(e) => {
                self.report_error(format!("Error loading gateways: {e}"));
                return Err(e);
            }
        };
        debug!(count = gateways.len(), "gateways loaded");

        let previous = self.selected_mac();
        let mut settled = Ok(None);
        self.inner.registry.send_modify(|reg| {
            let wanted = reg.take_preselection();
            reg.replace(gateways);
            settled = match wanted {
                Some(mac) => match reg.select(Some(&mac)) {
                    Some(gateway) => Ok(Some(gateway.clone())),
                    None => Err(CoreError::GatewayNotFound { mac }),
                },
                None => {
                    let keep = reg.selected_mac().map(str::to_owned);
                    Ok(reg.select(keep.as_deref()).cloned())
                }
            };
        });

        if self.selected_mac() != previous {
            self.reset_gateway_state();
        }
        let selected = match settled {
            Ok(selected) => selected,
            Err(e) => {
                warn!(error = %e, "requested gateway is not listed");
                self.report_error(e.to_string());
                return Err(e);
            }
        };
        if selected.is_some() {
            self.sync_selection().await;
        }
        drop(guard);
        Ok(selected)
    }

    /// Switch to another gateway and sync it.
    pub async fn select_gateway(&self, mac: &str) -> Result<Gateway, CoreError> {
        let previous = self.selected_mac();
        let mut selected = None;
        self.inner.registry.send_modify(|reg| {
            selected = reg.select(Some(mac)).cloned();
        });
        let gateway = selected.ok_or_else(|| CoreError::GatewayNotFound {
            mac: mac.to_owned(),
        })?;

        if previous.as_deref() != Some(gateway.mac.as_str()) {
            self.reset_gateway_state();
        }
        self.sync_selection().await;
        Ok(gateway)
    }

    /// Turn passive discovery on or off for a gateway.
    pub async fn set_passive_discovery(
        &self,
        mac: &str,
        enabled: bool,
    ) -> Result<Gateway, CoreError> {
        let scoped = self.inner.api.set_passive_discovery(mac, enabled).await?;
        let mut updated = None;
        self.inner.registry.send_modify(|reg| {
            updated = reg.set_passive_discovery(&scoped.gateway, scoped.value).cloned();
        });
        updated.ok_or_else(|| CoreError::GatewayNotFound {
            mac: mac.to_owned(),
        })
    }

    /// Advisory enable of passive discovery on the selection. A failure
    /// is logged and otherwise ignored; the discovery refresh that follows
    /// reports whatever is wrong.
    async fn ensure_passive_discovery(&self) {
        let Some(mac) = self.selected_mac() else {
            return;
        };
        match self.inner.api.set_passive_discovery(&mac, true).await {
            Ok(scoped) if self.is_current(&scoped.gateway) => {
                self.inner.registry.send_modify(|reg| {
                    reg.set_passive_discovery(&scoped.gateway, scoped.value);
                });
            }
            Ok(_) => debug!(gateway = %mac, "discarding stale passive discovery response"),
            Err(e) => warn!(gateway = %mac, error = %e, "enabling passive discovery failed"),
        }
    }

    /// Advisory enable, configuration reload, discovery refresh.
    async fn sync_selection(&self) {
        self.ensure_passive_discovery().await;
        if let Err(e) = self.reload_configuration().await {
            debug!(error = %e, "configuration load failed during gateway sync");
        }
        if let Err(e) = self.fetch_discovery(false).await {
            debug!(error = %e, "discovery refresh failed during gateway sync");
        }
    }

    // ── Configuration ────────────────────────────────────────────

    /// Reload the configured devices of the selected gateway.
    ///
    /// On success the view is replaced wholesale (an omitted listing
    /// counts as empty). On failure the previous view is kept and the
    /// error is both recorded and returned.
    pub async fn reload_configuration(&self) -> Result<Refresh, CoreError> {
        let _guard = self.inner.sequencer.begin(OpClass::ConfigurationLoad);
        let mac = self.current_gateway()?;

        match self.inner.api.configuration(&mac).await {
            Ok(scoped) if self.is_current(&scoped.gateway) => {
                let devices = scoped.value.unwrap_or_default();
                debug!(gateway = %mac, count = devices.total(), "configuration loaded");
                self.inner.view.send_modify(|view| view.replace(&mac, devices));
                Ok(Refresh::Applied)
            }
            Ok(_) => {
                debug!(gateway = %mac, "discarding stale configuration");
                Ok(Refresh::Stale)
            }
            Err(_) if !self.is_current(&mac) => {
                debug!(gateway = %mac, "ignoring configuration error for previous gateway");
                Ok(Refresh::Stale)
            }
            Err(e) => {
                self.report_error(e.to_string());
                Err(e)
            }
        }
    }

    /// Create or replace a device on the selected gateway.
    ///
    /// Adopts the listing the server returns, then reloads.
    pub async fn create_device(&self, record: &DeviceRecord) -> Result<SavedDevice, CoreError> {
        let _guard = self.inner.sequencer.begin(OpClass::Save);
        self.inner.status.send_modify(StatusLine::clear);
        let mac = self.current_gateway()?;

        let result = match record.validate() {
            Ok(()) => self.inner.api.save_device(&mac, record).await,
            Err(e) => Err(e),
        };
        let saved = match result {
            Ok(scoped) => scoped.value,
            Err(e) => {
                self.report_error(e.to_string());
                return Err(e);
            }
        };

        info!(gateway = %mac, platform = %saved.platform, key = %saved.key, "device saved");
        self.adopt_listing(&mac, saved.devices.clone());
        self.report_notice(format!("Device saved ({}:{}).", saved.platform, saved.key));
        if let Err(e) = self.reload_configuration().await {
            debug!(error = %e, "reload after save failed");
        }
        Ok(saved)
    }

    /// Remove a device from the selected gateway.
    ///
    /// Adopts the post-delete listing the server returns, then reloads.
    pub async fn delete_device(&self, platform: Platform, key: &str) -> Result<(), CoreError> {
        let _guard = self.inner.sequencer.begin(OpClass::Save);
        self.inner.status.send_modify(StatusLine::clear);
        let mac = self.current_gateway()?;

        let devices = match self.inner.api.delete_device(&mac, platform, key).await {
            Ok(scoped) => scoped.value,
            Err(e) => {
                self.report_error(e.to_string());
                return Err(e);
            }
        };

        info!(gateway = %mac, %platform, key, "device removed");
        self.adopt_listing(&mac, devices);
        self.report_notice(format!("Device removed ({platform}:{key})."));
        if let Err(e) = self.reload_configuration().await {
            debug!(error = %e, "reload after delete failed");
        }
        Ok(())
    }

    /// Replace the view with a listing returned by a write, if the write
    /// returned one and the gateway is still selected.
    fn adopt_listing(&self, mac: &str, devices: Option<DeviceMap>) {
        if let Some(devices) = devices.filter(|_| self.is_current(mac)) {
            self.inner.view.send_modify(|view| view.replace(mac, devices));
        }
    }

    // ── Discovery ────────────────────────────────────────────────

    /// Explicit discovery refresh. With `clear` the gateway drops its
    /// pending list first.
    pub async fn refresh_discovery(&self, clear: bool) -> Result<Refresh, CoreError> {
        self.inner.status.send_modify(StatusLine::clear);
        self.fetch_discovery(clear).await
    }

    async fn fetch_discovery(&self, clear: bool) -> Result<Refresh, CoreError> {
        let _guard = self.inner.sequencer.begin(OpClass::DiscoveryRefresh);
        let mac = self.current_gateway()?;

        match self.inner.api.activation_discovery(&mac, clear).await {
            Ok(scoped) if self.is_current(&scoped.gateway) => {
                let snapshot = scoped.value;
                debug!(gateway = %mac, candidates = snapshot.total(), clear, "discovery refreshed");
                self.inner.registry.send_modify(|reg| {
                    reg.set_passive_discovery(&mac, snapshot.enabled);
                });
                self.inner
                    .drafts
                    .send_modify(|drafts| *drafts = reconcile::merge(Some(&snapshot), drafts));
                self.inner.discovery.send_replace(Some(snapshot));
                if clear {
                    self.report_notice(DISCOVERY_CLEARED.to_owned());
                }
                Ok(Refresh::Applied)
            }
            Ok(_) => {
                debug!(gateway = %mac, "discarding stale discovery snapshot");
                Ok(Refresh::Stale)
            }
            Err(_) if !self.is_current(&mac) => {
                debug!(gateway = %mac, "ignoring discovery error for previous gateway");
                Ok(Refresh::Stale)
            }
            Err(e) => {
                self.report_error(e.to_string());
                Err(e)
            }
        }
    }

    // ── Drafts and import ────────────────────────────────────────

    /// Apply one operator edit. `Ok(false)` when the candidate is gone.
    pub fn edit_draft(&self, edit: &DraftEdit) -> Result<bool, CoreError> {
        let mut result = Ok(false);
        self.inner.drafts.send_if_modified(|drafts| {
            result = reconcile::apply_edit(drafts, edit);
            matches!(result, Ok(true))
        });
        result
    }

    /// Import every selected draft, then resync the configuration view
    /// and the discovery snapshot whatever the outcome.
    ///
    /// With nothing selected no remote call is made.
    pub async fn import_selected(
        &self,
        observer: Option<ProgressObserver<'_>>,
    ) -> Result<ImportOutcome, CoreError> {
        let mac = self.current_gateway()?;
        let selected = self.selected_drafts();
        if selected.is_empty() {
            self.inner.status.send_replace(StatusLine {
                error: None,
                notice: Some(NOTHING_SELECTED.to_owned()),
            });
            return Ok(ImportOutcome::NothingSelected);
        }

        let _guard = self.inner.sequencer.begin(OpClass::Save);
        self.inner.status.send_modify(StatusLine::clear);

        let outcome = ImportOrchestrator::new(self.inner.api.as_ref(), &mac)
            .run(&selected, observer)
            .await;

        if let Err(e) = self.reload_configuration().await {
            debug!(error = %e, "reload after import failed");
        }
        if let Err(e) = self.fetch_discovery(false).await {
            debug!(error = %e, "discovery refresh after import failed");
        }

        if let Some(notice) = outcome.notice() {
            self.report_notice(notice);
        }
        if let Some(report) = outcome.report().filter(|r| !r.is_complete()) {
            let aggregate = CoreError::PartialImportFailure {
                imported: report.imported_count(),
                failures: report.failures.clone(),
            };
            self.report_error(aggregate.to_string());
        }
        Ok(outcome)
    }

    // ── Snapshots ────────────────────────────────────────────────

    pub fn gateways(&self) -> Vec<Gateway> {
        self.inner.registry.borrow().list().to_vec()
    }

    pub fn selected_gateway(&self) -> Option<Gateway> {
        self.inner.registry.borrow().selected().cloned()
    }

    pub fn configuration(&self) -> ConfigurationView {
        self.inner.view.borrow().clone()
    }

    pub fn discovery(&self) -> Option<DiscoverySnapshot> {
        self.inner.discovery.borrow().clone()
    }

    pub fn drafts(&self) -> DraftSet {
        self.inner.drafts.borrow().clone()
    }

    pub fn selected_drafts(&self) -> Vec<CandidateDraft> {
        reconcile::selected(&self.inner.drafts.borrow())
    }

    pub fn status(&self) -> StatusLine {
        self.inner.status.borrow().clone()
    }

    // ── Subscriptions ────────────────────────────────────────────

    pub fn subscribe_registry(&self) -> watch::Receiver<GatewayRegistry> {
        self.inner.registry.subscribe()
    }

    pub fn subscribe_configuration(&self) -> watch::Receiver<ConfigurationView> {
        self.inner.view.subscribe()
    }

    pub fn subscribe_discovery(&self) -> watch::Receiver<Option<DiscoverySnapshot>> {
        self.inner.discovery.subscribe()
    }

    pub fn subscribe_drafts(&self) -> watch::Receiver<DraftSet> {
        self.inner.drafts.subscribe()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<StatusLine> {
        self.inner.status.subscribe()
    }

    // ── Internals ────────────────────────────────────────────────

    fn selected_mac(&self) -> Option<String> {
        self.inner.registry.borrow().selected_mac().map(str::to_owned)
    }

    fn current_gateway(&self) -> Result<String, CoreError> {
        self.inner
            .registry
            .borrow()
            .selected()
            .map(|g| g.mac.clone())
            .ok_or(CoreError::NoGatewaySelected)
    }

    fn is_current(&self, mac: &str) -> bool {
        self.inner.registry.borrow().is_selected(mac)
    }

    /// Drop everything tied to the previous selection.
    fn reset_gateway_state(&self) {
        self.inner.view.send_modify(ConfigurationView::clear);
        self.inner.discovery.send_replace(None);
        self.inner.drafts.send_replace(DraftSet::new());
    }

    fn report_error(&self, message: String) {
        self.inner.status.send_modify(|s| s.error = Some(message));
    }

    fn report_notice(&self, message: String) {
        self.inner.status.send_modify(|s| s.notice = Some(message));
    }
}
