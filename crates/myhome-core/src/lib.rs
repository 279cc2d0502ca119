// myhome-core: Discovery reconciliation and device onboarding between
// myhome-api and its consumers (CLI).

pub mod api;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod import;
pub mod model;
pub mod reconcile;
pub mod registry;
pub mod sequencer;
pub mod status;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use api::{GatewayApi, GatewayScoped, SavedDevice};
pub use config::{ConnectionConfig, TlsVerification};
pub use controller::{Controller, Refresh};
pub use error::{CoreError, ImportFailure};
pub use import::{
    ImportOrchestrator, ImportOutcome, ImportProgress, ImportReport, ImportedDevice,
    ProgressObserver,
};
pub use reconcile::{DraftEdit, DraftField, DraftSet};
pub use registry::GatewayRegistry;
pub use sequencer::{MutationSequencer, OpClass};
pub use status::StatusLine;
pub use view::ConfigurationView;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    CandidateDraft, CandidateId, ConfiguredDevice, DeviceKind, DeviceMap, DeviceRecord,
    DiscoverySnapshot, Gateway, Platform, SensorClass, default_candidate,
};
