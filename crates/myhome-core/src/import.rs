// ── Bulk import ──
//
// Turns selected drafts into configured devices, one remote write at a
// time. A failed item is recorded and the loop moves on; nothing that
// succeeded is rolled back. Resynchronizing the read-models afterwards
// is the controller's job.

use tracing::{debug, info, warn};

use crate::api::GatewayApi;
use crate::error::{CoreError, ImportFailure};
use crate::model::{CandidateDraft, CandidateId, Platform};

/// Per-item progress, emitted in selection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportProgress {
    Started {
        index: usize,
        total: usize,
        id: CandidateId,
    },
    Succeeded {
        index: usize,
        total: usize,
        id: CandidateId,
        /// Key as stored by the server.
        key: String,
    },
    Failed {
        index: usize,
        total: usize,
        id: CandidateId,
        message: String,
    },
}

/// A draft that was written successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedDevice {
    pub id: CandidateId,
    pub platform: Platform,
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: Vec<ImportedDevice>,
    /// In selection order.
    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

pub const NOTHING_SELECTED: &str = "No selected devices to import.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Nothing was selected; no remote call was made.
    NothingSelected,
    Finished(ImportReport),
}

impl ImportOutcome {
    pub fn report(&self) -> Option<&ImportReport> {
        match self {
            Self::NothingSelected => None,
            Self::Finished(report) => Some(report),
        }
    }

    /// Status notice for this outcome, if any.
    pub fn notice(&self) -> Option<String> {
        match self {
            Self::NothingSelected => Some(NOTHING_SELECTED.to_owned()),
            Self::Finished(report) if report.imported_count() > 0 => Some(format!(
                "Import completed: {} devices.",
                report.imported_count()
            )),
            Self::Finished(_) => None,
        }
    }

    /// Fold into a `Result`: an empty selection becomes
    /// [`CoreError::ValidationSkipped`], any failed item
    /// [`CoreError::PartialImportFailure`].
    pub fn into_result(self) -> Result<ImportReport, CoreError> {
        match self {
            Self::NothingSelected => Err(CoreError::ValidationSkipped {
                reason: NOTHING_SELECTED.to_owned(),
            }),
            Self::Finished(report) if report.is_complete() => Ok(report),
            Self::Finished(report) => Err(CoreError::PartialImportFailure {
                imported: report.imported_count(),
                failures: report.failures,
            }),
        }
    }
}

/// Progress callback.
pub type ProgressObserver<'a> = &'a mut (dyn FnMut(ImportProgress) + Send);

/// Issues one create request per draft against one gateway.
pub struct ImportOrchestrator<'a> {
    api: &'a dyn GatewayApi,
    gateway: &'a str,
}

impl<'a> ImportOrchestrator<'a> {
    pub fn new(api: &'a dyn GatewayApi, gateway: &'a str) -> Self {
        Self { api, gateway }
    }

    /// Import `drafts` strictly in order, each write awaited before the
    /// next starts. Each draft is attempted at most once.
    pub async fn run(
        &self,
        drafts: &[CandidateDraft],
        mut observer: Option<ProgressObserver<'_>>,
    ) -> ImportOutcome {
        if drafts.is_empty() {
            debug!(gateway = self.gateway, "import requested with nothing selected");
            return ImportOutcome::NothingSelected;
        }

        let total = drafts.len();
        let mut report = ImportReport::default();
        let mut emit = |event: ImportProgress| {
            if let Some(observer) = observer.as_mut() {
                observer(event);
            }
        };

        for (index, draft) in drafts.iter().enumerate() {
            let id = draft.id.clone();
            emit(ImportProgress::Started {
                index,
                total,
                id: id.clone(),
            });

            let result = match draft.record.validate() {
                Ok(()) => self.api.save_device(self.gateway, &draft.record).await,
                Err(e) => Err(e),
            };

            match result {
                Ok(saved) => {
                    debug!(%id, key = %saved.value.key, "imported candidate");
                    emit(ImportProgress::Succeeded {
                        index,
                        total,
                        id: id.clone(),
                        key: saved.value.key.clone(),
                    });
                    report.imported.push(ImportedDevice {
                        id,
                        platform: saved.value.platform,
                        key: saved.value.key,
                    });
                }
                Err(e) => {
                    let message = e.to_string();
                    warn!(%id, error = %message, "candidate import failed");
                    emit(ImportProgress::Failed {
                        index,
                        total,
                        id: id.clone(),
                        message: message.clone(),
                    });
                    report.failures.push(ImportFailure { id, message });
                }
            }
        }

        info!(
            gateway = self.gateway,
            imported = report.imported_count(),
            failed = report.failures.len(),
            "import finished"
        );
        ImportOutcome::Finished(report)
    }
}
