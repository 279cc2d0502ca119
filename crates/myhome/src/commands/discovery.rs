//! Discovery command handlers: review, clear and import candidates.

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tabled::Tabled;

use myhome_core::{
    CandidateDraft, Controller, DraftEdit, DraftField, Gateway, ImportFailure, ImportProgress,
    ImportedDevice,
};

use crate::cli::{DiscoveryArgs, DiscoveryCommand, GlobalOpts, ImportArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct CandidateRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Import")]
    selected: &'static str,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Options")]
    options: String,
}

impl From<&CandidateDraft> for CandidateRow {
    fn from(draft: &CandidateDraft) -> Self {
        Self {
            id: draft.id.to_string(),
            selected: util::yes_no(draft.selected),
            key: draft.record.key.clone(),
            name: draft.record.name.clone(),
            options: draft.record.kind.options().join(", "),
        }
    }
}

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Tabled)]
struct ImportRow {
    #[tabled(rename = "Candidate")]
    candidate: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Result")]
    result: String,
}

impl From<&ImportedDevice> for ImportRow {
    fn from(device: &ImportedDevice) -> Self {
        Self {
            candidate: device.id.to_string(),
            status: "imported",
            result: format!("{}:{}", device.platform, device.key),
        }
    }
}

impl From<&ImportFailure> for ImportRow {
    fn from(failure: &ImportFailure) -> Self {
        Self {
            candidate: failure.id.to_string(),
            status: "failed",
            result: failure.message.clone(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    gateway: &Gateway,
    args: DiscoveryArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DiscoveryCommand::Show => {
            util::ensure_synced(controller)?;
            let drafts: Vec<CandidateDraft> = controller.drafts().into_values().collect();
            if drafts.is_empty() && matches!(global.output, OutputFormat::Table) {
                output::notice(
                    &format!("No devices pending discovery on {}.", gateway.name),
                    global.quiet,
                );
                return Ok(());
            }
            let out = output::render_list(
                &global.output,
                &drafts,
                |d| CandidateRow::from(d),
                |d| d.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DiscoveryCommand::Clear => {
            if !util::confirm(
                &format!("Clear the discovery list of {}?", gateway.name),
                global.yes,
            )? {
                return Ok(());
            }
            controller.refresh_discovery(true).await?;
            util::print_notice(controller, global);
            Ok(())
        }

        DiscoveryCommand::Import(args) => import(controller, &args, global).await,
    }
}

async fn import(
    controller: &Controller,
    args: &ImportArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::ensure_synced(controller)?;
    apply_selection(controller, args)?;

    let bar = progress_bar(controller.selected_drafts().len(), global.quiet);
    let mut on_progress = |event: ImportProgress| match event {
        ImportProgress::Started { id, .. } => bar.set_message(id.to_string()),
        ImportProgress::Succeeded { .. } => bar.inc(1),
        ImportProgress::Failed { id, message, .. } => {
            bar.println(format!("{id}: {message}"));
            bar.inc(1);
        }
    };
    let outcome = controller.import_selected(Some(&mut on_progress)).await?;
    bar.finish_and_clear();

    let Some(report) = outcome.report() else {
        util::print_notice(controller, global);
        return Ok(());
    };

    let mut rows: Vec<ImportRow> = report
        .imported
        .iter()
        .map(ImportRow::from)
        .chain(report.failures.iter().map(ImportRow::from))
        .collect();
    rows.sort();
    let out = output::render_list(&global.output, &rows, ImportRow::clone, |r| {
        r.candidate.clone()
    })?;
    output::print_output(&out, global.quiet);
    util::print_notice(controller, global);

    outcome.into_result()?;
    Ok(())
}

/// Narrow the selection with `--only`/`--skip`, then apply `--set` edits.
fn apply_selection(controller: &Controller, args: &ImportArgs) -> Result<(), CliError> {
    let drafts = controller.drafts();
    if let Some(unknown) = args
        .only
        .iter()
        .chain(&args.skip)
        .find(|id| !drafts.contains_key(*id))
    {
        return Err(CliError::UnknownCandidate {
            id: unknown.to_string(),
        });
    }

    for id in drafts.keys() {
        let wanted = args.only.is_empty() || args.only.contains(id);
        if !wanted || args.skip.contains(id) {
            controller.edit_draft(&DraftEdit {
                id: id.clone(),
                field: DraftField::Selected(false),
            })?;
        }
    }

    for edit in &args.set {
        if !controller.edit_draft(edit)? {
            return Err(CliError::UnknownCandidate {
                id: edit.id.to_string(),
            });
        }
    }
    Ok(())
}

fn progress_bar(total: usize, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(u64::try_from(total).unwrap_or(u64::MAX));
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}") {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}
