//! Liveness evaluation commands

use std::path::{Path, PathBuf};

use livegate_domain::{
    BatchJobState, EvaluationReport, InputFile, LiveGateError, PreviewRef, Result,
};
use tracing::debug;

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// Evaluate every image under `paths`.
///
/// Directories contribute their direct children in name order; unsupported
/// files are dropped by the pipeline. Starting a batch preempts one already
/// in flight.
pub async fn evaluate_batch(ctx: &AppContext, paths: &[PathBuf]) -> Result<EvaluationReport> {
    execute_command(
        ctx,
        "evaluation::batch",
        || run_batch(ctx, paths),
        |report: &EvaluationReport| match report {
            EvaluationReport::Batch { total, failed, .. } => {
                format!("{total} image(s) evaluated, {failed} failed")
            }
            EvaluationReport::Single { .. } => "1 image evaluated".to_string(),
        },
    )
    .await
}

/// Evaluate a single image file
pub async fn evaluate_single(ctx: &AppContext, path: &Path) -> Result<EvaluationReport> {
    execute_command(
        ctx,
        "evaluation::single",
        || run_single(ctx, path),
        |report: &EvaluationReport| match report.items().first() {
            Some(item) if item.is_failed() => format!("'{}' could not be evaluated", item.title),
            Some(item) => format!("'{}' evaluated", item.title),
            None => "Evaluation finished".to_string(),
        },
    )
    .await
}

/// Drop the current results and release their previews
pub async fn clear_results(ctx: &AppContext) -> Result<usize> {
    execute_command(
        ctx,
        "evaluation::clear",
        || async { Ok::<_, LiveGateError>(ctx.pipeline.clear()) },
        |released: &usize| format!("Results cleared ({released} preview(s) released)"),
    )
    .await
}

/// Snapshot of the pipeline's current job
pub fn job_state(ctx: &AppContext) -> BatchJobState {
    ctx.pipeline.state()
}

/// `data:` URL for a preview of the current job
pub fn preview_data_url(ctx: &AppContext, preview: &PreviewRef) -> Option<String> {
    ctx.previews.data_url(preview)
}

async fn run_batch(ctx: &AppContext, paths: &[PathBuf]) -> Result<EvaluationReport> {
    let files = collect_inputs(paths).await?;
    let credential = ctx.session.credential().get();
    let state = ctx.pipeline.run(files, &credential).await?;
    Ok(batch_report(state))
}

async fn run_single(ctx: &AppContext, path: &Path) -> Result<EvaluationReport> {
    let credential = ctx.session.credential().get();
    let state = ctx.pipeline.run(vec![InputFile::from_path(path)], &credential).await?;
    let item = state.items.into_iter().next().ok_or_else(|| {
        LiveGateError::Internal("evaluation finished without a result".to_string())
    })?;
    Ok(EvaluationReport::Single { item })
}

fn batch_report(state: BatchJobState) -> EvaluationReport {
    let failed = state.failed_count();
    EvaluationReport::Batch {
        job_id: state.job_id.unwrap_or_default(),
        total: state.items.len(),
        failed,
        elapsed_ms: state.elapsed_ms.unwrap_or_default(),
        items: state.items,
    }
}

async fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<InputFile>> {
    let mut files = Vec::new();
    for path in paths {
        let is_dir = tokio::fs::metadata(path).await.map(|meta| meta.is_dir()).unwrap_or(false);
        if !is_dir {
            files.push(InputFile::from_path(path.clone()));
            continue;
        }

        let mut children = Vec::new();
        let mut entries = tokio::fs::read_dir(path).await.map_err(|err| {
            LiveGateError::InvalidInput(format!("cannot read {}: {err}", path.display()))
        })?;
        while let Some(entry) = entries.next_entry().await.map_err(|err| {
            LiveGateError::InvalidInput(format!("cannot read {}: {err}", path.display()))
        })? {
            if entry.file_type().await.map(|kind| kind.is_file()).unwrap_or(false) {
                children.push(entry.path());
            }
        }
        children.sort();
        debug!(dir = %path.display(), files = children.len(), "expanded input directory");
        files.extend(children.into_iter().map(InputFile::from_path));
    }
    Ok(files)
}
