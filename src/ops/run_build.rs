//! The end-to-end build run.
//!
//! Cells execute strictly in matrix order, one at a time; the composer
//! runs only after every cell of the aggregate group has completed. The
//! first fatal error aborts the run; warnings are collected and flushed
//! once at the end.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use serde::Serialize;

use crate::artifact::headers::{package_generated_header, package_headers};
use crate::artifact::universal::compose_universal;
use crate::artifact::{resolve_artifact, OutputLayout, Resolution};
use crate::builder::sdk::SdkLocator;
use crate::builder::toolchain::{plan_for_cell, PlanExtras, ToolchainPlan};
use crate::builder::Executor;
use crate::core::errors::ForgeError;
use crate::core::matrix;
use crate::core::request::{BuildCell, BuildRequest};
use crate::recipe::Recipe;
use crate::sources::SourceProvider;
use crate::util::diagnostic::{Diagnostic, Report};
use crate::util::fs::{copy_file, ensure_dir};
use crate::util::process::CommandRunner;

/// One cell of a dry-run plan.
#[derive(Debug, Serialize)]
pub struct CellPlan {
    pub cell: BuildCell,
    pub build_dir: PathBuf,
    pub plan: ToolchainPlan,
}

/// Expand a request and compute every cell's toolchain plan without
/// invoking any external process.
pub fn plan_matrix(
    recipe: &Recipe,
    request: &BuildRequest,
    sdk: &dyn SdkLocator,
) -> Result<Vec<CellPlan>> {
    let cells = matrix::expand(request)?;
    let extras = extras_for(request);

    cells
        .into_iter()
        .map(|cell| {
            let plan = plan_for_cell(&cell, recipe, &extras, sdk)?;
            Ok(CellPlan {
                build_dir: scratch_dir(request, recipe, &cell),
                cell,
                plan,
            })
        })
        .collect()
}

/// Run the full build: expand, check tools, check out source, build each
/// cell, resolve and place artifacts, compose universal binaries, package
/// headers, and flush the warning report.
pub fn run_build(
    recipe: &Recipe,
    request: &BuildRequest,
    runner: &dyn CommandRunner,
    sdk: &dyn SdkLocator,
    sources: &dyn SourceProvider,
    color: bool,
) -> Result<()> {
    let mut report = Report::new();
    let result = execute(recipe, request, runner, sdk, sources, &mut report);
    report.flush(color);
    result
}

fn execute(
    recipe: &Recipe,
    request: &BuildRequest,
    runner: &dyn CommandRunner,
    sdk: &dyn SdkLocator,
    sources: &dyn SourceProvider,
    report: &mut Report,
) -> Result<()> {
    // Matrix expansion and toolchain checks both happen before any
    // external process or checkout is started.
    let cells = matrix::expand(request)?;
    let archs: Vec<_> = cells.iter().map(|c| c.arch).collect();
    let composing = matrix::covers_aggregate_group(request.platform, &archs);

    let executor = Executor::new(runner)?;
    let lipo = if composing {
        Some(runner.find_tool("lipo").ok_or_else(|| {
            anyhow!(ForgeError::ExternalToolMissing {
                tool: "lipo".into(),
                hint: "universal composition requires the Xcode command line tools".into(),
            })
        })?)
    } else {
        None
    };

    let reference = request
        .branch
        .clone()
        .unwrap_or_else(|| recipe.default_branch.clone());
    let source_dir = sources.checkout(&recipe.git_url, &reference, request.shallow, &request.out)?;

    let layout = OutputLayout::new(&request.out, &recipe.name, request.platform, request.crt);
    let extras = extras_for(request);

    // Every (cell, artifact) pair gets an explicit resolution record;
    // silent omission would hide packaging gaps.
    let mut unresolved_required: Vec<ForgeError> = Vec::new();
    let mut last_build_dir: Option<PathBuf> = None;

    for cell in &cells {
        let build_dir = scratch_dir(request, recipe, cell);
        let plan = plan_for_cell(cell, recipe, &extras, sdk)?;
        executor.run_cell(cell, &plan, &source_dir, &build_dir)?;

        let dest_dir = layout.cell_dir(cell, request.intent);
        ensure_dir(&dest_dir)?;

        for spec in &recipe.artifacts {
            match resolve_artifact(spec, cell.platform, cell.config, &build_dir) {
                Resolution::Resolved { path } => {
                    let file = spec.file_name(cell.platform);
                    copy_file(&path, &dest_dir.join(&file))?;
                    tracing::info!("placed {} for {}", file, cell);
                }
                Resolution::Unresolved { reason } => {
                    let err = ForgeError::ArtifactUnresolved {
                        name: spec.name.clone(),
                        cell: cell.to_string(),
                        reason: reason.clone(),
                    };
                    if spec.required {
                        // Every missing required artifact lands in the
                        // report; the returned error alone would name only
                        // the first.
                        report.push(
                            Diagnostic::error(format!(
                                "artifact `{}` unresolved for {}",
                                spec.name, cell
                            ))
                            .with_context(reason),
                        );
                        unresolved_required.push(err);
                    } else {
                        report.push(err.to_diagnostic());
                    }
                }
            }
        }

        last_build_dir = Some(build_dir);
    }

    if composing {
        if let (Some(lipo), Some(group)) = (lipo.as_deref(), request.platform.aggregate_group()) {
            compose_universal(
                runner,
                lipo,
                recipe,
                request.platform,
                request.config,
                &layout,
                group,
                report,
            )?;
        }
    }

    package_headers(recipe, &source_dir, layout.include_root())?;
    if let (Some(gh), Some(build_dir)) = (&recipe.generated_header, &last_build_dir) {
        package_generated_header(gh, build_dir, layout.include_root(), report)?;
    }

    // A required artifact missing after all cells completed is fatal.
    if let Some(first) = unresolved_required.into_iter().next() {
        return Err(anyhow!(first));
    }

    Ok(())
}

fn extras_for(request: &BuildRequest) -> PlanExtras {
    PlanExtras {
        intent: request.intent,
        ndk: request.ndk.clone(),
        emsdk: crate::builder::toolchain::emsdk_from_env(),
    }
}

fn scratch_dir(request: &BuildRequest, recipe: &Recipe, cell: &BuildCell) -> PathBuf {
    request
        .out
        .join("tmp")
        .join(&recipe.name)
        .join(cell.dir_name())
}
