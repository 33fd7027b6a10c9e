//! Build execution: one configure + build invocation per cell.
//!
//! Fail-fast by design. Native build failures are rarely transient, and
//! partial output that looks like success is worse than an abort, so any
//! nonzero exit kills the whole run. Artifacts already on disk are left
//! for inspection.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use crate::builder::toolchain::ToolchainPlan;
use crate::core::errors::ForgeError;
use crate::core::request::BuildCell;
use crate::util::fs::ensure_dir;
use crate::util::process::{CommandRunner, ProcessBuilder};

/// Runs cmake configure and build steps for build cells.
pub struct Executor<'a> {
    runner: &'a dyn CommandRunner,
    cmake: PathBuf,
}

impl<'a> Executor<'a> {
    /// Create an executor, verifying cmake is installed.
    ///
    /// Called before the matrix loop so a missing toolchain is reported
    /// before any cell starts.
    pub fn new(runner: &'a dyn CommandRunner) -> Result<Self> {
        let cmake = runner.find_tool("cmake").ok_or_else(|| {
            anyhow!(ForgeError::ExternalToolMissing {
                tool: "cmake".into(),
                hint: "install CMake and ensure it is in your PATH".into(),
            })
        })?;

        Ok(Executor { runner, cmake })
    }

    /// Build one cell: configure into its scoped build directory, then
    /// compile. The directory is never shared between cells.
    pub fn run_cell(
        &self,
        cell: &BuildCell,
        plan: &ToolchainPlan,
        source_dir: &Path,
        build_dir: &Path,
    ) -> Result<()> {
        ensure_dir(build_dir)?;

        tracing::info!("building {} in {}", cell, build_dir.display());

        self.configure(cell, plan, source_dir, build_dir)?;
        self.compile(cell, build_dir)?;

        Ok(())
    }

    fn configure(
        &self,
        cell: &BuildCell,
        plan: &ToolchainPlan,
        source_dir: &Path,
        build_dir: &Path,
    ) -> Result<()> {
        let cmd = ProcessBuilder::new(&self.cmake)
            .arg("-S")
            .arg(source_dir)
            .arg("-B")
            .arg(build_dir)
            .args(plan.to_args());

        self.run_checked(cell, &cmd)
    }

    fn compile(&self, cell: &BuildCell, build_dir: &Path) -> Result<()> {
        let cmd = ProcessBuilder::new(&self.cmake)
            .arg("--build")
            .arg(build_dir)
            .arg("--config")
            .arg(cell.config.as_str())
            .arg("--parallel");

        self.run_checked(cell, &cmd)
    }

    fn run_checked(&self, cell: &BuildCell, cmd: &ProcessBuilder) -> Result<()> {
        let code = self.runner.stream(cmd)?;
        if code != 0 {
            return Err(anyhow!(ForgeError::ExternalCommandFailure {
                command: cmd.display_command(),
                code,
                cell: cell.to_string(),
            }));
        }
        Ok(())
    }
}
