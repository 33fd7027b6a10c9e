//! Platform SDK discovery.
//!
//! Apple sysroots come from `xcrun`; the trait seam lets toolchain
//! planning stay pure in tests and lets the `plan` command run without
//! spawning anything.

use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::core::errors::ForgeError;
use crate::util::process::{CommandRunner, ProcessBuilder};

/// An Apple SDK flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppleSdk {
    IPhoneOs,
    IPhoneSimulator,
    XrOs,
    XrSimulator,
}

impl AppleSdk {
    /// The `xcrun --sdk` name.
    pub fn sdk_name(&self) -> &'static str {
        match self {
            AppleSdk::IPhoneOs => "iphoneos",
            AppleSdk::IPhoneSimulator => "iphonesimulator",
            AppleSdk::XrOs => "xros",
            AppleSdk::XrSimulator => "xrsimulator",
        }
    }
}

/// Resolves SDK roots for Apple targets.
pub trait SdkLocator {
    fn sdk_path(&self, sdk: AppleSdk) -> Result<PathBuf>;
}

/// Queries `xcrun` for SDK paths.
pub struct XcrunSdkLocator<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> XcrunSdkLocator<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        XcrunSdkLocator { runner }
    }
}

impl SdkLocator for XcrunSdkLocator<'_> {
    fn sdk_path(&self, sdk: AppleSdk) -> Result<PathBuf> {
        let cmd = ProcessBuilder::new("xcrun")
            .arg("--sdk")
            .arg(sdk.sdk_name())
            .arg("--show-sdk-path");

        let output = self.runner.capture(&cmd)?;
        if !output.success() {
            return Err(anyhow!(ForgeError::ExternalToolMissing {
                tool: format!("{} SDK", sdk.sdk_name()),
                hint: format!("`{}` failed: {}", cmd.display_command(), output.stderr.trim()),
            }));
        }

        Ok(PathBuf::from(output.stdout.trim()))
    }
}

/// Returns symbolic placeholders instead of querying the system.
///
/// Used by the dry-run `plan` command, which must not invoke any external
/// process.
pub struct PlaceholderSdkLocator;

impl SdkLocator for PlaceholderSdkLocator {
    fn sdk_path(&self, sdk: AppleSdk) -> Result<PathBuf> {
        Ok(PathBuf::from(format!("<sdk:{}>", sdk.sdk_name())))
    }
}

/// Resolve the Emscripten toolchain file from the EMSDK root, if any.
///
/// Absence is not an error: the configure step is left to fail loudly
/// rather than silently building for the wrong target.
pub fn emscripten_toolchain_file(emsdk_root: Option<&std::path::Path>) -> Option<PathBuf> {
    let root = emsdk_root?;
    let toolchain = root
        .join("upstream")
        .join("emscripten")
        .join("cmake")
        .join("Modules")
        .join("Platform")
        .join("Emscripten.cmake");
    toolchain.exists().then_some(toolchain)
}
