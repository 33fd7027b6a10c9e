//! Build requests and build cells.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::core::platform::{Arch, Platform};

/// Build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum BuildConfig {
    /// Accepts both `release` and the CMake-style `Release` spelling.
    #[value(alias = "Release")]
    Release,
    #[value(alias = "Debug")]
    Debug,
}

impl BuildConfig {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildConfig::Release => "Release",
            BuildConfig::Debug => "Debug",
        }
    }
}

impl fmt::Display for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Windows C runtime linkage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CrtLinkage {
    /// Statically linked runtime (/MT)
    Static,
    /// Dynamically linked runtime (/MD)
    Dynamic,
}

impl CrtLinkage {
    /// Suffix appended to the platform directory name, so static- and
    /// dynamic-CRT packages never overwrite each other.
    pub fn dir_suffix(&self, platform: Platform) -> &'static str {
        match (platform, self) {
            (Platform::Win, CrtLinkage::Dynamic) => "-md",
            _ => "",
        }
    }
}

impl fmt::Display for CrtLinkage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrtLinkage::Static => f.write_str("static"),
            CrtLinkage::Dynamic => f.write_str("dynamic"),
        }
    }
}

/// Device/simulator intent for Apple mobile and XR platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TargetIntent {
    Device,
    Simulator,
    All,
}

impl fmt::Display for TargetIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetIntent::Device => f.write_str("device"),
            TargetIntent::Simulator => f.write_str("simulator"),
            TargetIntent::All => f.write_str("all"),
        }
    }
}

impl TargetIntent {
    /// Whether a cell targets the simulator.
    ///
    /// On iOS an x86_64 slice is always treated as simulator-only, even if
    /// `--target device` was passed; there is no x86_64 iOS device worth
    /// targeting and the SDK query would otherwise pick the wrong sysroot.
    pub fn simulator_for(&self, platform: Platform, arch: Arch) -> bool {
        match platform {
            Platform::Ios => arch == Arch::X86_64 || *self == TargetIntent::Simulator,
            Platform::VisionOs => *self == TargetIntent::Simulator,
            _ => false,
        }
    }
}

/// A validated, immutable build request.
///
/// `archs` holds the raw user tokens (possibly containing the aggregate
/// `universal` token); matrix expansion turns them into [`BuildCell`]s.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub platform: Platform,
    pub archs: Vec<String>,
    pub config: BuildConfig,
    pub crt: CrtLinkage,
    pub intent: TargetIntent,
    pub out: PathBuf,
    /// Git branch/tag override; recipes carry their own default.
    pub branch: Option<String>,
    /// Android NDK root (flag or environment).
    pub ndk: Option<PathBuf>,
    /// Shallow git clone/fetch.
    pub shallow: bool,
}

/// One concrete unit of build work: exactly one configure+build invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildCell {
    pub platform: Platform,
    pub arch: Arch,
    pub config: BuildConfig,
    pub crt: CrtLinkage,
}

impl BuildCell {
    /// Cell-unique build directory name under the scratch root.
    pub fn dir_name(&self) -> String {
        format!("{}_{}_{}", self.platform, self.config, self.arch)
    }
}

impl fmt::Display for BuildCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.platform, self.arch, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn x86_64_forces_simulator_on_ios() {
        // Explicit device intent is overridden for the Intel slice.
        assert!(TargetIntent::Device.simulator_for(Platform::Ios, Arch::X86_64));
        assert!(TargetIntent::All.simulator_for(Platform::Ios, Arch::X86_64));
        assert!(!TargetIntent::Device.simulator_for(Platform::Ios, Arch::Arm64));
        assert!(TargetIntent::Simulator.simulator_for(Platform::Ios, Arch::Arm64));
    }

    #[test]
    fn visionos_follows_intent_only() {
        assert!(!TargetIntent::Device.simulator_for(Platform::VisionOs, Arch::Arm64));
        assert!(TargetIntent::Simulator.simulator_for(Platform::VisionOs, Arch::Arm64));
    }

    #[test]
    fn desktop_platforms_never_simulate() {
        assert!(!TargetIntent::Simulator.simulator_for(Platform::Mac, Arch::X86_64));
        assert!(!TargetIntent::Simulator.simulator_for(Platform::Linux, Arch::Arm64));
    }

    #[test]
    fn crt_suffix_only_for_dynamic_windows() {
        assert_eq!(CrtLinkage::Dynamic.dir_suffix(Platform::Win), "-md");
        assert_eq!(CrtLinkage::Static.dir_suffix(Platform::Win), "");
        assert_eq!(CrtLinkage::Dynamic.dir_suffix(Platform::Mac), "");
    }

    #[test]
    fn cell_dir_name_is_platform_config_arch() {
        let cell = BuildCell {
            platform: Platform::Mac,
            arch: Arch::Arm64,
            config: BuildConfig::Release,
            crt: CrtLinkage::Static,
        };
        assert_eq!(cell.dir_name(), "mac_Release_arm64");
    }
}
