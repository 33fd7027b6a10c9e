//! Artifact resolution, placement, and composition.

pub mod headers;
pub mod resolve;
pub mod universal;

use std::path::{Path, PathBuf};

use crate::core::platform::Platform;
use crate::core::request::{BuildCell, BuildConfig, CrtLinkage, TargetIntent};

pub use resolve::{resolve_artifact, Resolution};

/// The packaged output tree for one library.
///
/// `<out>/<lib>-<platform>[-md]/lib/<Config>/[<arch>/]<file>` plus
/// `<out>/include/...`. The layout is a compatibility contract; consumers
/// hardcode these paths.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    lib_root: PathBuf,
    include_root: PathBuf,
}

impl OutputLayout {
    pub fn new(out: &Path, recipe_name: &str, platform: Platform, crt: CrtLinkage) -> Self {
        let dir = format!("{}-{}{}", recipe_name, platform, crt.dir_suffix(platform));
        OutputLayout {
            lib_root: out.join(dir).join("lib"),
            include_root: out.join("include"),
        }
    }

    /// Root of the include tree, shared by all platforms.
    pub fn include_root(&self) -> &Path {
        &self.include_root
    }

    /// `lib/<Config>` — where universal binaries land after composition.
    pub fn config_dir(&self, config: BuildConfig) -> PathBuf {
        self.lib_root.join(config.as_str())
    }

    /// Per-cell destination directory for resolved artifacts.
    ///
    /// Apple mobile/XR platforms separate device and simulator slices of
    /// the same architecture; everywhere else the architecture name is
    /// enough.
    pub fn cell_dir(&self, cell: &BuildCell, intent: TargetIntent) -> PathBuf {
        let config_dir = self.config_dir(cell.config);
        if cell.platform.is_apple_mobile() {
            let prefix = if intent.simulator_for(cell.platform, cell.arch) {
                "simulator"
            } else {
                "device"
            };
            config_dir.join(format!("{}-{}", prefix, cell.arch))
        } else {
            config_dir.join(cell.arch.as_str())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::Arch;

    fn cell(platform: Platform, arch: Arch) -> BuildCell {
        BuildCell {
            platform,
            arch,
            config: BuildConfig::Release,
            crt: CrtLinkage::Static,
        }
    }

    #[test]
    fn desktop_layout_uses_config_then_arch() {
        let layout = OutputLayout::new(
            Path::new("build"),
            "webp",
            Platform::Mac,
            CrtLinkage::Static,
        );
        assert_eq!(
            layout.cell_dir(&cell(Platform::Mac, Arch::Arm64), TargetIntent::All),
            PathBuf::from("build/webp-mac/lib/Release/arm64")
        );
    }

    #[test]
    fn dynamic_crt_windows_gets_md_suffix() {
        let layout = OutputLayout::new(
            Path::new("build"),
            "draco",
            Platform::Win,
            CrtLinkage::Dynamic,
        );
        assert_eq!(
            layout.config_dir(BuildConfig::Release),
            PathBuf::from("build/draco-win-md/lib/Release")
        );
    }

    #[test]
    fn ios_x86_64_lands_in_simulator_dir_despite_device_intent() {
        let layout = OutputLayout::new(
            Path::new("build"),
            "webp",
            Platform::Ios,
            CrtLinkage::Static,
        );
        assert_eq!(
            layout.cell_dir(&cell(Platform::Ios, Arch::X86_64), TargetIntent::Device),
            PathBuf::from("build/webp-ios/lib/Release/simulator-x86_64")
        );
        assert_eq!(
            layout.cell_dir(&cell(Platform::Ios, Arch::Arm64), TargetIntent::Device),
            PathBuf::from("build/webp-ios/lib/Release/device-arm64")
        );
    }
}
