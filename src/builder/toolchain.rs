//! Toolchain configuration: build cell -> ordered CMake directives.
//!
//! One flat function over the platform cases, no inheritance. Plans are
//! fully computed before the executor runs anything, so a failure here
//! costs no build time.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use serde::Serialize;

use crate::builder::sdk::{emscripten_toolchain_file, AppleSdk, SdkLocator};
use crate::core::errors::ForgeError;
use crate::core::platform::Platform;
use crate::core::request::{BuildCell, BuildConfig, CrtLinkage, TargetIntent};
use crate::recipe::Recipe;

const MAC_MIN_VERSION: &str = "10.15";
const IOS_MIN_VERSION: &str = "14.0";
const VISIONOS_MIN_VERSION: &str = "1.0";
const ANDROID_MIN_API: &str = "24";

/// Ordered build-tool directives for one cell.
#[derive(Debug, Clone, Serialize)]
pub struct ToolchainPlan {
    /// Generator passed via `-G`, if any.
    pub generator: Option<String>,
    /// `-D` defines and raw flags, in order.
    pub defines: Vec<String>,
}

impl ToolchainPlan {
    fn new() -> Self {
        ToolchainPlan {
            generator: None,
            defines: Vec::new(),
        }
    }

    fn define(&mut self, d: impl Into<String>) {
        self.defines.push(d.into());
    }

    /// Flatten into configure-invocation arguments.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(generator) = &self.generator {
            args.push("-G".to_string());
            args.push(generator.clone());
        }
        args.extend(self.defines.iter().cloned());
        args
    }
}

/// Request knobs that feed toolchain planning beyond the cell itself.
#[derive(Debug, Clone)]
pub struct PlanExtras {
    pub intent: TargetIntent,
    pub ndk: Option<PathBuf>,
    pub emsdk: Option<PathBuf>,
}

/// Compute the toolchain plan for one cell.
///
/// Pure given the [`SdkLocator`]; no filesystem or process side effects
/// besides the locator's SDK query.
pub fn plan_for_cell(
    cell: &BuildCell,
    recipe: &Recipe,
    extras: &PlanExtras,
    sdk: &dyn SdkLocator,
) -> Result<ToolchainPlan> {
    let mut plan = ToolchainPlan::new();

    plan.define(format!("-DCMAKE_BUILD_TYPE={}", cell.config));
    for define in &recipe.cmake_defines {
        plan.define(define.clone());
    }
    plan.define("-DBUILD_SHARED_LIBS=OFF");

    match cell.platform {
        Platform::Mac => {
            plan.generator = Some("Ninja".into());
            plan.define("-DCMAKE_POSITION_INDEPENDENT_CODE=ON");
            plan.define(format!("-DCMAKE_OSX_DEPLOYMENT_TARGET={}", MAC_MIN_VERSION));
            plan.define(format!("-DCMAKE_OSX_ARCHITECTURES={}", cell.arch));
        }

        Platform::Ios => {
            let simulator = extras.intent.simulator_for(cell.platform, cell.arch);
            let sdk_kind = if simulator {
                AppleSdk::IPhoneSimulator
            } else {
                AppleSdk::IPhoneOs
            };
            let sysroot = sdk.sdk_path(sdk_kind)?;

            plan.define("-DCMAKE_SYSTEM_NAME=iOS");
            plan.define(format!("-DCMAKE_OSX_DEPLOYMENT_TARGET={}", IOS_MIN_VERSION));
            plan.define(format!("-DCMAKE_OSX_ARCHITECTURES={}", cell.arch));
            plan.define(format!("-DCMAKE_OSX_SYSROOT={}", sysroot.display()));
        }

        Platform::VisionOs => {
            let simulator = extras.intent.simulator_for(cell.platform, cell.arch);
            let sdk_kind = if simulator {
                AppleSdk::XrSimulator
            } else {
                AppleSdk::XrOs
            };
            let sysroot = sdk.sdk_path(sdk_kind)?;
            let target_suffix = if simulator { "-simulator" } else { "" };

            plan.define("-DCMAKE_SYSTEM_NAME=visionOS");
            plan.define(format!(
                "-DCMAKE_OSX_DEPLOYMENT_TARGET={}",
                VISIONOS_MIN_VERSION
            ));
            plan.define("-DCMAKE_OSX_ARCHITECTURES=arm64");
            plan.define(format!("-DCMAKE_OSX_SYSROOT={}", sysroot.display()));
            plan.define(format!(
                "-DCMAKE_C_FLAGS=-target arm64-apple-xros{}{}",
                VISIONOS_MIN_VERSION, target_suffix
            ));
            plan.define(format!(
                "-DCMAKE_CXX_FLAGS=-target arm64-apple-xros{}{}",
                VISIONOS_MIN_VERSION, target_suffix
            ));
        }

        Platform::Android => {
            let ndk = extras.ndk.as_deref().ok_or_else(|| {
                anyhow!(ForgeError::ExternalToolMissing {
                    tool: "Android NDK".into(),
                    hint: "pass --ndk or set ANDROID_NDK_HOME / ANDROID_NDK_ROOT".into(),
                })
            })?;

            plan.define("-DCMAKE_SYSTEM_NAME=Android");
            plan.define(format!("-DCMAKE_ANDROID_NDK={}", ndk.display()));
            plan.define(format!(
                "-DCMAKE_ANDROID_ARCH_ABI={}",
                cell.arch.android_abi()
            ));
            plan.define(format!("-DCMAKE_ANDROID_API={}", ANDROID_MIN_API));
            plan.define("-DCMAKE_ANDROID_STL_TYPE=c++_static");
        }

        Platform::Win => {
            plan.generator = Some("Ninja".into());
            let crt_flag = crt_flag(cell.crt, cell.config);
            plan.define(format!("-DCMAKE_C_FLAGS_RELEASE={}", crt_flag));
            plan.define(format!("-DCMAKE_CXX_FLAGS_RELEASE={}", crt_flag));
            plan.define(format!("-DCMAKE_C_FLAGS_DEBUG={}", crt_flag));
            plan.define(format!("-DCMAKE_CXX_FLAGS_DEBUG={}", crt_flag));
            plan.define(format!(
                "-DCMAKE_MSVC_RUNTIME_LIBRARY={}",
                msvc_runtime(cell.crt, cell.config)
            ));
            plan.define("-DCMAKE_POLICY_DEFAULT_CMP0091=NEW");
        }

        Platform::Linux => {
            plan.generator = Some("Ninja".into());
            plan.define("-DCMAKE_POSITION_INDEPENDENT_CODE=ON");
        }

        Platform::Wasm => {
            plan.generator = Some("Ninja".into());
            if let Some(toolchain) = emscripten_toolchain_file(extras.emsdk.as_deref()) {
                plan.define(format!("-DCMAKE_TOOLCHAIN_FILE={}", toolchain.display()));
            }
            plan.define("-DCMAKE_SYSTEM_NAME=Emscripten");
        }
    }

    Ok(plan)
}

/// MSVC per-config compiler flag for the chosen runtime linkage.
fn crt_flag(crt: CrtLinkage, config: BuildConfig) -> String {
    let base = match crt {
        CrtLinkage::Static => "/MT",
        CrtLinkage::Dynamic => "/MD",
    };
    match config {
        BuildConfig::Debug => format!("{}d", base),
        BuildConfig::Release => base.to_string(),
    }
}

/// CMake's MSVC runtime library name for the chosen linkage and config.
fn msvc_runtime(crt: CrtLinkage, config: BuildConfig) -> &'static str {
    match (crt, config) {
        (CrtLinkage::Static, BuildConfig::Release) => "MultiThreaded",
        (CrtLinkage::Static, BuildConfig::Debug) => "MultiThreadedDebug",
        (CrtLinkage::Dynamic, BuildConfig::Release) => "MultiThreadedDLL",
        (CrtLinkage::Dynamic, BuildConfig::Debug) => "MultiThreadedDebugDLL",
    }
}

/// Read the EMSDK root from the environment.
pub fn emsdk_from_env() -> Option<PathBuf> {
    std::env::var_os("EMSDK").map(PathBuf::from)
}

/// Read the NDK root from the conventional environment variables.
pub fn ndk_from_env() -> Option<PathBuf> {
    std::env::var_os("ANDROID_NDK_HOME")
        .or_else(|| std::env::var_os("ANDROID_NDK_ROOT"))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::sdk::PlaceholderSdkLocator;
    use crate::core::platform::Arch;
    use crate::recipe::builtin;

    fn cell(platform: Platform, arch: Arch, config: BuildConfig, crt: CrtLinkage) -> BuildCell {
        BuildCell {
            platform,
            arch,
            config,
            crt,
        }
    }

    fn extras() -> PlanExtras {
        PlanExtras {
            intent: TargetIntent::All,
            ndk: None,
            emsdk: None,
        }
    }

    #[test]
    fn mac_plan_pins_arch_and_deployment_target() {
        let recipe = builtin::webp();
        let plan = plan_for_cell(
            &cell(
                Platform::Mac,
                Arch::Arm64,
                BuildConfig::Release,
                CrtLinkage::Static,
            ),
            &recipe,
            &extras(),
            &PlaceholderSdkLocator,
        )
        .unwrap();

        let args = plan.to_args();
        assert_eq!(args[0], "-G");
        assert_eq!(args[1], "Ninja");
        assert!(args.contains(&"-DCMAKE_OSX_ARCHITECTURES=arm64".to_string()));
        assert!(args.contains(&"-DCMAKE_OSX_DEPLOYMENT_TARGET=10.15".to_string()));
        assert!(args.contains(&"-DBUILD_SHARED_LIBS=OFF".to_string()));
    }

    #[test]
    fn build_type_comes_first() {
        let recipe = builtin::libuv();
        let plan = plan_for_cell(
            &cell(
                Platform::Linux,
                Arch::X86_64,
                BuildConfig::Debug,
                CrtLinkage::Static,
            ),
            &recipe,
            &extras(),
            &PlaceholderSdkLocator,
        )
        .unwrap();

        assert_eq!(plan.defines[0], "-DCMAKE_BUILD_TYPE=Debug");
    }

    #[test]
    fn ios_x86_64_selects_simulator_sdk_even_for_device_intent() {
        let recipe = builtin::webp();
        let mut ex = extras();
        ex.intent = TargetIntent::Device;

        let plan = plan_for_cell(
            &cell(
                Platform::Ios,
                Arch::X86_64,
                BuildConfig::Release,
                CrtLinkage::Static,
            ),
            &recipe,
            &ex,
            &PlaceholderSdkLocator,
        )
        .unwrap();

        assert!(plan
            .defines
            .iter()
            .any(|d| d == "-DCMAKE_OSX_SYSROOT=<sdk:iphonesimulator>"));
    }

    #[test]
    fn ios_arm64_device_selects_device_sdk() {
        let recipe = builtin::webp();
        let mut ex = extras();
        ex.intent = TargetIntent::Device;

        let plan = plan_for_cell(
            &cell(
                Platform::Ios,
                Arch::Arm64,
                BuildConfig::Release,
                CrtLinkage::Static,
            ),
            &recipe,
            &ex,
            &PlaceholderSdkLocator,
        )
        .unwrap();

        assert!(plan
            .defines
            .iter()
            .any(|d| d == "-DCMAKE_OSX_SYSROOT=<sdk:iphoneos>"));
    }

    #[test]
    fn visionos_simulator_gets_target_suffix() {
        let recipe = builtin::webp();
        let mut ex = extras();
        ex.intent = TargetIntent::Simulator;

        let plan = plan_for_cell(
            &cell(
                Platform::VisionOs,
                Arch::Arm64,
                BuildConfig::Release,
                CrtLinkage::Static,
            ),
            &recipe,
            &ex,
            &PlaceholderSdkLocator,
        )
        .unwrap();

        assert!(plan
            .defines
            .iter()
            .any(|d| d == "-DCMAKE_C_FLAGS=-target arm64-apple-xros1.0-simulator"));
    }

    #[test]
    fn android_maps_abi_and_requires_ndk() {
        let recipe = builtin::webp();

        let err = plan_for_cell(
            &cell(
                Platform::Android,
                Arch::Arm,
                BuildConfig::Release,
                CrtLinkage::Static,
            ),
            &recipe,
            &extras(),
            &PlaceholderSdkLocator,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Android NDK"));

        let mut ex = extras();
        ex.ndk = Some(PathBuf::from("/opt/ndk"));
        let plan = plan_for_cell(
            &cell(
                Platform::Android,
                Arch::Arm,
                BuildConfig::Release,
                CrtLinkage::Static,
            ),
            &recipe,
            &ex,
            &PlaceholderSdkLocator,
        )
        .unwrap();

        assert!(plan
            .defines
            .contains(&"-DCMAKE_ANDROID_ARCH_ABI=armeabi-v7a".to_string()));
        assert!(plan.defines.contains(&"-DCMAKE_ANDROID_API=24".to_string()));
    }

    #[test]
    fn windows_debug_dynamic_crt() {
        let recipe = builtin::draco();
        let plan = plan_for_cell(
            &cell(
                Platform::Win,
                Arch::X86_64,
                BuildConfig::Debug,
                CrtLinkage::Dynamic,
            ),
            &recipe,
            &extras(),
            &PlaceholderSdkLocator,
        )
        .unwrap();

        assert!(plan
            .defines
            .contains(&"-DCMAKE_C_FLAGS_DEBUG=/MDd".to_string()));
        assert!(plan
            .defines
            .contains(&"-DCMAKE_MSVC_RUNTIME_LIBRARY=MultiThreadedDebugDLL".to_string()));
    }

    #[test]
    fn wasm_without_emsdk_still_plans() {
        let recipe = builtin::webp();
        let plan = plan_for_cell(
            &cell(
                Platform::Wasm,
                Arch::Wasm32,
                BuildConfig::Release,
                CrtLinkage::Static,
            ),
            &recipe,
            &extras(),
            &PlaceholderSdkLocator,
        )
        .unwrap();

        // No toolchain file, but the system name still marks the target;
        // the configure step will fail loudly if Emscripten is absent.
        assert!(plan
            .defines
            .contains(&"-DCMAKE_SYSTEM_NAME=Emscripten".to_string()));
        assert!(!plan
            .defines
            .iter()
            .any(|d| d.starts_with("-DCMAKE_TOOLCHAIN_FILE=")));
    }
}
