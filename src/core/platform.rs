//! Target platforms and architectures.
//!
//! The per-platform architecture whitelists and the aggregate `universal`
//! group are plain data here; everything downstream (matrix expansion,
//! toolchain planning, artifact naming) keys off these tables.

use std::fmt;

use serde::Serialize;

/// User-facing token for the aggregate multi-architecture target.
pub const UNIVERSAL_TOKEN: &str = "universal";

/// A target platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Mac,
    Ios,
    #[value(name = "visionos")]
    VisionOs,
    Android,
    Win,
    Linux,
    Wasm,
}

impl Platform {
    /// The platform's name as used in CLI tokens and output paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Mac => "mac",
            Platform::Ios => "ios",
            Platform::VisionOs => "visionos",
            Platform::Android => "android",
            Platform::Win => "win",
            Platform::Linux => "linux",
            Platform::Wasm => "wasm",
        }
    }

    /// Concrete architectures this platform can build for.
    pub fn valid_archs(&self) -> &'static [Arch] {
        match self {
            Platform::Mac => &[Arch::X86_64, Arch::Arm64],
            Platform::Ios => &[Arch::X86_64, Arch::Arm64],
            Platform::VisionOs => &[Arch::Arm64],
            Platform::Android => &[Arch::Arm64, Arch::Arm, Arch::X86_64, Arch::X86],
            Platform::Win => &[Arch::X86_64, Arch::Arm64],
            Platform::Linux => &[Arch::X86_64, Arch::Arm64],
            Platform::Wasm => &[Arch::Wasm32],
        }
    }

    /// The constituents of the `universal` aggregate, if this platform
    /// supports it. Order is the composition order.
    pub fn aggregate_group(&self) -> Option<[Arch; 2]> {
        match self {
            Platform::Mac => Some([Arch::X86_64, Arch::Arm64]),
            _ => None,
        }
    }

    /// Default architecture tokens when `--archs` is not given.
    pub fn default_arch_tokens(&self) -> &'static [&'static str] {
        match self {
            Platform::Mac => &[UNIVERSAL_TOKEN],
            Platform::Ios | Platform::VisionOs | Platform::Android => &["arm64"],
            Platform::Win | Platform::Linux => &["x64"],
            Platform::Wasm => &["wasm32"],
        }
    }

    /// Static library extension on this platform.
    pub fn lib_extension(&self) -> &'static str {
        match self {
            Platform::Win => "lib",
            _ => "a",
        }
    }

    /// Whether outputs are segregated into device/simulator directories.
    pub fn is_apple_mobile(&self) -> bool {
        matches!(self, Platform::Ios | Platform::VisionOs)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete target architecture. Never an aggregate token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    #[serde(rename = "x86_64")]
    X86_64,
    Arm64,
    Arm,
    X86,
    Wasm32,
}

impl Arch {
    /// Parse a user token. `x64` and `x86_64` are the same architecture.
    pub fn parse(token: &str) -> Option<Arch> {
        match token {
            "x64" | "x86_64" => Some(Arch::X86_64),
            "arm64" => Some(Arch::Arm64),
            "arm" => Some(Arch::Arm),
            "x86" => Some(Arch::X86),
            "wasm32" => Some(Arch::Wasm32),
            _ => None,
        }
    }

    /// Canonical name, used in build and output directory paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::Arm64 => "arm64",
            Arch::Arm => "arm",
            Arch::X86 => "x86",
            Arch::Wasm32 => "wasm32",
        }
    }

    /// Android ABI identifier for this architecture.
    pub fn android_abi(&self) -> &'static str {
        match self {
            Arch::Arm64 => "arm64-v8a",
            Arch::Arm => "armeabi-v7a",
            Arch::X86_64 => "x86_64",
            Arch::X86 => "x86",
            Arch::Wasm32 => "wasm32",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
