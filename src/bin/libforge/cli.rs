//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use libforge::{BuildConfig, CrtLinkage, Platform, TargetIntent};

/// Libforge - build and package third-party native libraries
#[derive(Parser)]
#[command(name = "libforge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a library for a platform
    Build(BuildArgs),

    /// Print the expanded build matrix and toolchain plans as JSON,
    /// without running anything
    Plan(BuildArgs),

    /// List builtin library recipes
    Recipes,
}

#[derive(Args)]
pub struct BuildArgs {
    /// Builtin recipe name (see `libforge recipes`)
    pub library: String,

    /// Target platform
    #[arg(value_enum)]
    pub platform: Platform,

    /// Target architectures, comma-separated (default platform-specific;
    /// `universal` builds both mac architectures and fuses them)
    #[arg(long)]
    pub archs: Option<String>,

    /// Build configuration
    #[arg(long, value_enum, default_value_t = BuildConfig::Release)]
    pub config: BuildConfig,

    /// Output root directory
    #[arg(long, default_value = "build")]
    pub out: PathBuf,

    /// Git branch or tag to build (defaults to the recipe's pin)
    #[arg(long)]
    pub branch: Option<String>,

    /// Device/simulator target for iOS and visionOS
    #[arg(long, value_enum, default_value_t = TargetIntent::All)]
    pub target: TargetIntent,

    /// Windows C runtime linkage: static (/MT) or dynamic (/MD)
    #[arg(long, value_enum, default_value_t = CrtLinkage::Static)]
    pub crt: CrtLinkage,

    /// Android NDK root
    #[arg(long, env = "ANDROID_NDK_HOME")]
    pub ndk: Option<PathBuf>,

    /// Shallow git clone/fetch
    #[arg(long)]
    pub shallow: bool,

    /// Load the recipe from a TOML file instead of the builtin set
    #[arg(long)]
    pub recipe: Option<PathBuf>,
}
