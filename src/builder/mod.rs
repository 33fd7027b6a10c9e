//! Toolchain planning and build execution.

pub mod executor;
pub mod sdk;
pub mod toolchain;

pub use executor::Executor;
pub use sdk::{AppleSdk, PlaceholderSdkLocator, SdkLocator, XcrunSdkLocator};
pub use toolchain::{plan_for_cell, PlanExtras, ToolchainPlan};
