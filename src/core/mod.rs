//! Core domain types: platforms, architectures, build requests and cells.

pub mod errors;
pub mod matrix;
pub mod platform;
pub mod request;

pub use errors::ForgeError;
pub use platform::{Arch, Platform};
pub use request::{BuildCell, BuildConfig, BuildRequest, CrtLinkage, TargetIntent};
