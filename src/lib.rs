//! Libforge - a build orchestrator for third-party native libraries
//!
//! This crate builds C/C++ libraries (libwebp, draco, libuv, ...) out of
//! tree with CMake for a matrix of platforms and architectures, then
//! normalizes the build tools' inconsistent output layouts into a single
//! predictable packaging tree.

pub mod artifact;
pub mod builder;
pub mod core;
pub mod ops;
pub mod recipe;
pub mod sources;
pub mod util;

/// Test utilities and mocks for libforge unit tests.
///
/// Provides a recording command runner so tests can assert on which
/// external processes would have been spawned without running anything.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{
    errors::ForgeError, matrix, platform::Arch, platform::Platform, request::BuildCell,
    request::BuildConfig, request::BuildRequest, request::CrtLinkage, request::TargetIntent,
};

pub use recipe::{ArtifactSpec, Recipe};
pub use util::diagnostic::{Diagnostic, Report};
