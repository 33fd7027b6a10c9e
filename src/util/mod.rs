//! Shared utilities

pub mod diagnostic;
pub mod fs;
pub mod hash;
pub mod process;

pub use diagnostic::{Diagnostic, Report};
pub use process::{CommandRunner, ProcessBuilder, SystemRunner};
