//! Source acquisition.

pub mod git;

pub use git::{GitSource, GitSourceProvider, SourceProvider};
