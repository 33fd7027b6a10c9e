//! High-level operations the CLI dispatches to.

pub mod run_build;

pub use run_build::{plan_matrix, run_build, CellPlan};
