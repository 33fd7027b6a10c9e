//! Error taxonomy for the orchestrator.
//!
//! Which variants are fatal is a per-stage policy decision, not a property
//! of the type: the matrix and executor stages abort the run, while the
//! resolver and header packager downgrade their variants to warnings for
//! non-required artifacts.

use thiserror::Error;

use crate::core::platform::Platform;
use crate::util::diagnostic::Diagnostic;

/// An error raised by one of the orchestration stages.
#[derive(Debug, Error)]
pub enum ForgeError {
    /// Architecture token not in the platform's whitelist. Raised before
    /// any external process starts.
    #[error("invalid architecture for {platform}: {token}")]
    InvalidArchitecture {
        platform: Platform,
        token: String,
        valid: Vec<String>,
    },

    /// A (platform, option) combination the toolchain cannot express.
    #[error("unsupported combination for {platform}: {detail}")]
    InvalidPlatformCombination { platform: Platform, detail: String },

    /// A required external tool is not installed. Raised before the matrix
    /// loop begins.
    #[error("required tool `{tool}` not found")]
    ExternalToolMissing { tool: String, hint: String },

    /// Configure or build step exited nonzero. Always fatal, aborts the
    /// whole run.
    #[error("`{command}` failed with exit code {code} while building {cell}")]
    ExternalCommandFailure {
        command: String,
        code: i32,
        cell: String,
    },

    /// An artifact could not be located in a cell's build output. Fatal
    /// only for the recipe's required artifact, after all cells complete.
    #[error("artifact `{name}` unresolved for {cell}")]
    ArtifactUnresolved {
        name: String,
        cell: String,
        reason: String,
    },

    /// The build-generated feature header was not found. Never fatal, but
    /// downstream compilation will fail without it.
    #[error("generated header `{file_name}` not found")]
    GeneratedHeaderMissing { file_name: String, searched: String },
}

impl ForgeError {
    /// Convert to a user-facing diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ForgeError::InvalidArchitecture {
                platform,
                token,
                valid,
            } => Diagnostic::error(format!(
                "invalid architecture for {}: {}",
                platform, token
            ))
            .with_context(format!("valid architectures: {}", valid.join(", "))),

            ForgeError::InvalidPlatformCombination { platform, detail } => {
                Diagnostic::error(format!("unsupported combination for {}", platform))
                    .with_context(detail.clone())
            }

            ForgeError::ExternalToolMissing { tool, hint } => {
                Diagnostic::error(format!("required tool `{}` not found", tool))
                    .with_context(hint.clone())
            }

            ForgeError::ExternalCommandFailure {
                command,
                code,
                cell,
            } => Diagnostic::error(format!("command failed while building {}", cell))
                .with_context(format!("{} exited with code {}", command, code)),

            ForgeError::ArtifactUnresolved { name, cell, reason } => {
                Diagnostic::warning(format!("artifact `{}` unresolved for {}", name, cell))
                    .with_context(reason.clone())
            }

            ForgeError::GeneratedHeaderMissing {
                file_name,
                searched,
            } => Diagnostic::warning(format!(
                "generated header `{}` not found; builds against this package will fail",
                file_name
            ))
            .with_context(format!("searched {}", searched)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_architecture_diagnostic_names_the_token() {
        let err = ForgeError::InvalidArchitecture {
            platform: Platform::Linux,
            token: "mips".into(),
            valid: vec!["x64".into(), "arm64".into()],
        };

        let text = err.to_diagnostic().format(false);
        assert!(text.contains("mips"));
        assert!(text.contains("x64, arm64"));
    }

    #[test]
    fn unresolved_artifact_is_a_warning_diagnostic() {
        let err = ForgeError::ArtifactUnresolved {
            name: "webpmux".into(),
            cell: "mac arm64 (Release)".into(),
            reason: "no candidate path matched".into(),
        };

        assert!(err.to_diagnostic().format(false).starts_with("warning:"));
    }
}
