use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

/// Unified error type raised by every resolution stage.
#[derive(Debug, Error, Diagnostic)]
pub enum StageError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid caller input (empty settings path, empty coordinate list, ...).
    #[error("Invalid argument: {message}")]
    Argument { message: String },

    /// A stage precondition was violated.
    #[error("Illegal state: {message}")]
    #[diagnostic(help("Load an effective POM before configuring the resolver"))]
    State { message: String },

    /// Malformed coordinate, exclusion or scope text.
    #[error("Unable to parse `{input}`: {message}")]
    #[diagnostic(help(
        "Coordinates have the form groupId:artifactId[:packaging[:classifier]][:version]"
    ))]
    Parse { input: String, message: String },

    /// The project descriptor could not be read or understood.
    #[error("Descriptor error: {message}")]
    #[diagnostic(help("Check your pom.xml for syntax errors"))]
    Descriptor { message: String },

    /// The settings file is missing, malformed or fails validation.
    #[error("Invalid configuration in {path}: {message}")]
    #[diagnostic(help("Check the settings file for malformed XML or missing required elements"))]
    InvalidConfig { path: String, message: String },

    /// Neither the caller nor dependency management supplied a version.
    #[error("Unable to determine version for {coordinate}")]
    #[diagnostic(help("Declare a version or add a <dependencyManagement> entry for the artifact"))]
    UnresolvableVersion { coordinate: String },

    /// One or more admitted candidates could not be resolved.
    #[error("Dependency resolution failed for {} artifact(s):\n{}", .failures.len(), list_failures(.failures))]
    Resolution { failures: Vec<UnresolvedDependency> },
}

/// Convenience alias used across the library crates.
pub type StageResult<T> = Result<T, StageError>;

/// A candidate that could not be resolved, together with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedDependency {
    pub coordinate: String,
    pub reason: UnresolvedReason,
}

/// Why a single candidate failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// No version after the management overlay.
    MissingVersion,
    /// The version still references an undefined `${property}`.
    UnresolvedProperty(String),
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingVersion => f.write_str("no version declared or managed"),
            Self::UnresolvedProperty(p) => write!(f, "unresolved property ${{{p}}}"),
        }
    }
}

impl fmt::Display for UnresolvedDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.coordinate, self.reason)
    }
}

fn list_failures(failures: &[UnresolvedDependency]) -> String {
    failures
        .iter()
        .map(|u| format!("  {u}"))
        .collect::<Vec<_>>()
        .join("\n")
}

impl StageError {
    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument {
            message: message.into(),
        }
    }

    pub fn parse(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            message: message.into(),
        }
    }

    pub fn invalid_config(path: impl fmt::Display, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            path: path.to_string(),
            message: message.into(),
        }
    }
}
