use std::fmt;
use std::str::FromStr;

use pomstage_util::errors::StageError;
use serde::{Deserialize, Serialize};

/// Maven dependency scope.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ScopeType {
    #[default]
    Compile,
    Runtime,
    Test,
    System,
    Import,
    Provided,
}

impl ScopeType {
    /// Every scope, in declaration order.
    pub const ALL: [ScopeType; 6] = [
        Self::Compile,
        Self::Runtime,
        Self::Test,
        Self::System,
        Self::Import,
        Self::Provided,
    ];

    /// Scopes imported by `import_test_dependencies`.
    pub const TEST_SCOPES: [ScopeType; 1] = [Self::Test];

    /// Scopes imported by `import_defined_dependencies`.
    pub const DEFINED_SCOPES: [ScopeType; 4] =
        [Self::Compile, Self::Import, Self::Runtime, Self::System];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compile => "compile",
            Self::Runtime => "runtime",
            Self::Test => "test",
            Self::System => "system",
            Self::Import => "import",
            Self::Provided => "provided",
        }
    }
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScopeType {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|scope| scope.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                StageError::parse(
                    s,
                    "unknown scope, expected one of compile, runtime, test, system, import, provided",
                )
            })
    }
}
