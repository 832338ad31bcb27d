//! Packaging types (the POM `<type>` element) and their artifact stereotypes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The packaging type of an artifact.
///
/// Unknown types are preserved verbatim in [`PackagingType::Other`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PackagingType {
    #[default]
    Jar,
    War,
    Ear,
    Rar,
    Pom,
    Ejb,
    EjbClient,
    TestJar,
    MavenPlugin,
    Bundle,
    Other(String),
}

impl PackagingType {
    /// Map a `<type>` / packaging string to a packaging type.
    pub fn from_type(s: &str) -> Self {
        match s.trim() {
            "" | "jar" => Self::Jar,
            "war" => Self::War,
            "ear" => Self::Ear,
            "rar" => Self::Rar,
            "pom" => Self::Pom,
            "ejb" => Self::Ejb,
            "ejb-client" => Self::EjbClient,
            "test-jar" => Self::TestJar,
            "maven-plugin" => Self::MavenPlugin,
            "bundle" => Self::Bundle,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Jar => "jar",
            Self::War => "war",
            Self::Ear => "ear",
            Self::Rar => "rar",
            Self::Pom => "pom",
            Self::Ejb => "ejb",
            Self::EjbClient => "ejb-client",
            Self::TestJar => "test-jar",
            Self::MavenPlugin => "maven-plugin",
            Self::Bundle => "bundle",
            Self::Other(s) => s,
        }
    }

    /// File extension of the artifact stored in a repository.
    pub fn extension(&self) -> &str {
        match self {
            Self::Ejb | Self::EjbClient | Self::TestJar | Self::MavenPlugin | Self::Bundle => {
                "jar"
            }
            other => other.as_str(),
        }
    }

    /// Classifier implied by the type when the declaration gives none.
    pub fn default_classifier(&self) -> Option<&'static str> {
        match self {
            Self::TestJar => Some("tests"),
            Self::EjbClient => Some("client"),
            _ => None,
        }
    }
}

impl fmt::Display for PackagingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for PackagingType {
    fn from(s: String) -> Self {
        Self::from_type(&s)
    }
}

impl From<PackagingType> for String {
    fn from(p: PackagingType) -> Self {
        p.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_type_is_jar() {
        assert_eq!(PackagingType::from_type(""), PackagingType::Jar);
    }

    #[test]
    fn stereotypes() {
        assert_eq!(PackagingType::TestJar.extension(), "jar");
        assert_eq!(PackagingType::TestJar.default_classifier(), Some("tests"));
        assert_eq!(PackagingType::EjbClient.default_classifier(), Some("client"));
        assert_eq!(PackagingType::War.default_classifier(), None);
    }

    #[test]
    fn unknown_type_round_trips() {
        let p = PackagingType::from_type("aar");
        assert_eq!(p, PackagingType::Other("aar".to_string()));
        assert_eq!(p.as_str(), "aar");
        assert_eq!(p.extension(), "aar");
    }
}
