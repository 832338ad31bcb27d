//! Artifact coordinates: parsing `group:artifact[:packaging[:classifier]][:version]`
//! and the version-less identity key used for set membership and management lookup.

use std::fmt;

use pomstage_util::errors::{StageError, StageResult};
use serde::Serialize;

use crate::packaging::PackagingType;

/// Coordinate identity: everything except version and scope.
///
/// Two declarations with the same key denote the same artifact, which is what
/// lets dependency management override the version or scope of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ArtifactKey {
    pub group_id: String,
    pub artifact_id: String,
    pub packaging: PackagingType,
    pub classifier: Option<String>,
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.packaging)?;
        if let Some(ref c) = self.classifier {
            write!(f, ":{c}")?;
        }
        Ok(())
    }
}

/// A parsed coordinate. The version is optional so that it can be supplied
/// later by dependency management.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub packaging: PackagingType,
    pub classifier: Option<String>,
    pub version: Option<String>,
}

impl Coordinate {
    /// Parse coordinate text.
    ///
    /// Accepted shapes:
    /// - `group:artifact`
    /// - `group:artifact:version`
    /// - `group:artifact:packaging:version`
    /// - `group:artifact:packaging:classifier:version`
    ///
    /// An empty packaging segment means `jar`; empty classifier or version
    /// segments mean "not given".
    pub fn parse(s: &str) -> StageResult<Self> {
        let input = s.trim();
        if input.is_empty() {
            return Err(StageError::parse(s, "coordinate must not be empty"));
        }
        if input.chars().any(char::is_whitespace) {
            return Err(StageError::parse(s, "coordinate must not contain whitespace"));
        }

        let parts: Vec<&str> = input.split(':').collect();
        let (group, artifact, packaging, classifier, version) = match parts.as_slice() {
            [g, a] => (*g, *a, "", "", ""),
            [g, a, v] => (*g, *a, "", "", *v),
            [g, a, p, v] => (*g, *a, *p, "", *v),
            [g, a, p, c, v] => (*g, *a, *p, *c, *v),
            _ => {
                return Err(StageError::parse(
                    s,
                    format!("expected 2 to 5 ':'-separated segments, found {}", parts.len()),
                ))
            }
        };

        if group.is_empty() {
            return Err(StageError::parse(s, "groupId must not be empty"));
        }
        if artifact.is_empty() {
            return Err(StageError::parse(s, "artifactId must not be empty"));
        }

        Ok(Self {
            group_id: group.to_string(),
            artifact_id: artifact.to_string(),
            packaging: PackagingType::from_type(packaging),
            classifier: non_empty(classifier),
            version: non_empty(version),
        })
    }

    pub fn key(&self) -> ArtifactKey {
        ArtifactKey {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            packaging: self.packaging.clone(),
            classifier: self.classifier.clone(),
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())?;
        if let Some(ref v) = self.version {
            write!(f, ":{v}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Coordinate {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
