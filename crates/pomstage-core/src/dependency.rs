use std::collections::BTreeSet;
use std::fmt;

use pomstage_util::errors::{StageError, StageResult};
use serde::Serialize;

use crate::coordinate::{ArtifactKey, Coordinate};
use crate::packaging::PackagingType;
use crate::scope::ScopeType;

/// A transitive dependency to exclude, `*` matching anything.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Exclusion {
    pub group_id: String,
    pub artifact_id: String,
}

impl Exclusion {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }

    /// Parse `group:artifact` or a bare `group` (all of its artifacts).
    pub fn parse(s: &str) -> StageResult<Self> {
        let input = s.trim();
        let parts: Vec<&str> = input.split(':').collect();
        match parts.as_slice() {
            [g] if !g.is_empty() => Ok(Self::new(*g, "*")),
            [g, a] if !g.is_empty() && !a.is_empty() => Ok(Self::new(*g, *a)),
            _ => Err(StageError::parse(
                s,
                "exclusions have the form groupId[:artifactId]",
            )),
        }
    }

    pub fn matches(&self, group_id: &str, artifact_id: &str) -> bool {
        (self.group_id == "*" || self.group_id == group_id)
            && (self.artifact_id == "*" || self.artifact_id == artifact_id)
    }
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

/// An immutable dependency declaration.
///
/// Equality compares every field; set membership and management lookups go
/// through [`DependencyDeclaration::key`], which ignores version and scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DependencyDeclaration {
    group_id: String,
    artifact_id: String,
    packaging: PackagingType,
    #[serde(skip_serializing_if = "Option::is_none")]
    classifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    scope: ScopeType,
    optional: bool,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    exclusions: BTreeSet<Exclusion>,
}

impl DependencyDeclaration {
    /// A `jar`, compile-scoped declaration without version.
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            packaging: PackagingType::Jar,
            classifier: None,
            version: None,
            scope: ScopeType::Compile,
            optional: false,
            exclusions: BTreeSet::new(),
        }
    }

    pub fn from_coordinate(coordinate: Coordinate) -> Self {
        Self {
            group_id: coordinate.group_id,
            artifact_id: coordinate.artifact_id,
            packaging: coordinate.packaging,
            classifier: coordinate.classifier,
            version: coordinate.version,
            scope: ScopeType::Compile,
            optional: false,
            exclusions: BTreeSet::new(),
        }
    }

    /// Shorthand for parsing a coordinate into a compile-scoped declaration.
    pub fn parse(s: &str) -> StageResult<Self> {
        Coordinate::parse(s).map(Self::from_coordinate)
    }

    pub fn with_packaging(mut self, packaging: PackagingType) -> Self {
        self.packaging = packaging;
        self
    }

    pub fn with_classifier(mut self, classifier: Option<String>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }

    pub fn with_scope(mut self, scope: ScopeType) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn with_exclusions(mut self, exclusions: impl IntoIterator<Item = Exclusion>) -> Self {
        self.exclusions = exclusions.into_iter().collect();
        self
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    pub fn packaging(&self) -> &PackagingType {
        &self.packaging
    }

    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn scope(&self) -> ScopeType {
        self.scope
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn exclusions(&self) -> &BTreeSet<Exclusion> {
        &self.exclusions
    }

    /// Identity key: `(group, artifact, packaging, classifier)`.
    pub fn key(&self) -> ArtifactKey {
        ArtifactKey {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            packaging: self.packaging.clone(),
            classifier: self.classifier.clone(),
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            packaging: self.packaging.clone(),
            classifier: self.classifier.clone(),
            version: self.version.clone(),
        }
    }
}

impl fmt::Display for DependencyDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coordinate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_ignores_version_and_scope() {
        let a = DependencyDeclaration::parse("org.example:lib:1.0").unwrap();
        let b = DependencyDeclaration::parse("org.example:lib:2.0")
            .unwrap()
            .with_scope(ScopeType::Test);
        assert_eq!(a.key(), b.key());
        assert_ne!(a, b);
    }

    #[test]
    fn key_includes_classifier() {
        let a = DependencyDeclaration::parse("org.example:lib:jar:1.0").unwrap();
        let b = DependencyDeclaration::parse("org.example:lib:jar:sources:1.0").unwrap();
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn exclusion_wildcards() {
        let all = Exclusion::parse("*:*").unwrap();
        assert!(all.matches("org.any", "thing"));
        let group = Exclusion::parse("commons-logging").unwrap();
        assert!(group.matches("commons-logging", "commons-logging"));
        assert!(!group.matches("org.slf4j", "commons-logging"));
    }

    #[test]
    fn exclusion_rejects_empty_segments() {
        assert!(Exclusion::parse("").is_err());
        assert!(Exclusion::parse("g:").is_err());
        assert!(Exclusion::parse("g:a:b").is_err());
    }
}
