//! Remote repository description handed to the artifact fetcher: URL layout,
//! credentials, and mirror matching.

use pomstage_core::dependency::DependencyDeclaration;

/// Maven Central base URL.
pub const MAVEN_CENTRAL_URL: &str = "https://repo.maven.apache.org/maven2";

/// Repository id Maven reserves for Central.
pub const CENTRAL_ID: &str = "central";

/// A remote Maven repository with optional credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepository {
    pub id: String,
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl RemoteRepository {
    pub fn new(id: &str, url: &str) -> Self {
        Self {
            id: id.to_string(),
            url: url.trim_end_matches('/').to_string(),
            username: None,
            password: None,
        }
    }

    /// Construct the default Maven Central repository.
    pub fn maven_central() -> Self {
        Self::new(CENTRAL_ID, MAVEN_CENTRAL_URL)
    }

    /// Standard Maven layout directory for a coordinate.
    ///
    /// `org.slf4j:slf4j-api:2.0.9` becomes `org/slf4j/slf4j-api/2.0.9`
    pub fn coordinate_path(group: &str, artifact: &str, version: &str) -> String {
        format!("{}/{}/{}", group.replace('.', "/"), artifact, version)
    }

    /// Full URL of the artifact file for a resolved declaration, or `None`
    /// when the declaration has no version yet.
    pub fn artifact_url(&self, dep: &DependencyDeclaration) -> Option<String> {
        let version = dep.version()?;
        let filename = match dep.classifier() {
            Some(c) => format!(
                "{}-{version}-{c}.{}",
                dep.artifact_id(),
                dep.packaging().extension()
            ),
            None => format!(
                "{}-{version}.{}",
                dep.artifact_id(),
                dep.packaging().extension()
            ),
        };
        Some(format!(
            "{}/{}/{}",
            self.url,
            Self::coordinate_path(dep.group_id(), dep.artifact_id(), version),
            filename
        ))
    }

    /// Whether this repository has authentication configured.
    pub fn has_auth(&self) -> bool {
        self.username.is_some() || self.password.is_some()
    }

    /// Local (`file:`) or loopback repositories are not "external" for mirroring.
    pub fn is_external(&self) -> bool {
        let url = self.url.to_ascii_lowercase();
        !(url.starts_with("file:")
            || url.contains("://localhost")
            || url.contains("://127.0.0.1"))
    }
}

/// Evaluate a `<mirrorOf>` pattern against a repository.
///
/// Supports `*`, `external:*`, comma-separated ids and `!id` exclusions.
pub fn mirror_matches(pattern: &str, repo: &RemoteRepository) -> bool {
    let mut matched = false;
    for token in pattern.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if let Some(excluded) = token.strip_prefix('!') {
            if excluded == repo.id {
                return false;
            }
        } else if token == "*" || token == repo.id {
            matched = true;
        } else if token == "external:*" && repo.is_external() {
            matched = true;
        }
    }
    matched
}
