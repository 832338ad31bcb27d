//! The effective project model handed to the resolver: a POM whose parent
//! chain has been merged and whose properties have been interpolated,
//! converted into pomstage's typed coordinates.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use pomstage_core::coordinate::ArtifactKey;
use pomstage_core::dependency::Exclusion;
use pomstage_core::packaging::PackagingType;
use pomstage_core::scope::ScopeType;
use pomstage_util::errors::{StageError, StageResult};

use crate::pom::{parse_pom, Pom, PomDependency};

/// Parent chains deeper than this are treated as a descriptor error.
const MAX_PARENT_DEPTH: usize = 32;

/// An effective (fully merged) project model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectModel {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub packaging: PackagingType,
    pub dependencies: Vec<ModelDependency>,
    /// `None` when the project declares no `<dependencyManagement>`.
    pub dependency_management: Option<Vec<ModelDependency>>,
}

/// A dependency as declared in the model. Unlike a
/// `DependencyDeclaration`, version and scope may be left unset so that
/// dependency management can fill them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub packaging: PackagingType,
    pub classifier: Option<String>,
    pub version: Option<String>,
    pub scope: Option<ScopeType>,
    pub optional: bool,
    pub exclusions: Vec<Exclusion>,
}

impl ModelDependency {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            packaging: PackagingType::Jar,
            classifier: None,
            version: None,
            scope: None,
            optional: false,
            exclusions: Vec::new(),
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn scope(mut self, scope: ScopeType) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn exclusion(mut self, exclusion: Exclusion) -> Self {
        self.exclusions.push(exclusion);
        self
    }

    /// Convert a raw POM dependency, applying the artifact type stereotypes
    /// (`test-jar` implies classifier `tests`, `ejb-client` implies `client`).
    pub fn from_pom(dep: &PomDependency) -> StageResult<Self> {
        let packaging = PackagingType::from_type(dep.type_.as_deref().unwrap_or("jar"));
        let classifier = dep
            .classifier
            .clone()
            .filter(|c| !c.is_empty())
            .or_else(|| packaging.default_classifier().map(str::to_string));
        let scope = dep
            .scope
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<ScopeType>)
            .transpose()?;
        let exclusions = dep
            .exclusions
            .iter()
            .map(|e| Exclusion::new(&e.group_id, e.artifact_id.as_deref().unwrap_or("*")))
            .collect();

        Ok(Self {
            group_id: dep.group_id.clone(),
            artifact_id: dep.artifact_id.clone(),
            packaging,
            classifier,
            version: dep.version.clone().filter(|v| !v.is_empty()),
            scope,
            optional: dep.optional,
            exclusions,
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

impl ProjectModel {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            packaging: PackagingType::Jar,
            dependencies: Vec::new(),
            dependency_management: None,
        }
    }

    pub fn dependency(mut self, dep: ModelDependency) -> Self {
        self.dependencies.push(dep);
        self
    }

    pub fn managed(mut self, dep: ModelDependency) -> Self {
        self.dependency_management
            .get_or_insert_with(Vec::new)
            .push(dep);
        self
    }

    /// Convert an already merged and interpolated POM.
    pub fn from_pom(pom: &Pom) -> StageResult<Self> {
        let group_id = pom.effective_group_id().ok_or_else(|| StageError::Descriptor {
            message: "POM has no groupId and no parent to inherit one from".to_string(),
        })?;
        let artifact_id = pom.artifact_id.as_deref().ok_or_else(|| StageError::Descriptor {
            message: "POM is missing <artifactId>".to_string(),
        })?;
        let version = pom.effective_version().ok_or_else(|| StageError::Descriptor {
            message: "POM has no version and no parent to inherit one from".to_string(),
        })?;

        let dependencies = pom
            .dependencies
            .iter()
            .map(ModelDependency::from_pom)
            .collect::<StageResult<Vec<_>>>()?;
        let dependency_management = pom
            .dependency_management
            .as_ref()
            .map(|managed| {
                managed
                    .iter()
                    .map(ModelDependency::from_pom)
                    .collect::<StageResult<Vec<_>>>()
            })
            .transpose()?;

        Ok(Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            packaging: PackagingType::from_type(pom.packaging.as_deref().unwrap_or("jar")),
            dependencies,
            dependency_management,
        })
    }
}

/// Load a `pom.xml` and build its effective model.
pub fn load_effective_model(path: &Path) -> StageResult<ProjectModel> {
    let pom = load_effective_pom(path)?;
    ProjectModel::from_pom(&pom)
}

/// Load a `pom.xml`, merge every parent reachable on disk, and interpolate.
pub fn load_effective_pom(path: &Path) -> StageResult<Pom> {
    let mut visited = HashSet::new();
    let mut pom = load_merged(path, &mut visited)?;
    pom.resolve_properties();
    Ok(pom)
}

fn load_merged(path: &Path, visited: &mut HashSet<PathBuf>) -> StageResult<Pom> {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical.clone()) || visited.len() > MAX_PARENT_DEPTH {
        return Err(StageError::Descriptor {
            message: format!("cyclic parent chain through {}", path.display()),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| StageError::Descriptor {
        message: format!("Failed to read {}: {e}", path.display()),
    })?;
    let mut pom = parse_pom(&content)?;

    let Some(parent_ref) = pom.parent.clone() else {
        return Ok(pom);
    };

    let Some(parent_path) = local_parent_path(path, parent_ref.relative_path.as_deref()) else {
        tracing::warn!(
            "parent {}:{}:{} of {} is not available locally; inherited values are ignored",
            parent_ref.group_id,
            parent_ref.artifact_id,
            parent_ref.version,
            path.display()
        );
        return Ok(pom);
    };

    let parent = load_merged(&parent_path, visited)?;
    let matches = parent.effective_group_id() == Some(parent_ref.group_id.as_str())
        && parent.artifact_id.as_deref() == Some(parent_ref.artifact_id.as_str());
    if matches {
        tracing::debug!("merging parent {} into {}", parent_path.display(), path.display());
        pom.apply_parent(&parent);
    } else {
        tracing::warn!(
            "{} does not match parent {}:{}; inherited values are ignored",
            parent_path.display(),
            parent_ref.group_id,
            parent_ref.artifact_id
        );
    }
    Ok(pom)
}

/// Where the parent POM lives relative to `pom_path`, if it exists on disk.
fn local_parent_path(pom_path: &Path, relative_path: Option<&str>) -> Option<PathBuf> {
    let relative = match relative_path {
        Some("") => return None,
        Some(rel) => rel,
        None => "../pom.xml",
    };
    let dir = pom_path.parent().unwrap_or(Path::new("."));
    let mut candidate = dir.join(relative);
    if candidate.is_dir() {
        candidate = candidate.join("pom.xml");
    }
    candidate.is_file().then_some(candidate)
}
