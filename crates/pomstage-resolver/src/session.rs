//! The mutable accumulator shared by every stage of one resolution pipeline.

use indexmap::IndexMap;

use pomstage_core::coordinate::ArtifactKey;
use pomstage_core::dependency::DependencyDeclaration;
use pomstage_maven::model::{ModelDependency, ProjectModel};
use pomstage_maven::repository::RemoteRepository;
use pomstage_maven::settings::Settings;

/// Insertion-ordered set of declarations keyed by [`ArtifactKey`].
///
/// Inserting a declaration whose key is already present replaces the stored
/// value in place, so re-inserting the same declarations never grows the set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationSet {
    entries: IndexMap<ArtifactKey, DependencyDeclaration>,
}

impl DeclarationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the key was not present before.
    pub fn insert(&mut self, declaration: DependencyDeclaration) -> bool {
        self.entries
            .insert(declaration.key(), declaration)
            .is_none()
    }

    pub fn get(&self, key: &ArtifactKey) -> Option<&DependencyDeclaration> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &ArtifactKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DependencyDeclaration> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<DependencyDeclaration> for DeclarationSet {
    fn from_iter<I: IntoIterator<Item = DependencyDeclaration>>(iter: I) -> Self {
        let mut set = Self::new();
        for declaration in iter {
            set.insert(declaration);
        }
        set
    }
}

impl Extend<DependencyDeclaration> for DeclarationSet {
    fn extend<I: IntoIterator<Item = DependencyDeclaration>>(&mut self, iter: I) {
        for declaration in iter {
            self.insert(declaration);
        }
    }
}

/// Per-pipeline state: the effective model, settings, declared and managed
/// dependencies, and the working set submitted for resolution.
#[derive(Debug, Clone, Default)]
pub struct WorkingSession {
    model: Option<ProjectModel>,
    settings: Option<Settings>,
    declared_dependencies: DeclarationSet,
    dependency_management: IndexMap<ArtifactKey, ModelDependency>,
    dependencies: DeclarationSet,
}

impl WorkingSession {
    /// An empty session with no project model.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(model: ProjectModel) -> Self {
        Self {
            model: Some(model),
            ..Self::default()
        }
    }

    pub fn model(&self) -> Option<&ProjectModel> {
        self.model.as_ref()
    }

    pub fn settings(&self) -> Option<&Settings> {
        self.settings.as_ref()
    }

    /// Dependencies declared directly by the project, after the management overlay.
    pub fn declared_dependencies(&self) -> &DeclarationSet {
        &self.declared_dependencies
    }

    /// The working set for the current request.
    pub fn dependencies(&self) -> &DeclarationSet {
        &self.dependencies
    }

    /// The management entry for `key`, if any.
    pub fn managed(&self, key: &ArtifactKey) -> Option<&ModelDependency> {
        self.dependency_management.get(key)
    }

    pub fn managed_dependencies(&self) -> impl Iterator<Item = &ModelDependency> {
        self.dependency_management.values()
    }

    pub fn is_offline(&self) -> bool {
        self.settings.as_ref().is_some_and(|s| s.offline)
    }

    /// Remote repositories from the settings, or Maven Central alone.
    pub fn remote_repositories(&self) -> Vec<RemoteRepository> {
        match &self.settings {
            Some(settings) => settings.effective_repositories(),
            None => vec![RemoteRepository::maven_central()],
        }
    }

    pub(crate) fn apply_settings(&mut self, settings: Settings) {
        self.settings = Some(settings);
    }

    /// Record a management entry. A later entry for the same key replaces
    /// the earlier one but keeps its position.
    pub(crate) fn manage(&mut self, dependency: ModelDependency) {
        if let Some(previous) = self
            .dependency_management
            .insert(dependency.key(), dependency)
        {
            tracing::debug!("management entry for {} replaced", previous.key());
        }
    }

    pub(crate) fn declare(&mut self, declaration: DependencyDeclaration) {
        self.declared_dependencies.insert(declaration);
    }

    pub(crate) fn push_dependency(&mut self, declaration: DependencyDeclaration) {
        self.dependencies.insert(declaration);
    }
}
