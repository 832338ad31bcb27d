//! The entry stage of a resolution pipeline.

use std::path::Path;

use pomstage_core::dependency::DependencyDeclaration;
use pomstage_core::scope::ScopeType;
use pomstage_maven::model::{load_effective_model, ModelDependency, ProjectModel};
use pomstage_maven::settings::Settings;
use pomstage_util::errors::{StageError, StageResult};

use crate::builder::DeclarationBuilder;
use crate::session::WorkingSession;
use crate::strategy::{AcceptAllStrategy, AcceptScopesStrategy, CombinedStrategy, ResolutionStrategy};
use crate::strategy_stage::StrategyStage;

/// A session populated from an effective project model, ready to select
/// dependencies for resolution.
#[derive(Debug, Clone)]
pub struct ConfiguredResolveStage {
    session: WorkingSession,
}

impl ConfiguredResolveStage {
    /// Ingest the session's project model: management entries first, then the
    /// direct dependencies with the management overlay applied.
    ///
    /// Fails with [`StageError::State`] when the session has no model.
    pub fn new(mut session: WorkingSession) -> StageResult<Self> {
        let model = session.model().cloned().ok_or_else(|| StageError::State {
            message: "no effective project model has been loaded".to_string(),
        })?;

        for managed in model.dependency_management.iter().flatten() {
            session.manage(managed.clone());
        }
        for dependency in &model.dependencies {
            let declaration = ingest(&session, dependency);
            session.declare(declaration);
        }
        tracing::debug!(
            "configured {}:{}:{} with {} declared and {} managed dependencies",
            model.group_id,
            model.artifact_id,
            model.version,
            session.declared_dependencies().len(),
            session.managed_dependencies().count()
        );
        Ok(Self { session })
    }

    pub fn from_model(model: ProjectModel) -> StageResult<Self> {
        Self::new(WorkingSession::with_model(model))
    }

    /// Load the effective model of a `pom.xml` and ingest it.
    pub fn from_pom_file(path: &Path) -> StageResult<Self> {
        Self::from_model(load_effective_model(path)?)
    }

    pub fn session(&self) -> &WorkingSession {
        &self.session
    }

    /// Push every declared dependency with a scope in `scopes` into the
    /// working set; the returned stage admits only those scopes.
    pub fn import_scoped_dependencies(
        &mut self,
        scopes: impl IntoIterator<Item = ScopeType>,
    ) -> StrategyStage<'_> {
        let strategy = self.push_scoped(scopes);
        StrategyStage::new(&self.session, Box::new(strategy))
    }

    /// Like [`Self::import_scoped_dependencies`], with `strategy` applied
    /// first and the scope acceptance as the secondary check.
    pub fn import_scoped_dependencies_using(
        &mut self,
        scopes: impl IntoIterator<Item = ScopeType>,
        strategy: impl ResolutionStrategy + 'static,
    ) -> StrategyStage<'_> {
        let scoped = self.push_scoped(scopes);
        StrategyStage::new(
            &self.session,
            Box::new(CombinedStrategy::new(strategy, scoped)),
        )
    }

    pub fn import_test_dependencies(&mut self) -> StrategyStage<'_> {
        self.import_scoped_dependencies(ScopeType::TEST_SCOPES)
    }

    pub fn import_test_dependencies_using(
        &mut self,
        strategy: impl ResolutionStrategy + 'static,
    ) -> StrategyStage<'_> {
        self.import_scoped_dependencies_using(ScopeType::TEST_SCOPES, strategy)
    }

    pub fn import_defined_dependencies(&mut self) -> StrategyStage<'_> {
        self.import_scoped_dependencies(ScopeType::DEFINED_SCOPES)
    }

    pub fn import_defined_dependencies_using(
        &mut self,
        strategy: impl ResolutionStrategy + 'static,
    ) -> StrategyStage<'_> {
        self.import_scoped_dependencies_using(ScopeType::DEFINED_SCOPES, strategy)
    }

    fn push_scoped(&mut self, scopes: impl IntoIterator<Item = ScopeType>) -> AcceptScopesStrategy {
        let strategy = AcceptScopesStrategy::new(scopes);
        let selected: Vec<DependencyDeclaration> = self
            .session
            .declared_dependencies()
            .iter()
            .filter(|d| strategy.filter().accepts(d))
            .cloned()
            .collect();
        tracing::debug!(
            "importing {} dependencies for scopes [{}]",
            selected.len(),
            strategy
                .filter()
                .scopes()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        for declaration in selected {
            self.session.push_dependency(declaration);
        }
        strategy
    }

    /// A new stage over a copy of this session with the settings file applied.
    /// This stage is left untouched.
    pub fn configure_settings(&self, path: impl AsRef<Path>) -> StageResult<ConfiguredResolveStage> {
        let settings = Settings::from_path(path.as_ref())?;
        let mut session = self.session.clone();
        session.apply_settings(settings);
        Self::new(session)
    }

    /// Start an ad-hoc declaration.
    pub fn add_dependency(&mut self) -> DeclarationBuilder<'_> {
        DeclarationBuilder::new(&mut self.session)
    }

    /// Start an ad-hoc declaration from coordinate text.
    pub fn add_dependency_coordinate(&mut self, coordinate: &str) -> StageResult<DeclarationBuilder<'_>> {
        DeclarationBuilder::new(&mut self.session).coordinate(coordinate)
    }

    /// Resolve a single coordinate, bypassing scope selection.
    pub fn resolve(&mut self, coordinate: &str) -> StageResult<StrategyStage<'_>> {
        self.resolve_all([coordinate])
    }

    pub fn resolve_all<I, S>(&mut self, coordinates: I) -> StageResult<StrategyStage<'_>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut built = Vec::new();
        for coordinate in coordinates {
            built.push(self.add_dependency_coordinate(coordinate.as_ref())?.build()?);
        }
        self.push_explicit(built)
    }

    pub fn resolve_declaration(
        &mut self,
        declaration: DependencyDeclaration,
    ) -> StageResult<StrategyStage<'_>> {
        self.resolve_declarations([declaration])
    }

    pub fn resolve_declarations(
        &mut self,
        declarations: impl IntoIterator<Item = DependencyDeclaration>,
    ) -> StageResult<StrategyStage<'_>> {
        let mut built = Vec::new();
        for declaration in declarations {
            built.push(DeclarationBuilder::from_declaration(&mut self.session, &declaration).build()?);
        }
        self.push_explicit(built)
    }

    fn push_explicit(
        &mut self,
        declarations: Vec<DependencyDeclaration>,
    ) -> StageResult<StrategyStage<'_>> {
        if declarations.is_empty() {
            return Err(StageError::argument("at least one coordinate is required"));
        }
        tracing::debug!("resolving {} explicit coordinate(s)", declarations.len());
        for declaration in declarations {
            self.session.push_dependency(declaration);
        }
        Ok(StrategyStage::new(&self.session, Box::new(AcceptAllStrategy)))
    }
}

/// A direct dependency with management applied: a managed version replaces
/// the declared one, scope and exclusions are only filled in when unset.
fn ingest(session: &WorkingSession, dependency: &ModelDependency) -> DependencyDeclaration {
    let managed = session.managed(&dependency.key());
    let version = managed
        .and_then(|m| m.version.clone())
        .or_else(|| dependency.version.clone());
    let scope = dependency
        .scope
        .or_else(|| managed.and_then(|m| m.scope))
        .unwrap_or_default();
    let exclusions = match managed {
        Some(m) if dependency.exclusions.is_empty() => m.exclusions.clone(),
        _ => dependency.exclusions.clone(),
    };
    if version.is_none() {
        tracing::debug!("{} has no version yet", dependency.key());
    }

    DependencyDeclaration::new(&dependency.group_id, &dependency.artifact_id)
        .with_packaging(dependency.packaging.clone())
        .with_classifier(dependency.classifier.clone())
        .with_version(version)
        .with_scope(scope)
        .with_optional(dependency.optional)
        .with_exclusions(exclusions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomstage_core::dependency::Exclusion;

    #[test]
    fn stage_requires_a_model() {
        let err = ConfiguredResolveStage::new(WorkingSession::new()).unwrap_err();
        assert!(matches!(err, StageError::State { .. }));
    }

    #[test]
    fn ingestion_overlay() {
        let model = ProjectModel::new("g", "app", "1")
            .managed(
                ModelDependency::new("g", "a")
                    .version("1.5")
                    .scope(ScopeType::Runtime)
                    .exclusion(Exclusion::new("x", "*")),
            )
            .dependency(ModelDependency::new("g", "a").version("1.0"))
            .dependency(
                ModelDependency::new("g", "b")
                    .scope(ScopeType::Test),
            );
        let stage = ConfiguredResolveStage::from_model(model).unwrap();
        let declared: Vec<_> = stage.session().declared_dependencies().iter().collect();

        assert_eq!(declared[0].version(), Some("1.5"));
        assert_eq!(declared[0].scope(), ScopeType::Runtime);
        assert_eq!(declared[0].exclusions().len(), 1);
        assert_eq!(declared[1].version(), None);
        assert_eq!(declared[1].scope(), ScopeType::Test);
    }

    #[test]
    fn declared_scope_survives_management() {
        let model = ProjectModel::new("g", "app", "1")
            .managed(ModelDependency::new("g", "a").version("2").scope(ScopeType::Provided))
            .dependency(ModelDependency::new("g", "a").scope(ScopeType::Test));
        let stage = ConfiguredResolveStage::from_model(model).unwrap();
        let declared = stage.session().declared_dependencies().iter().next().unwrap();
        assert_eq!(declared.scope(), ScopeType::Test);
        assert_eq!(declared.version(), Some("2"));
    }

    #[test]
    fn empty_coordinate_list_is_rejected() {
        let mut stage = ConfiguredResolveStage::from_model(ProjectModel::new("g", "a", "1")).unwrap();
        let err = stage.resolve_all(Vec::<String>::new()).err().unwrap();
        assert!(matches!(err, StageError::Argument { .. }));
    }
}
