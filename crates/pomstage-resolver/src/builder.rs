//! Fluent construction of ad-hoc declarations, completed from dependency
//! management.

use pomstage_core::coordinate::{ArtifactKey, Coordinate};
use pomstage_core::dependency::{DependencyDeclaration, Exclusion};
use pomstage_core::packaging::PackagingType;
use pomstage_core::scope::ScopeType;
use pomstage_util::errors::{StageError, StageResult};

use crate::session::WorkingSession;
use crate::strategy::AcceptAllStrategy;
use crate::strategy_stage::StrategyStage;

/// Builds one declaration at a time against a session.
///
/// Version, scope and exclusions that the caller leaves unset are taken from
/// the management entry with the same [`ArtifactKey`]. Scope then defaults to
/// `compile` and exclusions to none.
pub struct DeclarationBuilder<'s> {
    session: &'s mut WorkingSession,
    group_id: String,
    artifact_id: String,
    packaging: PackagingType,
    classifier: Option<String>,
    version: Option<String>,
    scope: Option<ScopeType>,
    optional: bool,
    exclusions: Option<Vec<Exclusion>>,
}

impl<'s> DeclarationBuilder<'s> {
    pub(crate) fn new(session: &'s mut WorkingSession) -> Self {
        Self {
            session,
            group_id: String::new(),
            artifact_id: String::new(),
            packaging: PackagingType::Jar,
            classifier: None,
            version: None,
            scope: None,
            optional: false,
            exclusions: None,
        }
    }

    /// Seed every field of `declaration`. Its version counts as set only when
    /// present; its scope and exclusions (even an empty set) always count as set.
    pub(crate) fn from_declaration(
        session: &'s mut WorkingSession,
        declaration: &DependencyDeclaration,
    ) -> Self {
        let exclusions = declaration.exclusions();
        Self {
            session,
            group_id: declaration.group_id().to_string(),
            artifact_id: declaration.artifact_id().to_string(),
            packaging: declaration.packaging().clone(),
            classifier: declaration.classifier().map(str::to_string),
            version: declaration.version().map(str::to_string),
            scope: Some(declaration.scope()),
            optional: declaration.is_optional(),
            exclusions: Some(exclusions.iter().cloned().collect()),
        }
    }

    /// Replace group, artifact, packaging, classifier and (if given) version
    /// with those parsed from `text`.
    pub fn coordinate(self, text: &str) -> StageResult<Self> {
        Ok(self.with_coordinate(Coordinate::parse(text)?))
    }

    fn with_coordinate(mut self, coordinate: Coordinate) -> Self {
        let Coordinate {
            group_id,
            artifact_id,
            packaging,
            classifier,
            version,
        } = coordinate;
        self.group_id = group_id;
        self.artifact_id = artifact_id;
        self.packaging = packaging;
        self.classifier = classifier;
        if version.is_some() {
            self.version = version;
        }
        self
    }

    pub fn group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = group_id.into();
        self
    }

    pub fn artifact_id(mut self, artifact_id: impl Into<String>) -> Self {
        self.artifact_id = artifact_id.into();
        self
    }

    pub fn packaging(mut self, packaging: PackagingType) -> Self {
        self.packaging = packaging;
        self
    }

    pub fn classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn scope(mut self, scope: ScopeType) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn exclusion(mut self, exclusion: Exclusion) -> Self {
        self.exclusions.get_or_insert_with(Vec::new).push(exclusion);
        self
    }

    /// Add exclusions from `group:artifact` patterns (`g:*`, `*:*` allowed).
    pub fn exclusions<I, S>(mut self, patterns: I) -> StageResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = patterns
            .into_iter()
            .map(|p| Exclusion::parse(p.as_ref()))
            .collect::<StageResult<Vec<_>>>()?;
        self.exclusions.get_or_insert_with(Vec::new).extend(parsed);
        Ok(self)
    }

    /// The given classifier, or the one implied by the packaging
    /// (`test-jar` => `tests`, `ejb-client` => `client`).
    fn effective_classifier(&self) -> Option<String> {
        self.classifier
            .clone()
            .or_else(|| self.packaging.default_classifier().map(str::to_string))
    }

    fn key(&self) -> ArtifactKey {
        ArtifactKey {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            packaging: self.packaging.clone(),
            classifier: self.effective_classifier(),
        }
    }

    /// The declaration with management defaults applied.
    pub fn build(&self) -> StageResult<DependencyDeclaration> {
        if self.group_id.is_empty() || self.artifact_id.is_empty() {
            return Err(StageError::argument(
                "a dependency needs both groupId and artifactId",
            ));
        }
        let key = self.key();
        let managed = self.session.managed(&key);

        let version = self
            .version
            .clone()
            .or_else(|| managed.and_then(|m| m.version.clone()))
            .ok_or_else(|| StageError::UnresolvableVersion {
                coordinate: key.to_string(),
            })?;
        let scope = self
            .scope
            .or_else(|| managed.and_then(|m| m.scope))
            .unwrap_or_default();
        let exclusions = match (&self.exclusions, managed) {
            (Some(own), _) => own.clone(),
            (None, Some(m)) => m.exclusions.clone(),
            (None, None) => Vec::new(),
        };

        Ok(DependencyDeclaration::new(&self.group_id, &self.artifact_id)
            .with_packaging(key.packaging)
            .with_classifier(key.classifier)
            .with_version(Some(version))
            .with_scope(scope)
            .with_optional(self.optional)
            .with_exclusions(exclusions))
    }

    /// Add the current declaration to the working set and start another.
    /// Nothing is added when either declaration is invalid.
    pub fn and(self, coordinate: &str) -> StageResult<DeclarationBuilder<'s>> {
        let next = Coordinate::parse(coordinate)?;
        let declaration = self.build()?;
        let session = self.session;
        session.push_dependency(declaration);
        Ok(DeclarationBuilder::new(session).with_coordinate(next))
    }

    /// Add the current declaration to the working set and move on to
    /// strategy selection, admitting everything by default.
    pub fn resolve(self) -> StageResult<StrategyStage<'s>> {
        let declaration = self.build()?;
        let session = self.session;
        tracing::debug!("adding {declaration} to the working set");
        session.push_dependency(declaration);
        Ok(StrategyStage::new(session, Box::new(AcceptAllStrategy)))
    }
}
