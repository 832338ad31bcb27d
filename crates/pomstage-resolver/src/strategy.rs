//! Resolution strategies: predicates deciding which candidates of the working
//! set are actually resolved, and in which order.

use pomstage_core::dependency::{DependencyDeclaration, Exclusion};
use pomstage_core::packaging::PackagingType;
use pomstage_core::scope::ScopeType;
use pomstage_util::errors::{StageError, StageResult};

use crate::filter::ScopeFilter;

/// Decides which candidates are admitted for resolution.
pub trait ResolutionStrategy {
    /// Whether a single candidate is admitted.
    fn accepts(&self, candidate: &DependencyDeclaration) -> bool;

    /// Admitted candidates in output order. The default keeps input order.
    fn apply(&self, candidates: &[DependencyDeclaration]) -> Vec<DependencyDeclaration> {
        candidates
            .iter()
            .filter(|c| self.accepts(c))
            .cloned()
            .collect()
    }
}

impl<S: ResolutionStrategy + ?Sized> ResolutionStrategy for Box<S> {
    fn accepts(&self, candidate: &DependencyDeclaration) -> bool {
        (**self).accepts(candidate)
    }

    fn apply(&self, candidates: &[DependencyDeclaration]) -> Vec<DependencyDeclaration> {
        (**self).apply(candidates)
    }
}

/// Admits every candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllStrategy;

impl ResolutionStrategy for AcceptAllStrategy {
    fn accepts(&self, _candidate: &DependencyDeclaration) -> bool {
        true
    }
}

/// Admits candidates whose scope is in a fixed set.
#[derive(Debug, Clone, Default)]
pub struct AcceptScopesStrategy {
    filter: ScopeFilter,
}

impl AcceptScopesStrategy {
    pub fn new(scopes: impl IntoIterator<Item = ScopeType>) -> Self {
        Self {
            filter: ScopeFilter::new(scopes),
        }
    }

    pub fn filter(&self) -> &ScopeFilter {
        &self.filter
    }
}

impl ResolutionStrategy for AcceptScopesStrategy {
    fn accepts(&self, candidate: &DependencyDeclaration) -> bool {
        self.filter.accepts(candidate)
    }
}

/// Rejects candidates matching any of a list of `group:artifact` patterns.
///
/// A pattern may also pin packaging and classifier
/// (`group:artifact:packaging[:classifier]`); `*` matches any group or artifact.
#[derive(Debug, Clone, Default)]
pub struct RejectDependenciesStrategy {
    patterns: Vec<RejectPattern>,
}

#[derive(Debug, Clone)]
struct RejectPattern {
    artifact: Exclusion,
    packaging: Option<PackagingType>,
    classifier: Option<String>,
}

impl RejectPattern {
    fn parse(text: &str) -> StageResult<Self> {
        let trimmed = text.trim();
        let parts: Vec<&str> = trimmed.split(':').collect();
        let (group, artifact, packaging, classifier) = match parts.as_slice() {
            [g, a] => (*g, *a, None, None),
            [g, a, p] => (*g, *a, Some(*p), None),
            [g, a, p, c] => (*g, *a, Some(*p), Some(*c)),
            _ => {
                return Err(StageError::parse(
                    text,
                    "expected group:artifact[:packaging[:classifier]]",
                ))
            }
        };
        if group.is_empty() || artifact.is_empty() {
            return Err(StageError::parse(text, "group and artifact must not be empty"));
        }
        Ok(Self {
            artifact: Exclusion::new(group, artifact),
            packaging: packaging.filter(|p| !p.is_empty()).map(PackagingType::from_type),
            classifier: classifier.filter(|c| !c.is_empty()).map(str::to_string),
        })
    }

    fn matches(&self, candidate: &DependencyDeclaration) -> bool {
        self.artifact
            .matches(candidate.group_id(), candidate.artifact_id())
            && self
                .packaging
                .as_ref()
                .map_or(true, |p| p == candidate.packaging())
            && self
                .classifier
                .as_deref()
                .map_or(true, |c| candidate.classifier() == Some(c))
    }
}

impl RejectDependenciesStrategy {
    pub fn new<I, S>(patterns: I) -> StageResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| RejectPattern::parse(p.as_ref()))
            .collect::<StageResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }
}

impl ResolutionStrategy for RejectDependenciesStrategy {
    fn accepts(&self, candidate: &DependencyDeclaration) -> bool {
        !self.patterns.iter().any(|p| p.matches(candidate))
    }
}

/// Admits a candidate only when both strategies admit it. Output order is the
/// primary strategy's.
pub struct CombinedStrategy {
    primary: Box<dyn ResolutionStrategy>,
    secondary: Box<dyn ResolutionStrategy>,
}

impl CombinedStrategy {
    pub fn new(
        primary: impl ResolutionStrategy + 'static,
        secondary: impl ResolutionStrategy + 'static,
    ) -> Self {
        Self::from_boxed(Box::new(primary), Box::new(secondary))
    }

    pub fn from_boxed(
        primary: Box<dyn ResolutionStrategy>,
        secondary: Box<dyn ResolutionStrategy>,
    ) -> Self {
        Self { primary, secondary }
    }
}

impl ResolutionStrategy for CombinedStrategy {
    fn accepts(&self, candidate: &DependencyDeclaration) -> bool {
        self.primary.accepts(candidate) && self.secondary.accepts(candidate)
    }

    fn apply(&self, candidates: &[DependencyDeclaration]) -> Vec<DependencyDeclaration> {
        let mut admitted = self.primary.apply(candidates);
        admitted.retain(|c| self.secondary.accepts(c));
        admitted
    }
}
