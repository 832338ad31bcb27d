use pomstage_core::dependency::DependencyDeclaration;
use pomstage_util::errors::{StageError, StageResult, UnresolvedDependency, UnresolvedReason};

use crate::format::FormatStage;
use crate::session::WorkingSession;
use crate::strategy::{CombinedStrategy, ResolutionStrategy};

/// Applies a resolution strategy to the session's working set.
///
/// Never mutates the session.
pub struct StrategyStage<'a> {
    session: &'a WorkingSession,
    strategy: Box<dyn ResolutionStrategy>,
}

impl<'a> StrategyStage<'a> {
    pub(crate) fn new(session: &'a WorkingSession, strategy: Box<dyn ResolutionStrategy>) -> Self {
        Self { session, strategy }
    }

    pub fn session(&self) -> &'a WorkingSession {
        self.session
    }

    /// Narrow the current strategy: a candidate must now also pass `strategy`,
    /// whose order becomes the output order.
    pub fn using(self, strategy: impl ResolutionStrategy + 'static) -> Self {
        Self {
            session: self.session,
            strategy: Box::new(CombinedStrategy::from_boxed(
                Box::new(strategy),
                self.strategy,
            )),
        }
    }

    /// Apply the strategy and validate every admitted candidate.
    ///
    /// Fails with [`StageError::Resolution`] listing every candidate without a
    /// usable version; no partial result is returned.
    pub fn resolve(self) -> StageResult<FormatStage<'a>> {
        let candidates: Vec<DependencyDeclaration> =
            self.session.dependencies().iter().cloned().collect();
        let admitted = self.strategy.apply(&candidates);
        tracing::debug!(
            "strategy admitted {} of {} candidate(s)",
            admitted.len(),
            candidates.len()
        );

        let failures: Vec<UnresolvedDependency> = admitted.iter().filter_map(validate).collect();
        if !failures.is_empty() {
            return Err(StageError::Resolution { failures });
        }
        Ok(FormatStage::new(self.session, admitted))
    }
}

fn validate(candidate: &DependencyDeclaration) -> Option<UnresolvedDependency> {
    let reason = match candidate.version() {
        None => UnresolvedReason::MissingVersion,
        Some(version) => UnresolvedReason::UnresolvedProperty(unresolved_property(version)?),
    };
    Some(UnresolvedDependency {
        coordinate: candidate.key().to_string(),
        reason,
    })
}

/// The first `${name}` left in `version`, if any.
fn unresolved_property(version: &str) -> Option<String> {
    let start = version.find("${")?;
    let rest = &version[start + 2..];
    let end = rest.find('}').unwrap_or(rest.len());
    Some(rest[..end].to_string())
}
