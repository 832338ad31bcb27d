use std::collections::BTreeSet;

use pomstage_core::dependency::DependencyDeclaration;
use pomstage_core::scope::ScopeType;

/// Admits declarations whose scope is in a fixed set.
///
/// An empty set admits nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeFilter {
    allowed: BTreeSet<ScopeType>,
}

impl ScopeFilter {
    pub fn new(scopes: impl IntoIterator<Item = ScopeType>) -> Self {
        Self {
            allowed: scopes.into_iter().collect(),
        }
    }

    pub fn accepts(&self, dependency: &DependencyDeclaration) -> bool {
        self.allowed.contains(&dependency.scope())
    }

    pub fn scopes(&self) -> impl Iterator<Item = ScopeType> + '_ {
        self.allowed.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dep(scope: ScopeType) -> DependencyDeclaration {
        DependencyDeclaration::new("org.example", "lib").with_scope(scope)
    }

    #[test]
    fn test_scope_only() {
        let filter = ScopeFilter::new(ScopeType::TEST_SCOPES);
        assert!(filter.accepts(&dep(ScopeType::Test)));
        for scope in ScopeType::ALL.into_iter().filter(|s| *s != ScopeType::Test) {
            assert!(!filter.accepts(&dep(scope)), "{scope} admitted");
        }
    }

    #[test]
    fn empty_filter_admits_nothing() {
        let filter = ScopeFilter::new(Vec::<ScopeType>::new());
        assert!(filter.is_empty());
        assert!(ScopeType::ALL.iter().all(|s| !filter.accepts(&dep(*s))));
    }

    #[test]
    fn defined_scopes() {
        let filter = ScopeFilter::new(ScopeType::DEFINED_SCOPES);
        assert!(filter.accepts(&dep(ScopeType::Runtime)));
        assert!(!filter.accepts(&dep(ScopeType::Provided)));
        assert_eq!(filter.scopes().count(), 4);
    }
}
