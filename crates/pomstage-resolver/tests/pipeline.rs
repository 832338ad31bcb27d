use pomstage_core::scope::ScopeType;
use pomstage_maven::model::{ModelDependency, ProjectModel};
use pomstage_resolver::stage::ConfiguredResolveStage;
use pomstage_resolver::strategy::RejectDependenciesStrategy;
use pomstage_util::errors::{StageError, UnresolvedReason};

fn model() -> ProjectModel {
    ProjectModel::new("org.example", "app", "1.0")
        .managed(ModelDependency::new("org.example", "a").version("1.5"))
        .managed(ModelDependency::new("junit", "junit").version("4.13.2"))
        .dependency(
            ModelDependency::new("org.example", "a")
                .version("1.0")
                .scope(ScopeType::Compile),
        )
        .dependency(
            ModelDependency::new("org.example", "b")
                .version("2.0")
                .scope(ScopeType::Test),
        )
}

#[test]
fn test_defined_dependencies_take_managed_version() {
    let mut stage = ConfiguredResolveStage::from_model(model()).unwrap();
    let resolved = stage
        .import_defined_dependencies()
        .resolve()
        .unwrap()
        .as_coordinates();
    assert_eq!(resolved, ["org.example:a:jar:1.5"]);
}

#[test]
fn test_unversioned_dependency_takes_managed_version() {
    let model = model().dependency(ModelDependency::new("junit", "junit").scope(ScopeType::Test));
    let mut stage = ConfiguredResolveStage::from_model(model).unwrap();
    let resolved = stage.import_test_dependencies().resolve().unwrap().as_coordinates();
    assert_eq!(resolved, ["org.example:b:jar:2.0", "junit:junit:jar:4.13.2"]);
}

#[test]
fn test_test_scope_is_exact() {
    let model = model()
        .dependency(ModelDependency::new("g", "rt").version("1").scope(ScopeType::Runtime))
        .dependency(ModelDependency::new("g", "prov").version("1").scope(ScopeType::Provided));
    let mut stage = ConfiguredResolveStage::from_model(model).unwrap();
    let artifacts = stage.import_test_dependencies().resolve().unwrap().as_declarations();
    assert_eq!(artifacts.len(), 1);
    assert!(artifacts.iter().all(|d| d.scope() == ScopeType::Test));
}

#[test]
fn test_import_twice_does_not_duplicate() {
    let mut stage = ConfiguredResolveStage::from_model(model()).unwrap();
    let _ = stage.import_defined_dependencies();
    let first = stage.session().dependencies().len();
    let _ = stage.import_defined_dependencies();
    assert_eq!(stage.session().dependencies().len(), first);
    assert_eq!(first, 1);
}

#[test]
fn test_explicit_resolve_ignores_scopes() {
    let mut stage = ConfiguredResolveStage::from_model(model()).unwrap();
    let resolved = stage.resolve("org.other:c:3.0").unwrap().resolve().unwrap();
    assert_eq!(resolved.as_coordinates(), ["org.other:c:jar:3.0"]);
}

#[test]
fn test_resolve_all_uses_management() {
    let mut stage = ConfiguredResolveStage::from_model(model()).unwrap();
    let resolved = stage
        .resolve_all(["junit:junit", "org.other:c:3.0"])
        .unwrap()
        .resolve()
        .unwrap();
    assert_eq!(
        resolved.as_coordinates(),
        ["junit:junit:jar:4.13.2", "org.other:c:jar:3.0"]
    );
}

#[test]
fn test_resolve_unmanaged_without_version_fails() {
    let mut stage = ConfiguredResolveStage::from_model(model()).unwrap();
    let err = stage.resolve("org.other:c").err().unwrap();
    assert!(matches!(err, StageError::UnresolvableVersion { .. }));
}

#[test]
fn test_resolve_malformed_coordinate() {
    let mut stage = ConfiguredResolveStage::from_model(model()).unwrap();
    let err = stage.resolve("not a coordinate").err().unwrap();
    assert!(matches!(err, StageError::Parse { .. }));
}

#[test]
fn test_empty_scope_set_admits_nothing() {
    let mut stage = ConfiguredResolveStage::from_model(model()).unwrap();
    let _ = stage.import_defined_dependencies();
    assert!(!stage.session().dependencies().is_empty());

    let resolved = stage
        .import_scoped_dependencies(Vec::<ScopeType>::new())
        .resolve()
        .unwrap();
    assert!(resolved.artifacts().is_empty());
}

#[test]
fn test_import_using_strategy() {
    let model = model().dependency(ModelDependency::new("org.example", "c").version("3.0"));
    let mut stage = ConfiguredResolveStage::from_model(model).unwrap();
    let reject = RejectDependenciesStrategy::new(["org.example:a"]).unwrap();
    let resolved = stage
        .import_defined_dependencies_using(reject)
        .resolve()
        .unwrap();
    assert_eq!(resolved.as_coordinates(), ["org.example:c:jar:3.0"]);
}

#[test]
fn test_using_narrows_strategy() {
    let mut stage = ConfiguredResolveStage::from_model(model()).unwrap();
    let resolved = stage
        .resolve_all(["org.other:c:3.0", "org.other:d:4.0"])
        .unwrap()
        .using(RejectDependenciesStrategy::new(["org.other:d"]).unwrap())
        .resolve()
        .unwrap();
    assert_eq!(resolved.as_coordinates(), ["org.other:c:jar:3.0"]);
}

#[test]
fn test_missing_versions_are_aggregated() {
    let model = ProjectModel::new("g", "app", "1")
        .dependency(ModelDependency::new("g", "x"))
        .dependency(ModelDependency::new("g", "y").version("${y.version}"))
        .dependency(ModelDependency::new("g", "z").version("1"));
    let mut stage = ConfiguredResolveStage::from_model(model).unwrap();
    let err = stage.import_defined_dependencies().resolve().err().unwrap();

    let failures = match err {
        StageError::Resolution { failures } => failures,
        other => panic!("expected a resolution error, got {other:?}"),
    };
    assert_eq!(failures.len(), 2);
    assert_eq!(failures[0].coordinate, "g:x:jar");
    assert_eq!(failures[0].reason, UnresolvedReason::MissingVersion);
    assert_eq!(
        failures[1].reason,
        UnresolvedReason::UnresolvedProperty("y.version".into())
    );
}

#[test]
fn test_failures_outside_selection_are_ignored() {
    let model = ProjectModel::new("g", "app", "1")
        .dependency(ModelDependency::new("g", "x").scope(ScopeType::Test))
        .dependency(ModelDependency::new("g", "z").version("1"));
    let mut stage = ConfiguredResolveStage::from_model(model).unwrap();
    let resolved = stage.import_defined_dependencies().resolve().unwrap();
    assert_eq!(resolved.as_coordinates(), ["g:z:jar:1"]);
}

#[test]
fn test_builder_chain() {
    let mut stage = ConfiguredResolveStage::from_model(model()).unwrap();
    let resolved = stage
        .add_dependency_coordinate("junit:junit")
        .unwrap()
        .scope(ScopeType::Test)
        .and("org.other:c:3.0")
        .unwrap()
        .exclusions(["commons-logging:*"])
        .unwrap()
        .resolve()
        .unwrap()
        .resolve()
        .unwrap();
    let artifacts = resolved.as_declarations();
    assert_eq!(artifacts.len(), 2);
    assert_eq!(artifacts[0].version(), Some("4.13.2"));
    assert_eq!(artifacts[0].scope(), ScopeType::Test);
    assert_eq!(artifacts[1].exclusions().len(), 1);
}

#[test]
fn test_resolve_typed_coordinate_finds_management() {
    let model = ProjectModel::new("g", "app", "1").managed(ModelDependency {
        packaging: pomstage_core::packaging::PackagingType::TestJar,
        classifier: Some("tests".into()),
        ..ModelDependency::new("org.example", "shared").version("1.5")
    });
    let mut stage = ConfiguredResolveStage::from_model(model).unwrap();
    let resolved = stage
        .resolve("org.example:shared:test-jar:")
        .unwrap()
        .resolve()
        .unwrap();
    assert_eq!(
        resolved.as_coordinates(),
        ["org.example:shared:test-jar:tests:1.5"]
    );
}

#[test]
fn test_failed_chain_leaves_working_set_empty() {
    let mut stage = ConfiguredResolveStage::from_model(model()).unwrap();
    let failed = stage
        .add_dependency_coordinate("org.other:c:3.0")
        .unwrap()
        .and("bad coord")
        .is_err();
    assert!(failed);
    assert!(stage.session().dependencies().is_empty());
}
