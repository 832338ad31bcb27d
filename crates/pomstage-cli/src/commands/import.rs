//! Handler for `pomstage import`.

use std::path::Path;

use miette::Result;
use pomstage_core::config::{GlobalConfig, OutputFormat};
use pomstage_core::scope::ScopeType;
use pomstage_resolver::stage::ConfiguredResolveStage;
use pomstage_resolver::strategy::RejectDependenciesStrategy;
use pomstage_util::errors::{StageError, StageResult};

pub fn exec(
    config: &GlobalConfig,
    pom: Option<&Path>,
    scope: &str,
    reject: &[String],
    settings: Option<&Path>,
    format: Option<OutputFormat>,
) -> Result<()> {
    let pom = super::locate_pom(pom)?.ok_or_else(|| StageError::Descriptor {
        message: "Could not find pom.xml in current or parent directories".to_string(),
    })?;
    let scopes = parse_scopes(scope)?;

    let stage = ConfiguredResolveStage::from_pom_file(&pom)?;
    let mut stage = super::with_settings(stage, config, settings)?;

    let strategy_stage = if reject.is_empty() {
        stage.import_scoped_dependencies(scopes)
    } else {
        let strategy = RejectDependenciesStrategy::new(reject)?;
        stage.import_scoped_dependencies_using(scopes, strategy)
    };
    let resolved = strategy_stage.resolve()?;
    super::print_artifacts(&resolved, config, format)
}

/// `test`, `defined`, or a comma-separated scope list.
fn parse_scopes(text: &str) -> StageResult<Vec<ScopeType>> {
    match text.trim() {
        "test" => Ok(ScopeType::TEST_SCOPES.to_vec()),
        "defined" => Ok(ScopeType::DEFINED_SCOPES.to_vec()),
        list => list
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<ScopeType>)
            .collect(),
    }
}
