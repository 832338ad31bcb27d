//! Handler for `pomstage resolve`.

use std::path::Path;

use miette::Result;
use pomstage_core::config::{GlobalConfig, OutputFormat};
use pomstage_maven::model::ProjectModel;
use pomstage_resolver::stage::ConfiguredResolveStage;

pub fn exec(
    config: &GlobalConfig,
    coordinates: &[String],
    pom: Option<&Path>,
    settings: Option<&Path>,
    format: Option<OutputFormat>,
) -> Result<()> {
    // Outside a project there is no dependency management to consult.
    let stage = match super::locate_pom(pom)? {
        Some(pom) => ConfiguredResolveStage::from_pom_file(&pom)?,
        None => {
            tracing::debug!("no pom.xml found, resolving without dependency management");
            ConfiguredResolveStage::from_model(ProjectModel::new("pomstage", "standalone", "0"))?
        }
    };
    let mut stage = super::with_settings(stage, config, settings)?;

    let resolved = stage.resolve_all(coordinates)?.resolve()?;
    super::print_artifacts(&resolved, config, format)
}
