//! Command dispatch and handler modules.

mod import;
mod repos;
mod resolve;

use std::path::{Path, PathBuf};

use miette::{IntoDiagnostic, Result};
use pomstage_core::config::{GlobalConfig, OutputFormat};
use pomstage_resolver::format::{CoordinateListFormat, FormatStage, JsonFormat};
use pomstage_resolver::stage::ConfiguredResolveStage;
use pomstage_util::errors::StageError;
use pomstage_util::progress;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    let config = GlobalConfig::load()?;
    match cli.command {
        Command::Import {
            pom,
            scope,
            reject,
            settings,
            format,
        } => import::exec(
            &config,
            pom.as_deref(),
            &scope,
            &reject,
            settings.as_deref(),
            format.map(Into::into),
        ),
        Command::Resolve {
            coordinates,
            pom,
            settings,
            format,
        } => resolve::exec(
            &config,
            &coordinates,
            pom.as_deref(),
            settings.as_deref(),
            format.map(Into::into),
        ),
        Command::Repos { settings } => repos::exec(&config, settings.as_deref()),
    }
}

/// The explicit `--pom`, or the nearest `pom.xml` above the current directory.
fn locate_pom(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        return Ok(Some(path.to_path_buf()));
    }
    let cwd = std::env::current_dir().map_err(StageError::Io)?;
    Ok(pomstage_util::fs::find_in_ancestors(&cwd, "pom.xml"))
}

/// `--settings`, then the configured settings file, then `~/.m2/settings.xml`.
fn settings_path(config: &GlobalConfig, explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| {
            config
                .resolve
                .settings
                .as_deref()
                .map(pomstage_util::fs::expand_home)
        })
        .or_else(pomstage_util::fs::user_settings_path)
}

fn with_settings(
    stage: ConfiguredResolveStage,
    config: &GlobalConfig,
    explicit: Option<&Path>,
) -> Result<ConfiguredResolveStage> {
    match settings_path(config, explicit) {
        Some(path) => Ok(stage.configure_settings(&path)?),
        None => Ok(stage),
    }
}

fn print_artifacts(
    resolved: &FormatStage<'_>,
    config: &GlobalConfig,
    format: Option<OutputFormat>,
) -> Result<()> {
    match format.unwrap_or(config.output.format) {
        OutputFormat::Plain => {
            let text = resolved
                .as_with(&CoordinateListFormat)
                .unwrap_or_else(|never| match never {});
            print!("{text}");
        }
        OutputFormat::Json => {
            let json = resolved
                .as_with(&JsonFormat { pretty: true })
                .into_diagnostic()?;
            println!("{json}");
        }
    }

    let count = resolved.artifacts().len();
    if count == 0 {
        progress::status_warn("Resolved", "no artifacts matched");
    } else {
        progress::status("Resolved", &format!("{count} artifact(s)"));
    }
    Ok(())
}
