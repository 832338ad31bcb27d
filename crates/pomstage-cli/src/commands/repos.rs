//! Handler for `pomstage repos`.

use std::path::Path;

use miette::Result;
use pomstage_core::config::GlobalConfig;
use pomstage_maven::repository::RemoteRepository;
use pomstage_maven::settings::Settings;
use pomstage_util::progress;

pub fn exec(config: &GlobalConfig, settings: Option<&Path>) -> Result<()> {
    let settings = match super::settings_path(config, settings) {
        Some(path) => Some(Settings::from_path(&path)?),
        None => None,
    };
    let repositories = match &settings {
        Some(s) => s.effective_repositories(),
        None => vec![RemoteRepository::maven_central()],
    };

    for repo in &repositories {
        if repo.has_auth() {
            println!("{} {} (authenticated)", repo.id, repo.url);
        } else {
            println!("{} {}", repo.id, repo.url);
        }
    }

    if let Some(s) = &settings {
        progress::status_info("Local", &s.local_repository().display().to_string());
    }
    if config.resolve.offline || settings.as_ref().is_some_and(|s| s.offline) {
        progress::status_warn("Offline", "remote repositories will not be contacted");
    }
    Ok(())
}
