//! Maven `settings.xml` parsing and validation.
//!
//! Only the parts that influence where artifacts come from are kept: the local
//! repository, offline mode, server credentials, mirrors and the repositories
//! contributed by active profiles.

use std::path::{Path, PathBuf};

use pomstage_util::errors::{StageError, StageResult};
use pomstage_util::fs::{expand_home, home_dir};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::repository::{mirror_matches, RemoteRepository};

/// Validated contents of a `settings.xml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub local_repository: Option<PathBuf>,
    pub offline: bool,
    pub servers: Vec<Server>,
    pub mirrors: Vec<Mirror>,
    pub profiles: Vec<Profile>,
    pub active_profiles: Vec<String>,
}

/// `<server>`: credentials for a repository or mirror id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Server {
    pub id: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// `<mirror>`: replaces the repositories matched by `mirror_of`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mirror {
    pub id: String,
    pub url: String,
    pub mirror_of: String,
}

/// `<profile>` with the repositories it contributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub id: String,
    pub active_by_default: bool,
    pub repositories: Vec<ProfileRepository>,
}

/// `<repository>` inside a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileRepository {
    pub id: String,
    pub url: String,
}

impl Settings {
    /// Read, parse and validate a settings file.
    pub fn from_path(path: &Path) -> StageResult<Self> {
        if path.as_os_str().is_empty() {
            return Err(StageError::argument("path to the settings file must not be empty"));
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            StageError::invalid_config(path.display(), format!("failed to read: {e}"))
        })?;
        let settings = Self::parse(&content, &path.display().to_string())?;
        tracing::debug!(
            "loaded settings from {} ({} mirror(s), {} server(s))",
            path.display(),
            settings.mirrors.len(),
            settings.servers.len()
        );
        Ok(settings)
    }

    /// Parse and validate settings XML; `source` names the file in errors.
    pub fn parse(xml: &str, source: &str) -> StageResult<Self> {
        let settings = parse_settings(xml, source)?;
        settings.validate(source)?;
        Ok(settings)
    }

    fn validate(&self, source: &str) -> StageResult<()> {
        for (i, server) in self.servers.iter().enumerate() {
            if server.id.is_empty() {
                return Err(StageError::invalid_config(
                    source,
                    format!("server #{} is missing <id>", i + 1),
                ));
            }
        }
        for (i, mirror) in self.mirrors.iter().enumerate() {
            let missing = [
                ("id", &mirror.id),
                ("url", &mirror.url),
                ("mirrorOf", &mirror.mirror_of),
            ]
            .into_iter()
            .find(|(_, value)| value.is_empty());
            if let Some((field, _)) = missing {
                return Err(StageError::invalid_config(
                    source,
                    format!("mirror #{} is missing <{field}>", i + 1),
                ));
            }
        }
        for profile in &self.profiles {
            if profile.id.is_empty() {
                return Err(StageError::invalid_config(source, "profile is missing <id>"));
            }
            for repo in &profile.repositories {
                if repo.id.is_empty() || repo.url.is_empty() {
                    return Err(StageError::invalid_config(
                        source,
                        format!(
                            "repository in profile `{}` needs both <id> and <url>",
                            profile.id
                        ),
                    ));
                }
            }
        }
        for active in &self.active_profiles {
            if !self.profiles.iter().any(|p| &p.id == active) {
                tracing::warn!("{source}: active profile `{active}` is not defined");
            }
        }
        Ok(())
    }

    /// Local repository directory, defaulting to `~/.m2/repository`.
    pub fn local_repository(&self) -> PathBuf {
        self.local_repository
            .clone()
            .unwrap_or_else(|| home_dir().join(".m2").join("repository"))
    }

    /// Profiles in effect: those listed in `<activeProfiles>`, or the
    /// `activeByDefault` ones when none is listed explicitly.
    pub fn profiles_in_effect(&self) -> Vec<&Profile> {
        let explicit: Vec<&Profile> = self
            .profiles
            .iter()
            .filter(|p| self.active_profiles.contains(&p.id))
            .collect();
        if !explicit.is_empty() {
            return explicit;
        }
        self.profiles.iter().filter(|p| p.active_by_default).collect()
    }

    /// Remote repositories to fetch from: active profile repositories plus
    /// Maven Central, with mirrors applied and server credentials attached.
    pub fn effective_repositories(&self) -> Vec<RemoteRepository> {
        let mut declared: Vec<RemoteRepository> = self
            .profiles_in_effect()
            .into_iter()
            .flat_map(|p| p.repositories.iter())
            .map(|r| RemoteRepository::new(&r.id, &r.url))
            .collect();
        if !declared.iter().any(|r| r.id == crate::repository::CENTRAL_ID) {
            declared.push(RemoteRepository::maven_central());
        }

        let mut effective: Vec<RemoteRepository> = Vec::new();
        for repo in declared {
            let repo = match self
                .mirrors
                .iter()
                .find(|m| mirror_matches(&m.mirror_of, &repo))
            {
                Some(mirror) => {
                    tracing::debug!("repository {} is mirrored by {}", repo.id, mirror.id);
                    RemoteRepository::new(&mirror.id, &mirror.url)
                }
                None => repo,
            };
            if !effective.iter().any(|r| r.id == repo.id) {
                effective.push(repo);
            }
        }

        for repo in &mut effective {
            if let Some(server) = self.servers.iter().find(|s| s.id == repo.id) {
                repo.username = server.username.clone();
                repo.password = server.password.clone();
            }
        }
        effective
    }
}

fn parse_settings(xml: &str, source: &str) -> StageResult<Settings> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut settings = Settings::default();
    let mut path: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut saw_root = false;

    let mut server: Option<Server> = None;
    let mut mirror: Option<Mirror> = None;
    let mut profile: Option<Profile> = None;
    let mut repository: Option<ProfileRepository> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                path.push(String::from_utf8_lossy(e.name().as_ref()).to_string());
                text.clear();
                match path_context(&path).as_str() {
                    "settings" => saw_root = true,
                    "settings>servers>server" => server = Some(Server::default()),
                    "settings>mirrors>mirror" => mirror = Some(Mirror::default()),
                    "settings>profiles>profile" => profile = Some(Profile::default()),
                    "settings>profiles>profile>repositories>repository" => {
                        repository = Some(ProfileRepository::default())
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"settings" && path.is_empty() {
                    saw_root = true;
                }
            }
            Ok(Event::Text(ref e)) => {
                text = e
                    .unescape()
                    .map_err(|err| StageError::invalid_config(source, err.to_string()))?
                    .trim()
                    .to_string();
            }
            Ok(Event::End(_)) => {
                let value = expand_env(&text);
                match path_context(&path).as_str() {
                    "settings>localRepository" if !value.is_empty() => {
                        settings.local_repository = Some(expand_home(&value));
                    }
                    "settings>offline" => settings.offline = parse_bool(&value, source)?,
                    "settings>activeProfiles>activeProfile" => {
                        settings.active_profiles.push(value)
                    }

                    "settings>servers>server>id" => set(&mut server, |s| s.id = value),
                    "settings>servers>server>username" => {
                        set(&mut server, |s| s.username = Some(value))
                    }
                    "settings>servers>server>password" => {
                        set(&mut server, |s| s.password = Some(value))
                    }
                    "settings>servers>server" => settings.servers.extend(server.take()),

                    "settings>mirrors>mirror>id" => set(&mut mirror, |m| m.id = value),
                    "settings>mirrors>mirror>url" => set(&mut mirror, |m| m.url = value),
                    "settings>mirrors>mirror>mirrorOf" => {
                        set(&mut mirror, |m| m.mirror_of = value)
                    }
                    "settings>mirrors>mirror" => settings.mirrors.extend(mirror.take()),

                    "settings>profiles>profile>id" => set(&mut profile, |p| p.id = value),
                    "settings>profiles>profile>activation>activeByDefault" => {
                        let active = parse_bool(&value, source)?;
                        set(&mut profile, |p| p.active_by_default = active)
                    }
                    "settings>profiles>profile>repositories>repository>id" => {
                        set(&mut repository, |r| r.id = value)
                    }
                    "settings>profiles>profile>repositories>repository>url" => {
                        set(&mut repository, |r| r.url = value)
                    }
                    "settings>profiles>profile>repositories>repository" => {
                        if let (Some(repo), Some(p)) = (repository.take(), profile.as_mut()) {
                            p.repositories.push(repo);
                        }
                    }
                    "settings>profiles>profile" => settings.profiles.extend(profile.take()),
                    _ => {}
                }
                path.pop();
                text.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(StageError::invalid_config(
                    source,
                    format!(
                        "malformed XML at byte {}: {e}",
                        reader.buffer_position()
                    ),
                ))
            }
            _ => {}
        }
    }

    if !saw_root {
        return Err(StageError::invalid_config(
            source,
            "missing <settings> root element",
        ));
    }
    Ok(settings)
}

fn set<T>(slot: &mut Option<T>, apply: impl FnOnce(&mut T)) {
    if let Some(item) = slot.as_mut() {
        apply(item);
    }
}

fn parse_bool(value: &str, source: &str) -> StageResult<bool> {
    match value {
        "true" => Ok(true),
        "false" | "" => Ok(false),
        other => Err(StageError::invalid_config(
            source,
            format!("expected `true` or `false`, found `{other}`"),
        )),
    }
}

/// Replace `${env.NAME}` references with environment values.
fn expand_env(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${env.") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 6..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        match std::env::var(&after[..end]) {
            Ok(value) => out.push_str(&value),
            Err(_) => out.push_str(&rest[start..start + 6 + end + 1]),
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}

fn path_context(path: &[String]) -> String {
    path.join(">")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_env_leaves_unknown_variables() {
        assert_eq!(
            expand_env("${env.POMSTAGE_SURELY_UNSET_VAR}/x"),
            "${env.POMSTAGE_SURELY_UNSET_VAR}/x"
        );
    }

    #[test]
    fn expand_env_substitutes_known_variables() {
        std::env::set_var("POMSTAGE_SETTINGS_TEST_VAR", "secret");
        assert_eq!(expand_env("p-${env.POMSTAGE_SETTINGS_TEST_VAR}"), "p-secret");
    }

    #[test]
    fn parse_bool_rejects_garbage() {
        assert!(parse_bool("yes", "s.xml").is_err());
        assert!(!parse_bool("", "s.xml").unwrap());
    }

    #[test]
    fn active_by_default_only_without_explicit_profiles() {
        let mut settings = Settings {
            profiles: vec![
                Profile {
                    id: "default".into(),
                    active_by_default: true,
                    repositories: vec![],
                },
                Profile {
                    id: "ci".into(),
                    active_by_default: false,
                    repositories: vec![],
                },
            ],
            ..Default::default()
        };
        let ids: Vec<String> = settings.profiles_in_effect().iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, ["default"]);

        settings.active_profiles.push("ci".into());
        let ids: Vec<String> = settings.profiles_in_effect().iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, ["ci"]);
    }
}
