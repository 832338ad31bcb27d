//! POM file parsing: coordinates, parent reference, properties, dependencies
//! and dependency management, with `${...}` interpolation and parent merging.

use std::collections::BTreeMap;

use pomstage_util::errors::{StageError, StageResult};
use quick_xml::events::Event;
use quick_xml::Reader;

/// A parsed POM (Project Object Model) file.
#[derive(Debug, Clone, Default)]
pub struct Pom {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: Option<String>,

    pub parent: Option<ParentRef>,
    pub properties: BTreeMap<String, String>,
    pub dependencies: Vec<PomDependency>,
    /// `None` when the POM has no `<dependencyManagement>` element at all.
    pub dependency_management: Option<Vec<PomDependency>>,
}

/// Reference to a parent POM.
#[derive(Debug, Clone, Default)]
pub struct ParentRef {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    /// `Some("")` for an explicit empty `<relativePath/>`.
    pub relative_path: Option<String>,
}

/// A `<dependency>` element, either direct or managed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PomDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub optional: bool,
    pub classifier: Option<String>,
    pub type_: Option<String>,
    pub exclusions: Vec<PomExclusion>,
}

/// An `<exclusion>` within a dependency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PomExclusion {
    pub group_id: String,
    pub artifact_id: Option<String>,
}

impl PomDependency {
    /// `group:artifact:type[:classifier]`, the key Maven merges dependencies by.
    pub fn management_key(&self) -> String {
        let mut key = format!(
            "{}:{}:{}",
            self.group_id,
            self.artifact_id,
            self.type_.as_deref().unwrap_or("jar")
        );
        if let Some(ref c) = self.classifier {
            key.push(':');
            key.push_str(c);
        }
        key
    }

    fn interpolate_with(&mut self, pom: &Pom) {
        self.group_id = pom.interpolate(&self.group_id);
        self.artifact_id = pom.interpolate(&self.artifact_id);
        for field in [
            &mut self.version,
            &mut self.scope,
            &mut self.classifier,
            &mut self.type_,
        ] {
            if let Some(value) = field.as_mut() {
                *value = pom.interpolate(value);
            }
        }
    }
}

impl Pom {
    /// Effective group ID (falls back to parent).
    pub fn effective_group_id(&self) -> Option<&str> {
        self.group_id
            .as_deref()
            .or(self.parent.as_ref().map(|p| p.group_id.as_str()))
    }

    /// Effective version (falls back to parent).
    pub fn effective_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .or(self.parent.as_ref().map(|p| p.version.as_str()))
    }

    /// Resolve `${property}` references using POM properties and the
    /// built-in `project.*` variables. Unknown references are left as-is.
    pub fn interpolate(&self, input: &str) -> String {
        let mut result = input.to_string();
        // Bounded so that self-referencing properties cannot loop forever.
        for _ in 0..20 {
            if !result.contains("${") {
                break;
            }
            let next = self.interpolate_once(&result);
            if next == result {
                break;
            }
            result = next;
        }
        result
    }

    fn interpolate_once(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;
        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                out.push_str(&rest[start..]);
                return out;
            };
            let key = &after[..end];
            match self.resolve_property(key) {
                Some(value) => out.push_str(&value),
                None => {
                    out.push_str("${");
                    out.push_str(key);
                    out.push('}');
                }
            }
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        out
    }

    fn resolve_property(&self, key: &str) -> Option<String> {
        match key {
            "project.groupId" | "pom.groupId" => self.effective_group_id().map(str::to_string),
            "project.artifactId" | "pom.artifactId" => self.artifact_id.clone(),
            "project.version" | "pom.version" => self.effective_version().map(str::to_string),
            "project.packaging" => Some(self.packaging.clone().unwrap_or_else(|| "jar".into())),
            "project.parent.groupId" => self.parent.as_ref().map(|p| p.group_id.clone()),
            "project.parent.artifactId" => self.parent.as_ref().map(|p| p.artifact_id.clone()),
            "project.parent.version" => self.parent.as_ref().map(|p| p.version.clone()),
            _ => self.properties.get(key).cloned(),
        }
    }

    /// Interpolate every property reference in dependencies and dependency management.
    pub fn resolve_properties(&mut self) {
        let snapshot = self.clone();
        for dep in &mut self.dependencies {
            dep.interpolate_with(&snapshot);
        }
        if let Some(ref mut managed) = self.dependency_management {
            for dep in managed {
                dep.interpolate_with(&snapshot);
            }
        }
    }

    /// Merge a parent POM into this one. Values declared by the child win.
    pub fn apply_parent(&mut self, parent: &Pom) {
        for (k, v) in &parent.properties {
            self.properties
                .entry(k.clone())
                .or_insert_with(|| v.clone());
        }
        if self.group_id.is_none() {
            self.group_id = parent.effective_group_id().map(str::to_string);
        }
        if self.version.is_none() {
            self.version = parent.effective_version().map(str::to_string);
        }

        if let Some(ref parent_managed) = parent.dependency_management {
            let managed = self.dependency_management.get_or_insert_with(Vec::new);
            for dm in parent_managed {
                let key = dm.management_key();
                if !managed.iter().any(|d| d.management_key() == key) {
                    managed.push(dm.clone());
                }
            }
        }

        for dep in &parent.dependencies {
            let key = dep.management_key();
            if !self.dependencies.iter().any(|d| d.management_key() == key) {
                self.dependencies.push(dep.clone());
            }
        }
    }
}

/// Parse a POM XML string into a `Pom` struct.
pub fn parse_pom(xml: &str) -> StageResult<Pom> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pom = Pom::default();
    let mut path: Vec<String> = Vec::new();
    let mut text = String::new();

    let mut current_dep: Option<PomDependency> = None;
    let mut current_exclusion: Option<PomExclusion> = None;
    let mut current_parent: Option<ParentRef> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                path.push(String::from_utf8_lossy(e.name().as_ref()).to_string());
                text.clear();

                match path_context(&path).as_str() {
                    "project>dependencyManagement" => {
                        pom.dependency_management.get_or_insert_with(Vec::new);
                    }
                    "project>dependencies>dependency"
                    | "project>dependencyManagement>dependencies>dependency" => {
                        current_dep = Some(PomDependency::default());
                    }
                    "project>parent" => current_parent = Some(ParentRef::default()),
                    ctx if ctx.ends_with(">exclusions>exclusion") && current_dep.is_some() => {
                        current_exclusion = Some(PomExclusion::default());
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                // Self-closing elements carry no text; only a few are meaningful.
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                path.push(tag);
                match path_context(&path).as_str() {
                    "project>parent>relativePath" => {
                        if let Some(ref mut parent) = current_parent {
                            parent.relative_path = Some(String::new());
                        }
                    }
                    "project>dependencyManagement" => {
                        pom.dependency_management.get_or_insert_with(Vec::new);
                    }
                    _ => {}
                }
                path.pop();
            }
            Ok(Event::Text(ref e)) => {
                text = e
                    .unescape()
                    .map_err(|err| xml_error(&reader, err))?
                    .trim()
                    .to_string();
            }
            Ok(Event::End(_)) => {
                let ctx = path_context(&path);
                let leaf = path.last().map(String::as_str).unwrap_or_default();

                if path.len() == 3 && path[1] == "properties" {
                    pom.properties.insert(leaf.to_string(), text.clone());
                }

                if let Some(ref mut excl) = current_exclusion {
                    match leaf {
                        "groupId" => excl.group_id = text.clone(),
                        "artifactId" => excl.artifact_id = Some(text.clone()),
                        _ => {}
                    }
                    if ctx.ends_with(">exclusions>exclusion") {
                        if let (Some(excl), Some(dep)) =
                            (current_exclusion.take(), current_dep.as_mut())
                        {
                            dep.exclusions.push(excl);
                        }
                    }
                } else if let Some(ref mut dep) = current_dep {
                    if path.len() >= 2 && path[path.len() - 2] == "dependency" {
                        match leaf {
                            "groupId" => dep.group_id = text.clone(),
                            "artifactId" => dep.artifact_id = text.clone(),
                            "version" => dep.version = Some(text.clone()),
                            "scope" => dep.scope = Some(text.clone()),
                            "optional" => dep.optional = text.eq_ignore_ascii_case("true"),
                            "classifier" => dep.classifier = Some(text.clone()),
                            "type" => dep.type_ = Some(text.clone()),
                            _ => {}
                        }
                    }

                    if ctx == "project>dependencies>dependency" {
                        if let Some(dep) = current_dep.take() {
                            pom.dependencies.push(dep);
                        }
                    } else if ctx == "project>dependencyManagement>dependencies>dependency" {
                        if let Some(dep) = current_dep.take() {
                            pom.dependency_management
                                .get_or_insert_with(Vec::new)
                                .push(dep);
                        }
                    }
                }

                if let Some(ref mut parent) = current_parent {
                    match ctx.as_str() {
                        "project>parent>groupId" => parent.group_id = text.clone(),
                        "project>parent>artifactId" => parent.artifact_id = text.clone(),
                        "project>parent>version" => parent.version = text.clone(),
                        "project>parent>relativePath" => {
                            parent.relative_path = Some(text.clone())
                        }
                        "project>parent" => pom.parent = current_parent.take(),
                        _ => {}
                    }
                }

                if path.len() == 2 {
                    match leaf {
                        "groupId" => pom.group_id = Some(text.clone()),
                        "artifactId" => pom.artifact_id = Some(text.clone()),
                        "version" => pom.version = Some(text.clone()),
                        "packaging" => pom.packaging = Some(text.clone()),
                        _ => {}
                    }
                }

                path.pop();
                text.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(&reader, e)),
            _ => {}
        }
    }

    if pom.artifact_id.is_none() {
        return Err(StageError::Descriptor {
            message: "POM is missing <artifactId>".to_string(),
        });
    }

    Ok(pom)
}

fn xml_error(reader: &Reader<&[u8]>, err: impl std::fmt::Display) -> StageError {
    StageError::Descriptor {
        message: format!(
            "failed to parse POM XML at byte {}: {err}",
            reader.buffer_position()
        ),
    }
}

/// Build a context string from the current XML path for matching.
fn path_context(path: &[String]) -> String {
    path.join(">")
}
