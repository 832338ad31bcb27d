//! The terminal stage: hands the admitted artifacts to a formatter or a fetcher.

use std::convert::Infallible;

use pomstage_core::dependency::DependencyDeclaration;
use pomstage_maven::repository::RemoteRepository;

use crate::session::WorkingSession;

/// Turns the resolved artifact list into some output.
pub trait FormatProcessor {
    type Output;
    type Error;

    fn process(&self, artifacts: &[DependencyDeclaration]) -> Result<Self::Output, Self::Error>;
}

/// Retrieves a single artifact from one of the given repositories.
///
/// Transport, caching and retries are entirely up to the implementation.
pub trait ArtifactFetcher {
    type Artifact;
    type Error;

    fn fetch(
        &mut self,
        artifact: &DependencyDeclaration,
        repositories: &[RemoteRepository],
    ) -> Result<Self::Artifact, Self::Error>;
}

/// Resolved, ordered artifacts ready for output.
pub struct FormatStage<'a> {
    session: &'a WorkingSession,
    artifacts: Vec<DependencyDeclaration>,
}

impl<'a> FormatStage<'a> {
    pub(crate) fn new(session: &'a WorkingSession, artifacts: Vec<DependencyDeclaration>) -> Self {
        Self { session, artifacts }
    }

    pub fn artifacts(&self) -> &[DependencyDeclaration] {
        &self.artifacts
    }

    pub fn as_declarations(self) -> Vec<DependencyDeclaration> {
        self.artifacts
    }

    /// `group:artifact:packaging[:classifier]:version` for each artifact.
    pub fn as_coordinates(&self) -> Vec<String> {
        self.artifacts.iter().map(ToString::to_string).collect()
    }

    pub fn as_with<P: FormatProcessor>(&self, processor: &P) -> Result<P::Output, P::Error> {
        processor.process(&self.artifacts)
    }

    /// Fetch every artifact in order, stopping at the first fetcher error.
    pub fn fetch_with<F: ArtifactFetcher>(
        &self,
        fetcher: &mut F,
    ) -> Result<Vec<F::Artifact>, F::Error> {
        let repositories = self.session.remote_repositories();
        tracing::debug!(
            "fetching {} artifact(s) from {} repository(ies)",
            self.artifacts.len(),
            repositories.len()
        );
        self.artifacts
            .iter()
            .map(|artifact| fetcher.fetch(artifact, &repositories))
            .collect()
    }
}

/// One coordinate per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateListFormat;

impl FormatProcessor for CoordinateListFormat {
    type Output = String;
    type Error = Infallible;

    fn process(&self, artifacts: &[DependencyDeclaration]) -> Result<String, Infallible> {
        let mut out = String::new();
        for artifact in artifacts {
            out.push_str(&artifact.to_string());
            out.push('\n');
        }
        Ok(out)
    }
}

/// A JSON array of declarations.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat {
    pub pretty: bool,
}

impl FormatProcessor for JsonFormat {
    type Output = String;
    type Error = serde_json::Error;

    fn process(&self, artifacts: &[DependencyDeclaration]) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(artifacts)
        } else {
            serde_json::to_string(artifacts)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_list_one_per_line() {
        let artifacts = vec![
            DependencyDeclaration::parse("g:a:1").unwrap(),
            DependencyDeclaration::parse("g:b:pom:2").unwrap(),
        ];
        let text = CoordinateListFormat.process(&artifacts).unwrap();
        assert_eq!(text, "g:a:jar:1\ng:b:pom:2\n");
    }

    #[test]
    fn json_array() {
        let artifacts = vec![DependencyDeclaration::parse("g:a:1").unwrap()];
        let json = JsonFormat::default().process(&artifacts).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["version"], "1");
        assert_eq!(value[0]["scope"], "compile");
    }
}
