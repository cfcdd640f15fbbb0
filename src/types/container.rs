use crate::generators::ArtifactKind;
use crate::types::{CandidateArtifact, Marker, References};

/// How accepted artifacts are folded into a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accumulation {
    /// Artifacts become members; their references merge into the container's set.
    ReferenceMerge,
    /// Artifacts become child elements of the document root.
    ChildAppend,
}

/// The kinds of output container the assembler can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    MapperInterface,
    SupportClass,
    KotlinMapperFile,
    KotlinSupportFile,
    MapperDocument,
    SqlProvider,
}

impl ContainerKind {
    /// Name of the plugin hook invoked once the container is complete.
    pub fn hook_name(&self) -> &'static str {
        match self {
            ContainerKind::MapperInterface => "clientGenerated",
            ContainerKind::SupportClass => "dynamicSqlSupportGenerated",
            ContainerKind::KotlinMapperFile => "mapperGenerated",
            ContainerKind::KotlinSupportFile => "kotlinSupportGenerated",
            ContainerKind::MapperDocument => "sqlMapDocumentGenerated",
            ContainerKind::SqlProvider => "providerGenerated",
        }
    }

    pub fn accumulation(&self) -> Accumulation {
        match self {
            ContainerKind::MapperDocument => Accumulation::ChildAppend,
            _ => Accumulation::ReferenceMerge,
        }
    }
}

/// An operation set, support declaration set, document or provider being assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputContainer {
    kind: ContainerKind,
    type_name: String,
    attributes: Vec<(String, String)>,
    artifacts: Vec<CandidateArtifact>,
    references: References,
    markers: Vec<Marker>,
}

impl OutputContainer {
    pub fn new(kind: ContainerKind, type_name: impl Into<String>) -> Self {
        Self {
            kind,
            type_name: type_name.into(),
            attributes: Vec::new(),
            artifacts: Vec::new(),
            references: References::new(),
            markers: Vec::new(),
        }
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn add_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((name.into(), value.into()));
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Takes ownership of an accepted artifact.
    ///
    /// Members of a source container fold their references and markers into
    /// the container. A document has no import section, so child elements
    /// are appended as they are and keep their own references.
    pub fn accept(&mut self, mut artifact: CandidateArtifact) {
        match self.kind.accumulation() {
            Accumulation::ReferenceMerge => {
                self.references.merge(artifact.references());
                for marker in artifact.take_markers() {
                    self.add_marker(marker);
                }
            }
            Accumulation::ChildAppend => {}
        }
        self.artifacts.push(artifact);
    }

    /// Attaches a capability marker once; repeated markers are ignored.
    pub fn add_marker(&mut self, marker: Marker) {
        if self
            .markers
            .iter()
            .any(|m| m.declaration() == marker.declaration())
        {
            return;
        }
        self.references.merge(marker.references());
        self.markers.push(marker);
    }

    pub fn references_mut(&mut self) -> &mut References {
        &mut self.references
    }

    pub fn artifacts(&self) -> &[CandidateArtifact] {
        &self.artifacts
    }

    pub fn artifacts_of(&self, kind: ArtifactKind) -> impl Iterator<Item = &CandidateArtifact> {
        self.artifacts.iter().filter(move |a| a.kind() == kind)
    }

    pub fn contains(&self, kind: ArtifactKind) -> bool {
        self.artifacts.iter().any(|a| a.kind() == kind)
    }

    pub fn references(&self) -> &References {
        &self.references
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn has_marker(&self, declaration: &str) -> bool {
        self.markers.iter().any(|m| m.declaration() == declaration)
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }
}
