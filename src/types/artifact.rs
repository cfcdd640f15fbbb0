use crate::generators::ArtifactKind;
use crate::types::{References, TypeName};

/// The structural shape of an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactShape {
    /// A method or function.
    Operation,
    /// A field or property declaration.
    Field,
    /// A markup element with attributes and children.
    Element,
}

/// A declared parameter of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
    pub annotations: Vec<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            annotations: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }
}

/// Name, parameters and result shape of an artifact.
/// For markup elements, `name` is the element name and `attributes` carry its attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    /// Receiver type of an extension function.
    pub receiver: Option<String>,
    pub modifiers: Vec<String>,
    pub annotations: Vec<String>,
    pub parameters: Vec<Parameter>,
    pub returns: Option<String>,
    pub attributes: Vec<(String, String)>,
}

impl Signature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            receiver: None,
            modifiers: Vec::new(),
            annotations: Vec::new(),
            parameters: Vec::new(),
            returns: None,
            attributes: Vec::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A supertype-like capability tag that a container should carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    declaration: String,
    references: References,
}

impl Marker {
    pub fn new(type_name: &TypeName) -> Self {
        let mut references = References::new();
        references.add_type(type_name);
        Self {
            declaration: type_name.short_name().to_string(),
            references,
        }
    }

    /// A marker parameterized by one type argument, e.g. `CommonInsertMapper<Order>`.
    pub fn with_argument(type_name: &TypeName, argument: &TypeName) -> Self {
        let mut marker = Self::new(type_name);
        marker.declaration = format!("{}<{}>", type_name.short_name(), argument.short_name());
        marker.references.add_type(argument);
        marker
    }

    pub fn declaration(&self) -> &str {
        &self.declaration
    }

    pub fn references(&self) -> &References {
        &self.references
    }
}

/// One generated unit awaiting (or past) the plugin gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateArtifact {
    kind: ArtifactKind,
    shape: ArtifactShape,
    signature: Signature,
    body: Vec<String>,
    references: References,
    markers: Vec<Marker>,
}

impl CandidateArtifact {
    pub(crate) fn from_parts(
        kind: ArtifactKind,
        shape: ArtifactShape,
        signature: Signature,
        body: Vec<String>,
        references: References,
        markers: Vec<Marker>,
    ) -> Self {
        Self {
            kind,
            shape,
            signature,
            body,
            references,
            markers,
        }
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    pub fn shape(&self) -> ArtifactShape {
        self.shape
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn signature_mut(&mut self) -> &mut Signature {
        &mut self.signature
    }

    pub fn body(&self) -> &[String] {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Vec<String> {
        &mut self.body
    }

    pub fn references(&self) -> &References {
        &self.references
    }

    pub fn references_mut(&mut self) -> &mut References {
        &mut self.references
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    pub(crate) fn take_markers(&mut self) -> Vec<Marker> {
        std::mem::take(&mut self.markers)
    }

    /// All text carried by the signature and body, one entry per line.
    pub fn text_lines(&self) -> Vec<String> {
        let mut lines = self.signature.annotations.clone();
        let mut head = String::new();
        if let Some(receiver) = &self.signature.receiver {
            head.push_str(receiver);
            head.push('.');
        }
        head.push_str(&self.signature.name);
        for (key, value) in &self.signature.attributes {
            head.push_str(&format!(" {}=\"{}\"", key, value));
        }
        for parameter in &self.signature.parameters {
            head.push_str(&format!(
                " {} {}: {}",
                parameter.annotations.join(" "),
                parameter.name,
                parameter.type_name
            ));
        }
        if let Some(returns) = &self.signature.returns {
            head.push_str(" -> ");
            head.push_str(returns);
        }
        lines.push(head);
        lines.extend(self.body.iter().cloned());
        lines
    }
}
