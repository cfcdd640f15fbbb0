use crate::types::{Parameter, References, TypeName};

/// A reusable composite piece of an artifact: body lines, the references those
/// lines need, and any parameters or annotations the host artifact must declare.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    lines: Vec<String>,
    references: References,
    parameters: Vec<Parameter>,
    annotations: Vec<String>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn with_import(mut self, import: impl Into<String>) -> Self {
        self.references.add_import(import);
        self
    }

    pub fn with_type(mut self, type_name: &TypeName) -> Self {
        self.references.add_type(type_name);
        self
    }

    pub fn with_static_import(mut self, import: impl Into<String>) -> Self {
        self.references.add_static_import(import);
        self
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    pub fn references_mut(&mut self) -> &mut References {
        &mut self.references
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn references(&self) -> &References {
        &self.references
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn annotations(&self) -> &[String] {
        &self.annotations
    }

    pub fn into_parts(self) -> (Vec<String>, References, Vec<Parameter>, Vec<String>) {
        (self.lines, self.references, self.parameters, self.annotations)
    }
}
