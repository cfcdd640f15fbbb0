use crate::generators::ArtifactKind;
use crate::types::{
    ArtifactShape, CandidateArtifact, Fragment, Marker, Parameter, References, Signature,
    TypeName,
};

/// Incremental builder for a candidate artifact.
/// Call `.build()` once every part has been added.
pub struct ArtifactBuilder {
    kind: ArtifactKind,
    shape: ArtifactShape,
    signature: Signature,
    body: Vec<String>,
    references: References,
    markers: Vec<Marker>,
}

impl ArtifactBuilder {
    fn new(kind: ArtifactKind, shape: ArtifactShape, name: impl Into<String>) -> Self {
        Self {
            kind,
            shape,
            signature: Signature::new(name),
            body: Vec::new(),
            references: References::new(),
            markers: Vec::new(),
        }
    }

    /// Start building a method or function.
    pub fn operation(kind: ArtifactKind, name: impl Into<String>) -> Self {
        Self::new(kind, ArtifactShape::Operation, name)
    }

    /// Start building a field declaration of the given type.
    pub fn field(kind: ArtifactKind, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let mut builder = Self::new(kind, ArtifactShape::Field, name);
        builder.signature.returns = Some(type_name.into());
        builder
    }

    /// Start building a markup element.
    pub fn element(kind: ArtifactKind, element_name: impl Into<String>) -> Self {
        Self::new(kind, ArtifactShape::Element, element_name)
    }

    pub fn receiver(mut self, receiver: impl Into<String>) -> Self {
        self.signature.receiver = Some(receiver.into());
        self
    }

    pub fn modifier(mut self, modifier: impl Into<String>) -> Self {
        self.signature.modifiers.push(modifier.into());
        self
    }

    pub fn annotation(mut self, annotation: impl Into<String>) -> Self {
        self.signature.annotations.push(annotation.into());
        self
    }

    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.signature.parameters.push(parameter);
        self
    }

    pub fn returns(mut self, type_name: impl Into<String>) -> Self {
        self.signature.returns = Some(type_name.into());
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.signature.attributes.push((name.into(), value.into()));
        self
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.body.push(line.into());
        self
    }

    pub fn lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.body.extend(lines.into_iter().map(Into::into));
        self
    }

    pub fn import(mut self, import: impl Into<String>) -> Self {
        self.references.add_import(import);
        self
    }

    pub fn imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for import in imports {
            self.references.add_import(import);
        }
        self
    }

    /// Adds the import for a type, when it needs one.
    pub fn type_import(mut self, type_name: &TypeName) -> Self {
        self.references.add_type(type_name);
        self
    }

    pub fn static_import(mut self, import: impl Into<String>) -> Self {
        self.references.add_static_import(import);
        self
    }

    /// Merges references computed elsewhere, e.g. by a fragment whose lines
    /// were spliced into a single body line.
    pub fn references(mut self, references: &References) -> Self {
        self.references.merge(references);
        self
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    /// Merges a shared fragment: its parameters and annotations go to the
    /// signature, its lines to the end of the body, its references to the
    /// artifact's reference set.
    pub fn fragment(mut self, fragment: Fragment) -> Self {
        let (lines, references, parameters, annotations) = fragment.into_parts();
        self.signature.parameters.extend(parameters);
        self.signature.annotations.extend(annotations);
        self.body.extend(lines);
        self.references.merge(&references);
        self
    }

    pub fn build(self) -> CandidateArtifact {
        CandidateArtifact::from_parts(
            self.kind,
            self.shape,
            self.signature,
            self.body,
            self.references,
            self.markers,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_operation() {
        let artifact = ArtifactBuilder::operation(ArtifactKind::GeneralDelete, "delete")
            .modifier("default")
            .parameter(Parameter::new("completer", "DeleteDSLCompleter"))
            .returns("int")
            .line("return MyBatis3Utils.deleteFrom(this::delete, order, completer);")
            .import("org.mybatis.dynamic.sql.delete.DeleteDSLCompleter")
            .build();

        assert_eq!(artifact.kind(), ArtifactKind::GeneralDelete);
        assert_eq!(artifact.shape(), ArtifactShape::Operation);
        assert_eq!(artifact.signature().name, "delete");
        assert_eq!(artifact.signature().returns.as_deref(), Some("int"));
        assert_eq!(artifact.body().len(), 1);
        assert!(artifact
            .references()
            .has_import("org.mybatis.dynamic.sql.delete.DeleteDSLCompleter"));
    }

    #[test]
    fn test_fragment_parts_are_merged() {
        let fragment = Fragment::new()
            .with_parameter(Parameter::new("id_", "Integer"))
            .with_line("c.where(id, isEqualTo(id_))")
            .with_static_import("org.mybatis.dynamic.sql.SqlBuilder.isEqualTo");

        let artifact = ArtifactBuilder::operation(ArtifactKind::DeleteByPrimaryKey, "deleteByPrimaryKey")
            .line("return delete(c ->")
            .fragment(fragment)
            .line(");")
            .build();

        assert_eq!(artifact.signature().parameters[0].name, "id_");
        assert_eq!(
            artifact.body(),
            &["return delete(c ->", "c.where(id, isEqualTo(id_))", ");"]
        );
        assert!(artifact
            .references()
            .has_static_import("org.mybatis.dynamic.sql.SqlBuilder.isEqualTo"));
    }

    #[test]
    fn test_build_element() {
        let artifact = ArtifactBuilder::element(ArtifactKind::BaseColumnList, "sql")
            .attribute("id", "Base_Column_List")
            .line("id, order_date")
            .build();

        assert_eq!(artifact.shape(), ArtifactShape::Element);
        assert_eq!(artifact.signature().attribute("id"), Some("Base_Column_List"));
    }
}
