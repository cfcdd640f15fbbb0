/// A fully qualified host-language type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName {
    fully_qualified: String,
}

impl TypeName {
    pub fn new(fully_qualified: impl Into<String>) -> Self {
        Self {
            fully_qualified: fully_qualified.into(),
        }
    }

    pub fn fully_qualified(&self) -> &str {
        &self.fully_qualified
    }

    /// Returns the simple name, e.g. `Order` for `com.example.model.Order`.
    pub fn short_name(&self) -> &str {
        match self.fully_qualified.rfind('.') {
            Some(idx) => &self.fully_qualified[idx + 1..],
            None => &self.fully_qualified,
        }
    }

    pub fn package(&self) -> Option<&str> {
        self.fully_qualified
            .rfind('.')
            .map(|idx| &self.fully_qualified[..idx])
    }

    /// Returns the import needed to reference this type by its short name, if any.
    /// Types from the implicitly imported packages need none.
    pub fn import(&self) -> Option<String> {
        match self.package() {
            None | Some("java.lang") | Some("kotlin") => None,
            Some(_) => Some(self.fully_qualified.clone()),
        }
    }
}

impl From<&str> for TypeName {
    fn from(value: &str) -> Self {
        TypeName::new(value)
    }
}

impl From<String> for TypeName {
    fn from(value: String) -> Self {
        TypeName::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_and_import() {
        let record = TypeName::new("com.example.model.Order");
        assert_eq!(record.short_name(), "Order");
        assert_eq!(record.import().as_deref(), Some("com.example.model.Order"));
    }

    #[test]
    fn test_implicit_packages_need_no_import() {
        assert_eq!(TypeName::new("java.lang.Integer").import(), None);
        assert_eq!(TypeName::new("kotlin.Int").import(), None);
        assert_eq!(TypeName::new("byte[]").import(), None);
        assert_eq!(TypeName::new("byte[]").short_name(), "byte[]");
    }
}
