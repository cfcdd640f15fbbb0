use serde::{Deserialize, Serialize};

use crate::types::{JdbcType, TypeName};

fn default_nullable() -> bool {
    true
}

/// One introspected column of a table.
/// Instances are typically produced by schema introspection outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnModel {
    /// Column name as it appears in the database.
    pub name: String,
    /// Property name on the record type, in camel case.
    pub property: String,
    pub jdbc_type: JdbcType,
    /// Explicit host type, overriding the JDBC type mapping.
    #[serde(default)]
    pub host_type: Option<String>,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default)]
    pub identity: bool,
    #[serde(default)]
    pub generated_always: bool,
    #[serde(default)]
    pub sequence: bool,
}

impl ColumnModel {
    pub fn new(
        name: impl Into<String>,
        property: impl Into<String>,
        jdbc_type: impl Into<JdbcType>,
    ) -> Self {
        Self {
            name: name.into(),
            property: property.into(),
            jdbc_type: jdbc_type.into(),
            host_type: None,
            nullable: true,
            identity: false,
            generated_always: false,
            sequence: false,
        }
    }

    pub fn identity(mut self) -> Self {
        self.identity = true;
        self
    }

    pub fn generated_always(mut self) -> Self {
        self.generated_always = true;
        self
    }

    pub fn sequence(mut self) -> Self {
        self.sequence = true;
        self
    }

    pub fn with_host_type(mut self, host_type: impl Into<String>) -> Self {
        self.host_type = Some(host_type.into());
        self
    }

    pub fn is_blob(&self) -> bool {
        self.jdbc_type.is_blob()
    }

    /// True for columns the database always fills in on write.
    pub fn is_database_generated(&self) -> bool {
        self.identity || self.generated_always
    }

    pub fn java_type(&self) -> TypeName {
        match &self.host_type {
            Some(host) => TypeName::new(host.as_str()),
            None => TypeName::new(self.jdbc_type.java_type()),
        }
    }

    pub fn kotlin_type(&self) -> TypeName {
        match &self.host_type {
            Some(host) => TypeName::new(host.as_str()),
            None => TypeName::new(self.jdbc_type.kotlin_type()),
        }
    }
}

/// A reference to a column inside SQL text, optionally qualified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub qualifier: Option<String>,
    pub column: String,
}

impl ColumnRef {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            qualifier: None,
            column: column.into(),
        }
    }

    pub fn qualified(qualifier: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            qualifier: Some(qualifier.into()),
            column: column.into(),
        }
    }

    pub fn from_column(col: &ColumnModel) -> Self {
        Self::new(col.name.as_str())
    }

    pub fn qualified_name(&self) -> String {
        match &self.qualifier {
            Some(qualifier) => format!("{}.{}", qualifier, self.column),
            None => self.column.clone(),
        }
    }
}
