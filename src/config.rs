use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::TableModel;

/// Table property that overrides the profile's snake-case flag.
pub const USE_SNAKE_CASE_IDENTIFIERS: &str = "useSnakeCaseIdentifiers";
/// Table property that overrides the name of the table qualifier object.
pub const TABLE_OBJECT_NAME: &str = "dynamicSqlTableObjectName";
/// Table property naming a supertype every generated mapper should extend.
pub const ROOT_INTERFACE: &str = "rootInterface";

/// Output dialect selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dialect {
    /// Java mapper interface driven by the dynamic SQL DSL, plus a support class.
    DynamicSql,
    /// Kotlin mapper interface with extension functions, plus a support object.
    Kotlin,
    /// XML mapper document.
    XmlMapper,
    /// Annotated Java mapper interface, plus an SQL provider class.
    AnnotatedMapper,
}

impl Dialect {
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::DynamicSql => "dynamic SQL",
            Dialect::Kotlin => "Kotlin",
            Dialect::XmlMapper => "XML mapper",
            Dialect::AnnotatedMapper => "annotated mapper",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The naming/style profile for one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamingProfile {
    pub dialect: Dialect,
    #[serde(default)]
    pub use_snake_case: bool,
    #[serde(default = "default_reuse")]
    pub reuse_result_structures: bool,
}

fn default_reuse() -> bool {
    true
}

impl NamingProfile {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            use_snake_case: false,
            reuse_result_structures: true,
        }
    }

    pub fn with_snake_case(mut self, enabled: bool) -> Self {
        self.use_snake_case = enabled;
        self
    }

    pub fn with_result_structure_reuse(mut self, enabled: bool) -> Self {
        self.reuse_result_structures = enabled;
        self
    }

    /// Parses a profile from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolves the snake-case flag for a table. A table property wins over the profile.
    pub fn use_snake_case_for(&self, table: &TableModel) -> bool {
        table
            .property(USE_SNAKE_CASE_IDENTIFIERS)
            .map(|value| value.eq_ignore_ascii_case("true"))
            .unwrap_or(self.use_snake_case)
    }
}
