use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{GenError, Result};
use crate::model::ColumnModel;

/// Catalog, schema and name of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullyQualifiedTable {
    #[serde(default)]
    pub catalog: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
    pub name: String,
}

impl FullyQualifiedTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            catalog: None,
            schema: None,
            name: name.into(),
        }
    }

    /// Returns the name to use in SQL (catalog.schema.table, skipping absent parts).
    pub fn qualified_name(&self) -> String {
        [self.catalog.as_deref(), self.schema.as_deref(), Some(&self.name)]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// How the database hands back a generated key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "statement")]
pub enum KeyStrategy {
    /// Keys come back through the driver's standard generated-keys support.
    JdbcStandard,
    /// Keys are fetched with a follow-up statement after the insert.
    Statement(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedKey {
    pub column: String,
    pub strategy: KeyStrategy,
}

impl GeneratedKey {
    pub fn jdbc_standard(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            strategy: KeyStrategy::JdbcStandard,
        }
    }

    pub fn statement(column: impl Into<String>, statement: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            strategy: KeyStrategy::Statement(statement.into()),
        }
    }

    /// Only driver-reported keys can be retrieved for a batch of rows.
    pub fn supports_batch(&self) -> bool {
        matches!(self.strategy, KeyStrategy::JdbcStandard)
    }
}

fn enabled() -> bool {
    true
}

/// Per-table feature flags. Everything is enabled unless switched off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRules {
    #[serde(default = "enabled")]
    pub insert: bool,
    #[serde(default = "enabled")]
    pub multi_row_insert: bool,
    #[serde(default = "enabled")]
    pub select_by_primary_key: bool,
    #[serde(default = "enabled")]
    pub select_by_example: bool,
    #[serde(default = "enabled")]
    pub update_by_primary_key: bool,
    #[serde(default = "enabled")]
    pub update_by_example: bool,
    #[serde(default = "enabled")]
    pub delete_by_primary_key: bool,
    #[serde(default = "enabled")]
    pub delete_by_example: bool,
    #[serde(default = "enabled")]
    pub count_by_example: bool,
}

impl Default for TableRules {
    fn default() -> Self {
        Self {
            insert: true,
            multi_row_insert: true,
            select_by_primary_key: true,
            select_by_example: true,
            update_by_primary_key: true,
            update_by_example: true,
            delete_by_primary_key: true,
            delete_by_example: true,
            count_by_example: true,
        }
    }
}

/// Read-only description of one table, as handed over by introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableModel {
    table: FullyQualifiedTable,
    domain_object_name: String,
    #[serde(default)]
    model_package: String,
    #[serde(default)]
    client_package: String,
    columns: Vec<ColumnModel>,
    #[serde(default)]
    primary_key: Vec<String>,
    #[serde(default)]
    generated_key: Option<GeneratedKey>,
    #[serde(default)]
    rules: TableRules,
    #[serde(default)]
    properties: BTreeMap<String, String>,
}

impl TableModel {
    pub fn builder(
        table_name: impl Into<String>,
        domain_object_name: impl Into<String>,
    ) -> TableModelBuilder {
        TableModelBuilder::new(table_name, domain_object_name)
    }

    /// Parses a table model from its JSON form. The result is not validated.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks the model for contradictory state.
    pub fn validate(&self) -> Result<()> {
        let malformed = |reason: String| GenError::MalformedTable {
            table: self.table.qualified_name(),
            reason,
        };

        if self.columns.is_empty() {
            return Err(malformed("table declares no columns".to_string()));
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(malformed(format!("duplicate column {}", column.name)));
            }
        }

        for key in &self.primary_key {
            if self.column(key).is_none() {
                return Err(malformed(format!("primary key column {} is not declared", key)));
            }
        }

        if let Some(key) = &self.generated_key {
            if self.column(&key.column).is_none() {
                return Err(malformed(format!(
                    "generated key column {} is not declared",
                    key.column
                )));
            }
        }

        Ok(())
    }

    pub fn table(&self) -> &FullyQualifiedTable {
        &self.table
    }

    pub fn domain_object_name(&self) -> &str {
        &self.domain_object_name
    }

    pub fn columns(&self) -> &[ColumnModel] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnModel> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn is_primary_key(&self, column: &ColumnModel) -> bool {
        self.primary_key.iter().any(|k| *k == column.name)
    }

    /// Primary key columns, in key declaration order.
    pub fn primary_key_columns(&self) -> Vec<&ColumnModel> {
        self.primary_key
            .iter()
            .filter_map(|key| self.column(key))
            .collect()
    }

    pub fn non_primary_key_columns(&self) -> Vec<&ColumnModel> {
        self.columns
            .iter()
            .filter(|c| !self.is_primary_key(c))
            .collect()
    }

    /// All columns except large objects.
    pub fn base_columns(&self) -> Vec<&ColumnModel> {
        self.columns.iter().filter(|c| !c.is_blob()).collect()
    }

    pub fn non_primary_key_base_columns(&self) -> Vec<&ColumnModel> {
        self.columns
            .iter()
            .filter(|c| !c.is_blob() && !self.is_primary_key(c))
            .collect()
    }

    pub fn blob_columns(&self) -> Vec<&ColumnModel> {
        self.columns.iter().filter(|c| c.is_blob()).collect()
    }

    pub fn has_primary_key(&self) -> bool {
        !self.primary_key.is_empty()
    }

    pub fn has_blob_columns(&self) -> bool {
        self.columns.iter().any(|c| c.is_blob())
    }

    pub fn generated_key(&self) -> Option<&GeneratedKey> {
        self.generated_key.as_ref()
    }

    pub fn rules(&self) -> &TableRules {
        &self.rules
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(|s| s.as_str())
    }

    pub fn record_type(&self) -> String {
        qualify(&self.model_package, &self.domain_object_name)
    }

    pub fn example_type(&self) -> String {
        format!("{}Example", self.record_type())
    }

    pub fn mapper_type(&self) -> String {
        qualify(&self.client_package, &format!("{}Mapper", self.domain_object_name))
    }

    pub fn support_type(&self) -> String {
        qualify(
            &self.client_package,
            &format!("{}DynamicSqlSupport", self.domain_object_name),
        )
    }

    pub fn provider_type(&self) -> String {
        qualify(
            &self.client_package,
            &format!("{}SqlProvider", self.domain_object_name),
        )
    }
}

fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", package, name)
    }
}

/// Builder for assembling table models in code.
pub struct TableModelBuilder {
    model: TableModel,
}

impl TableModelBuilder {
    pub fn new(table_name: impl Into<String>, domain_object_name: impl Into<String>) -> Self {
        Self {
            model: TableModel {
                table: FullyQualifiedTable::new(table_name),
                domain_object_name: domain_object_name.into(),
                model_package: String::new(),
                client_package: String::new(),
                columns: Vec::new(),
                primary_key: Vec::new(),
                generated_key: None,
                rules: TableRules::default(),
                properties: BTreeMap::new(),
            },
        }
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.model.table.schema = Some(schema.into());
        self
    }

    pub fn packages(mut self, model: impl Into<String>, client: impl Into<String>) -> Self {
        self.model.model_package = model.into();
        self.model.client_package = client.into();
        self
    }

    pub fn column(mut self, column: ColumnModel) -> Self {
        self.model.columns.push(column);
        self
    }

    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.model.primary_key.push(column.into());
        self
    }

    pub fn generated_key(mut self, key: GeneratedKey) -> Self {
        self.model.generated_key = Some(key);
        self
    }

    pub fn rules(mut self, rules: TableRules) -> Self {
        self.model.rules = rules;
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.model.properties.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> TableModel {
        self.model
    }
}
