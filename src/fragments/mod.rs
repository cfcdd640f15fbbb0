//! Shared sub-expressions reused by many artifacts.
//!
//! Every fragment is computed on request from the table model and the derived
//! names; nothing is cached, so asking twice yields identical fragments.

mod naming;

pub use naming::{
    FieldReference, TableNames, BASE_COLUMN_LIST, BASE_RESULT_MAP, BLOB_COLUMN_LIST,
    BLOB_RESULT_MAP, EXAMPLE_WHERE_CLAUSE, UPDATE_BY_EXAMPLE_WHERE_CLAUSE,
};

use crate::clauses::{Placeholder, WhereClause};
use crate::config::Dialect;
use crate::model::{ColumnModel, ColumnRef, KeyStrategy, TableModel};
use crate::types::{Fragment, Parameter, TypeName};

const IS_EQUAL_TO: &str = "org.mybatis.dynamic.sql.SqlBuilder.isEqualTo";
const RESULT: &str = "org.apache.ibatis.annotations.Result";
const RESULTS: &str = "org.apache.ibatis.annotations.Results";
const RESULT_MAP: &str = "org.apache.ibatis.annotations.ResultMap";
const JDBC_TYPE: &str = "org.apache.ibatis.type.JdbcType";
const OPTIONS: &str = "org.apache.ibatis.annotations.Options";
const SELECT_KEY: &str = "org.apache.ibatis.annotations.SelectKey";

/// How a column takes part in an insert or update body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteInclusion {
    /// The database fills the column in; it never appears in write bodies.
    Excluded,
    /// Always written.
    Always,
    /// Written only when the record carries a value.
    WhenPresent,
}

/// The per-column mapping shared by read fragments (result structures) and
/// write fragments (insert and update bodies).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping<'a> {
    pub column: &'a ColumnModel,
    pub property: String,
    pub jdbc_type: String,
    pub host_type: TypeName,
    pub is_key: bool,
}

/// Builds fragments for one table run.
#[derive(Debug, Clone, Copy)]
pub struct FragmentGenerator<'a> {
    table: &'a TableModel,
    names: &'a TableNames,
    dialect: Dialect,
}

impl<'a> FragmentGenerator<'a> {
    pub fn new(table: &'a TableModel, names: &'a TableNames, dialect: Dialect) -> Self {
        Self {
            table,
            names,
            dialect,
        }
    }

    pub fn table(&self) -> &'a TableModel {
        self.table
    }

    pub fn names(&self) -> &'a TableNames {
        self.names
    }

    fn is_kotlin(&self) -> bool {
        self.dialect == Dialect::Kotlin
    }

    pub fn host_type(&self, column: &ColumnModel) -> TypeName {
        if self.is_kotlin() {
            column.kotlin_type()
        } else {
            column.java_type()
        }
    }

    pub fn mapping<'c>(&self, column: &'c ColumnModel) -> ColumnMapping<'c> {
        ColumnMapping {
            column,
            property: self.names.property(column),
            jdbc_type: column.jdbc_type.name().to_string(),
            host_type: self.host_type(column),
            is_key: self.table.is_primary_key(column),
        }
    }

    pub fn write_inclusion(&self, column: &ColumnModel, selective: bool) -> WriteInclusion {
        if column.is_database_generated() {
            WriteInclusion::Excluded
        } else if column.sequence || !selective {
            WriteInclusion::Always
        } else {
            WriteInclusion::WhenPresent
        }
    }

    /// Columns that appear in a non-selective insert, in table order.
    pub fn insert_columns(&self) -> Vec<&'a ColumnModel> {
        self.writable(self.table.columns().iter())
    }

    fn writable(&self, columns: impl Iterator<Item = &'a ColumnModel>) -> Vec<&'a ColumnModel> {
        columns
            .filter(|c| self.write_inclusion(c, false) != WriteInclusion::Excluded)
            .collect()
    }

    /// Non-key columns that an update may set.
    pub fn update_columns(&self, with_blobs: bool) -> Vec<&'a ColumnModel> {
        let columns = if with_blobs {
            self.table.non_primary_key_columns()
        } else {
            self.table.non_primary_key_base_columns()
        };
        self.writable(columns.into_iter())
    }

    /// Every column an update-by-example may set.
    pub fn example_update_columns(&self, with_blobs: bool) -> Vec<&'a ColumnModel> {
        let columns = if with_blobs {
            self.table.columns().iter().collect()
        } else {
            self.table.base_columns()
        };
        self.writable(columns.into_iter())
    }

    fn add_field_import(&self, fragment: Fragment, import: String) -> Fragment {
        if self.is_kotlin() {
            fragment.with_import(import)
        } else {
            fragment.with_static_import(import)
        }
    }

    // Markup and annotation fragments

    /// Comma separated SQL column names.
    pub fn column_list(&self, columns: &[&ColumnModel]) -> String {
        columns
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The bound parameter for a column, e.g. `#{row.orderDate,jdbcType=DATE}`.
    pub fn parameter_clause(&self, column: &ColumnModel, prefix: Option<&str>) -> String {
        self.placeholder(column, prefix).render()
    }

    fn placeholder(&self, column: &ColumnModel, prefix: Option<&str>) -> Placeholder {
        let placeholder = Placeholder::for_column(column, self.names.property(column));
        match prefix {
            Some(prefix) => placeholder.with_prefix(prefix),
            None => placeholder,
        }
    }

    /// `key = #{key}` for every primary key column; `None` without a key.
    pub fn primary_key_predicate(&self, prefix: Option<&str>) -> Option<WhereClause> {
        WhereClause::all(self.table.primary_key_columns().into_iter().map(|column| {
            WhereClause::eq(ColumnRef::from_column(column), self.placeholder(column, prefix))
        }))
    }

    /// `(column, placeholder)` pairs for a non-selective insert.
    pub fn insert_values(&self) -> Vec<(String, String)> {
        self.insert_columns()
            .into_iter()
            .map(|c| (c.name.clone(), self.parameter_clause(c, None)))
            .collect()
    }

    /// `column = #{param}` assignments separated by commas.
    pub fn set_assignments(&self, columns: &[&ColumnModel], prefix: Option<&str>) -> Vec<String> {
        let last = columns.len().saturating_sub(1);
        columns
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let separator = if i < last { "," } else { "" };
                format!("{} = {}{}", c.name, self.parameter_clause(c, prefix), separator)
            })
            .collect()
    }

    /// Result map children, one `<id>` or `<result>` element per column.
    pub fn result_entries(&self, columns: &[&ColumnModel]) -> Vec<String> {
        columns
            .iter()
            .map(|c| {
                let mapping = self.mapping(*c);
                let element = if mapping.is_key { "id" } else { "result" };
                format!(
                    "<{} column=\"{}\" jdbcType=\"{}\" property=\"{}\" />",
                    element, c.name, mapping.jdbc_type, mapping.property
                )
            })
            .collect()
    }

    // Dynamic SQL fragments

    /// The table qualifier reference and its import.
    pub fn table_reference(&self) -> Fragment {
        self.add_field_import(Fragment::new(), self.names.table_import())
    }

    /// Comma separated field references to every column.
    pub fn select_list(&self) -> Fragment {
        let mut fragment = Fragment::new();
        let mut references = Vec::with_capacity(self.table.columns().len());
        for column in self.table.columns() {
            let field = self.names.field_reference(column);
            fragment = self.add_field_import(fragment, field.import);
            references.push(field.reference);
        }
        fragment.with_line(references.join(", "))
    }

    /// Primary key predicate as DSL lines. Without `for_update` the key values
    /// come from declared parameters; with it they come from the record.
    pub fn primary_key_where(&self, for_update: bool) -> Fragment {
        let mut fragment = Fragment::new();
        if !self.is_kotlin() {
            fragment = fragment.with_static_import(IS_EQUAL_TO);
        }

        for (i, column) in self.table.primary_key_columns().into_iter().enumerate() {
            let field = self.names.field_reference(column);
            fragment = self.add_field_import(fragment, field.import);

            let value = if for_update {
                self.record_value(column)
            } else {
                let name = self.names.key_parameter(column);
                let host = self.host_type(column);
                fragment = fragment
                    .with_type(&host)
                    .with_parameter(Parameter::new(name.clone(), host.short_name()));
                name
            };

            let line = match (self.is_kotlin(), i) {
                (true, 0) => format!("where {{ {} isEqualTo {} }}", field.reference, value),
                (true, _) => format!("and {{ {} isEqualTo {} }}", field.reference, value),
                (false, 0) if for_update => {
                    format!(".where({}, isEqualTo({}))", field.reference, value)
                }
                (false, 0) => format!("c.where({}, isEqualTo({}))", field.reference, value),
                (false, _) => format!(".and({}, isEqualTo({}))", field.reference, value),
            };
            fragment.push_line(line);
        }
        fragment
    }

    fn record_value(&self, column: &ColumnModel) -> String {
        if self.is_kotlin() {
            format!("row.{}!!", self.names.property(column))
        } else {
            format!("row::{}", self.names.getter(column))
        }
    }

    fn record_accessor(&self, column: &ColumnModel) -> String {
        if self.is_kotlin() {
            format!("row::{}", self.names.property(column))
        } else {
            format!("row::{}", self.names.getter(column))
        }
    }

    /// A full inline result structure declaration over every column.
    pub fn annotated_results(&self) -> Fragment {
        let columns: Vec<_> = self.table.columns().iter().collect();
        self.annotated_results_for(self.names.result_map_id(), &columns)
    }

    /// An inline result structure with the given id over `columns`.
    pub fn annotated_results_for(&self, id: &str, columns: &[&ColumnModel]) -> Fragment {
        let mut fragment = Fragment::new()
            .with_import(RESULT)
            .with_import(RESULTS)
            .with_import(JDBC_TYPE);
        let (open, close, entry) = if self.is_kotlin() {
            ("[", "]", "Result")
        } else {
            ("{", "}", "@Result")
        };

        fragment = fragment.with_annotation(format!("@Results(id=\"{}\", value = {}", id, open));
        for (i, column) in columns.iter().enumerate() {
            let mapping = self.mapping(*column);
            let id = if mapping.is_key { ", id=true" } else { "" };
            let separator = if i + 1 < columns.len() { "," } else { "" };
            fragment = fragment.with_annotation(format!(
                "    {}(column=\"{}\", property=\"{}\", jdbcType=JdbcType.{}{}){}",
                entry, column.name, mapping.property, mapping.jdbc_type, id, separator
            ));
        }
        fragment.with_annotation(format!("{})", close))
    }

    /// A reference to the shared result structure.
    pub fn result_map_reference(&self) -> Fragment {
        self.result_map_reference_for(self.names.result_map_id())
    }

    pub fn result_map_reference_for(&self, id: &str) -> Fragment {
        Fragment::new()
            .with_import(RESULT_MAP)
            .with_annotation(format!("@ResultMap(\"{}\")", id))
    }

    /// Column-to-property mappings for an insert body.
    pub fn insert_mappings(&self, selective: bool) -> Fragment {
        let mut fragment = Fragment::new();
        let mut first = true;
        for column in self.table.columns() {
            let inclusion = self.write_inclusion(column, selective);
            if inclusion == WriteInclusion::Excluded {
                continue;
            }
            let field = self.names.field_reference(column);
            fragment = self.add_field_import(fragment, field.import);
            let property = self.names.property(column);

            let line = match (self.is_kotlin(), inclusion) {
                (true, WriteInclusion::WhenPresent) => format!(
                    "map({}).toPropertyWhenPresent(\"{}\", {})",
                    field.reference,
                    property,
                    self.record_accessor(column)
                ),
                (true, _) if selective => {
                    format!("map({}).toProperty(\"{}\")", field.reference, property)
                }
                (true, _) => format!("map({}) toProperty \"{}\"", field.reference, property),
                (false, WriteInclusion::WhenPresent) => format!(
                    "{}map({}).toPropertyWhenPresent(\"{}\", {})",
                    if first { "c." } else { "." },
                    field.reference,
                    property,
                    self.record_accessor(column)
                ),
                (false, _) => format!(
                    "{}map({}).toProperty(\"{}\")",
                    if first { "c." } else { "." },
                    field.reference,
                    property
                ),
            };
            fragment.push_line(line);
            first = false;
        }
        fragment
    }

    /// Set clauses for an update body over the given columns.
    pub fn set_lines(&self, columns: &[&ColumnModel], selective: bool) -> Fragment {
        let mut fragment = Fragment::new();
        for column in columns {
            let inclusion = self.write_inclusion(column, selective);
            if inclusion == WriteInclusion::Excluded {
                continue;
            }
            let field = self.names.field_reference(column);
            fragment = self.add_field_import(fragment, field.import);
            let accessor = self.record_accessor(column);

            let line = match (self.is_kotlin(), inclusion) {
                (true, WriteInclusion::WhenPresent) => {
                    format!("set({}) equalToWhenPresent {}", field.reference, accessor)
                }
                (true, _) => format!("set({}) equalToOrNull {}", field.reference, accessor),
                (false, WriteInclusion::WhenPresent) => {
                    format!(".set({}).equalToWhenPresent({})", field.reference, accessor)
                }
                (false, _) => format!(".set({}).equalTo({})", field.reference, accessor),
            };
            fragment.push_line(line);
        }
        fragment
    }

    /// Key retrieval annotation for inserts; empty without a generated key.
    /// `key_prefix` is the parameter path to the record, e.g. `row.`.
    pub fn generated_key(&self, key_prefix: &str) -> Fragment {
        let key = match self.table.generated_key() {
            Some(key) => key,
            None => return Fragment::new(),
        };
        let column = match self.table.column(&key.column) {
            Some(column) => column,
            None => return Fragment::new(),
        };
        let key_property = format!("{}{}", key_prefix, self.names.property(column));

        match &key.strategy {
            KeyStrategy::JdbcStandard => Fragment::new().with_import(OPTIONS).with_annotation(
                format!("@Options(useGeneratedKeys=true,keyProperty=\"{}\")", key_property),
            ),
            KeyStrategy::Statement(statement) => {
                let host = self.host_type(column);
                let annotation = if self.is_kotlin() {
                    format!(
                        "@SelectKey(statement=[\"{}\"], keyProperty=\"{}\", before=false, resultType={}::class)",
                        statement,
                        key_property,
                        host.short_name()
                    )
                } else {
                    format!(
                        "@SelectKey(statement=\"{}\", keyProperty=\"{}\", before=false, resultType={}.class)",
                        statement,
                        key_property,
                        host.short_name()
                    )
                };
                Fragment::new()
                    .with_import(SELECT_KEY)
                    .with_type(&host)
                    .with_annotation(annotation)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NamingProfile;
    use crate::model::GeneratedKey;

    fn orders() -> TableModel {
        TableModel::builder("orders", "Order")
            .packages("com.example.model", "com.example.mapper")
            .column(ColumnModel::new("id", "id", "INTEGER").identity())
            .column(ColumnModel::new("order_date", "orderDate", "DATE"))
            .column(ColumnModel::new("ticket", "ticket", "BIGINT").sequence())
            .primary_key("id")
            .generated_key(GeneratedKey::jdbc_standard("id"))
            .build()
    }

    fn names(table: &TableModel, dialect: Dialect) -> TableNames {
        TableNames::new(table, &NamingProfile::new(dialect))
    }

    #[test]
    fn test_fragments_are_idempotent() {
        let table = orders();
        let names = names(&table, Dialect::DynamicSql);
        let fragments = FragmentGenerator::new(&table, &names, Dialect::DynamicSql);

        assert_eq!(fragments.annotated_results(), fragments.annotated_results());
        assert_eq!(fragments.insert_mappings(true), fragments.insert_mappings(true));
        assert_eq!(fragments.primary_key_where(false), fragments.primary_key_where(false));
    }

    #[test]
    fn test_insert_mappings_skip_identity_and_keep_sequence_unconditional() {
        let table = orders();
        let names = names(&table, Dialect::DynamicSql);
        let fragments = FragmentGenerator::new(&table, &names, Dialect::DynamicSql);

        let selective = fragments.insert_mappings(true);
        assert_eq!(
            selective.lines(),
            &[
                "c.map(orderDate).toPropertyWhenPresent(\"orderDate\", row::getOrderDate)",
                ".map(ticket).toProperty(\"ticket\")",
            ]
        );
        assert!(selective
            .references()
            .has_static_import("com.example.mapper.OrderDynamicSqlSupport.orderDate"));
    }

    #[test]
    fn test_kotlin_selective_insert_uses_method_mappings() {
        let table = orders();
        let names = names(&table, Dialect::Kotlin);
        let fragments = FragmentGenerator::new(&table, &names, Dialect::Kotlin);

        let selective = fragments.insert_mappings(true);
        assert_eq!(selective.lines().len(), 2);
        assert!(selective.lines()[0].starts_with("map(orderDate).toPropertyWhenPresent(\"orderDate\", "));
        assert_eq!(selective.lines()[1], "map(ticket).toProperty(\"ticket\")");

        let full = fragments.insert_mappings(false);
        assert_eq!(
            full.lines(),
            &["map(orderDate) toProperty \"orderDate\"", "map(ticket) toProperty \"ticket\""]
        );
    }

    #[test]
    fn test_primary_key_where_declares_parameters() {
        let table = orders();
        let names = names(&table, Dialect::Kotlin);
        let fragments = FragmentGenerator::new(&table, &names, Dialect::Kotlin);

        let clause = fragments.primary_key_where(false);
        assert_eq!(clause.lines(), &["where { id isEqualTo id_ }"]);
        assert_eq!(clause.parameters()[0].name, "id_");
        assert_eq!(clause.parameters()[0].type_name, "Int");

        let for_update = fragments.primary_key_where(true);
        assert_eq!(for_update.lines(), &["where { id isEqualTo row.id!! }"]);
        assert!(for_update.parameters().is_empty());
    }

    #[test]
    fn test_annotated_results_cover_every_column() {
        let table = orders();
        let names = names(&table, Dialect::DynamicSql);
        let fragments = FragmentGenerator::new(&table, &names, Dialect::DynamicSql);

        let results = fragments.annotated_results();
        assert_eq!(results.annotations().len(), table.columns().len() + 2);
        assert_eq!(
            results.annotations()[1],
            "    @Result(column=\"id\", property=\"id\", jdbcType=JdbcType.INTEGER, id=true),"
        );
        assert!(results.references().has_import(JDBC_TYPE));
    }

    #[test]
    fn test_primary_key_predicate_and_placeholders() {
        let table = orders();
        let names = names(&table, Dialect::XmlMapper);
        let fragments = FragmentGenerator::new(&table, &names, Dialect::XmlMapper);

        let predicate = fragments.primary_key_predicate(Some("row."));
        assert_eq!(
            predicate.map(|p| p.build_sql()).as_deref(),
            Some("id = #{row.id,jdbcType=INTEGER}")
        );
        assert_eq!(
            fragments.insert_values(),
            vec![
                ("order_date".to_string(), "#{orderDate,jdbcType=DATE}".to_string()),
                ("ticket".to_string(), "#{ticket,jdbcType=BIGINT}".to_string()),
            ]
        );
    }

    #[test]
    fn test_generated_key_annotation() {
        let table = orders();
        let names = names(&table, Dialect::DynamicSql);
        let fragments = FragmentGenerator::new(&table, &names, Dialect::DynamicSql);

        assert_eq!(
            fragments.generated_key("row.").annotations(),
            &["@Options(useGeneratedKeys=true,keyProperty=\"row.id\")"]
        );
    }
}
