use heck::{ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};

use crate::config::{Dialect, NamingProfile, TABLE_OBJECT_NAME};
use crate::model::{ColumnModel, TableModel};
use crate::types::TypeName;

/// Shared result structure id of the markup dialects.
pub const BASE_RESULT_MAP: &str = "BaseResultMap";
pub const BLOB_RESULT_MAP: &str = "ResultMapWithBLOBs";
pub const BASE_COLUMN_LIST: &str = "Base_Column_List";
pub const BLOB_COLUMN_LIST: &str = "Blob_Column_List";
pub const EXAMPLE_WHERE_CLAUSE: &str = "Example_Where_Clause";
pub const UPDATE_BY_EXAMPLE_WHERE_CLAUSE: &str = "Update_By_Example_Where_Clause";

/// A column's field reference inside generated code, and the static import
/// that makes the reference resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReference {
    pub reference: String,
    pub import: String,
}

/// Names derived from a table model and naming profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    record: TypeName,
    example: TypeName,
    mapper: TypeName,
    support: TypeName,
    provider: TypeName,
    table_field: String,
    table_class: String,
    result_map_id: String,
    snake_case: bool,
}

impl TableNames {
    pub fn new(table: &TableModel, profile: &NamingProfile) -> Self {
        let snake_case = profile.use_snake_case_for(table);
        let object_name = table
            .property(TABLE_OBJECT_NAME)
            .unwrap_or_else(|| table.domain_object_name());
        let table_field = if snake_case {
            object_name.to_snake_case()
        } else {
            object_name.to_lower_camel_case()
        };
        let record = TypeName::new(table.record_type());
        let result_map_id = match profile.dialect {
            Dialect::DynamicSql | Dialect::Kotlin => format!("{}Result", record.short_name()),
            Dialect::XmlMapper | Dialect::AnnotatedMapper => BASE_RESULT_MAP.to_string(),
        };

        Self {
            example: TypeName::new(table.example_type()),
            mapper: TypeName::new(table.mapper_type()),
            support: TypeName::new(table.support_type()),
            provider: TypeName::new(table.provider_type()),
            table_class: object_name.to_upper_camel_case(),
            record,
            table_field,
            result_map_id,
            snake_case,
        }
    }

    pub fn record(&self) -> &TypeName {
        &self.record
    }

    pub fn example(&self) -> &TypeName {
        &self.example
    }

    pub fn mapper(&self) -> &TypeName {
        &self.mapper
    }

    pub fn support(&self) -> &TypeName {
        &self.support
    }

    pub fn provider(&self) -> &TypeName {
        &self.provider
    }

    /// Name of the table qualifier object in the support declarations.
    pub fn table_field(&self) -> &str {
        &self.table_field
    }

    /// Name of the table class nested in the support declarations.
    pub fn table_class(&self) -> &str {
        &self.table_class
    }

    pub fn result_map_id(&self) -> &str {
        &self.result_map_id
    }

    pub fn snake_case(&self) -> bool {
        self.snake_case
    }

    /// The one naming function every derived identifier goes through.
    pub fn identifier(&self, name: &str) -> String {
        if self.snake_case {
            name.to_snake_case()
        } else {
            name.to_string()
        }
    }

    /// Record property name of a column.
    pub fn property(&self, column: &ColumnModel) -> String {
        self.identifier(&column.property)
    }

    /// Field name of a column in the support declarations.
    pub fn field(&self, column: &ColumnModel) -> String {
        self.property(column)
    }

    /// Name of the parameter carrying a key value, e.g. `id_`.
    pub fn key_parameter(&self, column: &ColumnModel) -> String {
        format!("{}_", self.property(column))
    }

    /// Java bean getter, e.g. `getOrderDate`.
    pub fn getter(&self, column: &ColumnModel) -> String {
        let property = self.property(column);
        let mut chars = property.chars();
        match chars.next() {
            Some(first) => format!("get{}{}", first.to_ascii_uppercase(), chars.as_str()),
            None => "get".to_string(),
        }
    }

    /// Reference to a column field. When the field name collides with the
    /// table qualifier, the field is reached through the qualifier and the
    /// import is keyed off the qualifier.
    pub fn field_reference(&self, column: &ColumnModel) -> FieldReference {
        let field = self.field(column);
        let support = self.support.fully_qualified();
        if field == self.table_field {
            FieldReference {
                reference: format!("{}.{}", self.table_field, field),
                import: format!("{}.{}", support, self.table_field),
            }
        } else {
            FieldReference {
                import: format!("{}.{}", support, field),
                reference: field,
            }
        }
    }

    /// True when the column's field shares the table qualifier's name.
    pub fn collides(&self, column: &ColumnModel) -> bool {
        self.field(column) == self.table_field
    }

    /// Static import of the table qualifier itself.
    pub fn table_import(&self) -> String {
        format!("{}.{}", self.support.fully_qualified(), self.table_field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::USE_SNAKE_CASE_IDENTIFIERS;

    fn orders() -> crate::model::TableModelBuilder {
        TableModel::builder("orders", "Order")
            .packages("com.example.model", "com.example.mapper")
            .column(ColumnModel::new("id", "id", "INTEGER"))
            .column(ColumnModel::new("order_date", "orderDate", "DATE"))
    }

    #[test]
    fn test_default_names() {
        let names = TableNames::new(&orders().build(), &NamingProfile::new(Dialect::DynamicSql));

        assert_eq!(names.record().fully_qualified(), "com.example.model.Order");
        assert_eq!(names.mapper().short_name(), "OrderMapper");
        assert_eq!(names.support().short_name(), "OrderDynamicSqlSupport");
        assert_eq!(names.table_field(), "order");
        assert_eq!(names.table_class(), "Order");
        assert_eq!(names.result_map_id(), "OrderResult");
    }

    #[test]
    fn test_markup_dialects_share_base_result_map() {
        let names = TableNames::new(&orders().build(), &NamingProfile::new(Dialect::XmlMapper));
        assert_eq!(names.result_map_id(), "BaseResultMap");
    }

    #[test]
    fn test_snake_case_from_table_property() {
        let table = orders()
            .property(USE_SNAKE_CASE_IDENTIFIERS, "true")
            .property(TABLE_OBJECT_NAME, "OrderTable")
            .build();
        let names = TableNames::new(&table, &NamingProfile::new(Dialect::DynamicSql));
        let order_date = &table.columns()[1];

        assert!(names.snake_case());
        assert_eq!(names.table_field(), "order_table");
        assert_eq!(names.property(order_date), "order_date");
        assert_eq!(names.key_parameter(order_date), "order_date_");
        assert_eq!(names.getter(order_date), "getOrder_date");
    }

    #[test]
    fn test_field_reference_on_collision() {
        let table = orders()
            .column(ColumnModel::new("order", "order", "VARCHAR"))
            .build();
        let names = TableNames::new(&table, &NamingProfile::new(Dialect::Kotlin));

        let collided = names.field_reference(&table.columns()[2]);
        assert_eq!(collided.reference, "order.order");
        assert_eq!(collided.import, "com.example.mapper.OrderDynamicSqlSupport.order");

        let plain = names.field_reference(&table.columns()[1]);
        assert_eq!(plain.reference, "orderDate");
        assert_eq!(plain.import, "com.example.mapper.OrderDynamicSqlSupport.orderDate");
    }
}
