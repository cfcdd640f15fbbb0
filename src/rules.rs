//! Applicability predicates for every artifact kind.
//!
//! All functions here are pure: they read the table model and nothing else.

use crate::generators::ArtifactKind;
use crate::model::{ColumnModel, TableModel};

/// Returns true when `kind` should be generated for `table`.
pub fn applies(kind: ArtifactKind, table: &TableModel) -> bool {
    use ArtifactKind::*;

    match kind {
        Insert | InsertSelective | ProviderInsertSelective => insert(table),
        InsertMultiple => multi_row_insert(table),
        BasicInsert => basic_insert(table),
        BasicInsertMultiple => basic_multi_row_insert(table),
        DeleteByPrimaryKey => delete_by_primary_key(table),
        SelectByPrimaryKey => select_by_primary_key(table),
        UpdateByPrimaryKey | UpdateByPrimaryKeySelective | ProviderUpdateByPrimaryKeySelective => {
            update_by_primary_key(table)
        }
        UpdateByPrimaryKeyWithoutBlobs => update_by_primary_key_without_blobs(table),
        UpdateByPrimaryKeyWithBlobs => update_by_primary_key_with_blobs(table),
        CountByExample | ProviderCountByExample => count_by_example(table),
        DeleteByExample | ProviderDeleteByExample => delete_by_example(table),
        SelectByExample | ProviderSelectByExample => select_by_example(table),
        SelectByExampleWithBlobs | ProviderSelectByExampleWithBlobs => {
            select_by_example_with_blobs(table)
        }
        UpdateByExample | UpdateByExampleSelective | ProviderUpdateByExample
        | ProviderUpdateByExampleSelective => update_by_example(table),
        UpdateByExampleWithBlobs | ProviderUpdateByExampleWithBlobs => {
            update_by_example_with_blobs(table)
        }
        ExampleWhereClause => example_where_clause(table),
        UpdateByExampleWhereClause => update_by_example_where_clause(table),
        UpdateAllColumns | UpdateSelectiveColumns => column_update_helpers(table),
        ResultMapWithBlobs | BlobColumnList => table.has_blob_columns(),
        BasicSelectMany | BasicSelectOne | GeneralCount | GeneralDelete | GeneralSelect
        | GeneralSelectDistinct | GeneralSelectOne | GeneralUpdate | SelectList | ResultMap
        | BaseColumnList | SupportTable | SupportColumn | ProviderApplyWhere => true,
    }
}

/// Insert and insert-selective: the insert flag.
pub fn insert(table: &TableModel) -> bool {
    table.rules().insert
}

/// Multi-row insert needs the insert and multi-row flags, and generated keys
/// (if any) must be retrievable for a batch.
pub fn multi_row_insert(table: &TableModel) -> bool {
    insert(table)
        && table.rules().multi_row_insert
        && table.generated_key().map_or(true, |key| key.supports_batch())
}

/// The low-level insert used when the database hands back a key.
pub fn basic_insert(table: &TableModel) -> bool {
    insert(table) && table.generated_key().is_some()
}

pub fn basic_multi_row_insert(table: &TableModel) -> bool {
    multi_row_insert(table) && table.generated_key().is_some()
}

pub fn delete_by_primary_key(table: &TableModel) -> bool {
    table.has_primary_key() && table.rules().delete_by_primary_key
}

pub fn select_by_primary_key(table: &TableModel) -> bool {
    table.has_primary_key() && !table.columns().is_empty() && table.rules().select_by_primary_key
}

/// Update-by-key needs something to set besides the key. Columns the
/// database fills in never appear in a SET clause.
pub fn update_by_primary_key(table: &TableModel) -> bool {
    table.has_primary_key()
        && has_settable(table.non_primary_key_columns())
        && table.rules().update_by_primary_key
}

/// The markup variant that sets only non-BLOB columns.
pub fn update_by_primary_key_without_blobs(table: &TableModel) -> bool {
    update_by_primary_key(table) && has_settable(table.non_primary_key_base_columns())
}

fn has_settable(columns: Vec<&ColumnModel>) -> bool {
    columns.iter().any(|c| !c.is_database_generated())
}

pub fn update_by_primary_key_with_blobs(table: &TableModel) -> bool {
    update_by_primary_key(table) && table.has_blob_columns()
}

pub fn count_by_example(table: &TableModel) -> bool {
    table.rules().count_by_example
}

pub fn delete_by_example(table: &TableModel) -> bool {
    table.rules().delete_by_example
}

pub fn select_by_example(table: &TableModel) -> bool {
    table.rules().select_by_example
}

pub fn select_by_example_with_blobs(table: &TableModel) -> bool {
    select_by_example(table) && table.has_blob_columns()
}

pub fn update_by_example(table: &TableModel) -> bool {
    table.rules().update_by_example
}

pub fn update_by_example_with_blobs(table: &TableModel) -> bool {
    update_by_example(table) && table.has_blob_columns()
}

/// The shared example where clause serves select, delete and count by example.
pub fn example_where_clause(table: &TableModel) -> bool {
    select_by_example(table) || delete_by_example(table) || count_by_example(table)
}

pub fn update_by_example_where_clause(table: &TableModel) -> bool {
    update_by_example(table)
}

/// Update-all-columns and update-selective-columns helpers.
pub fn column_update_helpers(table: &TableModel) -> bool {
    update_by_example(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GeneratedKey, TableRules};

    fn orders() -> crate::model::TableModelBuilder {
        TableModel::builder("orders", "Order")
            .column(ColumnModel::new("id", "id", "INTEGER").identity())
            .column(ColumnModel::new("order_date", "orderDate", "DATE"))
    }

    #[test]
    fn test_no_primary_key_blocks_by_key_kinds() {
        let table = orders().build();

        assert!(!applies(ArtifactKind::DeleteByPrimaryKey, &table));
        assert!(!applies(ArtifactKind::SelectByPrimaryKey, &table));
        assert!(!applies(ArtifactKind::UpdateByPrimaryKey, &table));
        assert!(!applies(ArtifactKind::UpdateByPrimaryKeySelective, &table));
        assert!(applies(ArtifactKind::GeneralSelect, &table));
    }

    #[test]
    fn test_update_by_key_needs_non_key_columns() {
        let table = TableModel::builder("tags", "Tag")
            .column(ColumnModel::new("id", "id", "INTEGER"))
            .primary_key("id")
            .build();

        assert!(applies(ArtifactKind::DeleteByPrimaryKey, &table));
        assert!(!applies(ArtifactKind::UpdateByPrimaryKey, &table));
    }

    #[test]
    fn test_multi_row_insert_needs_batch_keys() {
        let jdbc = orders().generated_key(GeneratedKey::jdbc_standard("id")).build();
        let statement = orders()
            .generated_key(GeneratedKey::statement("id", "SELECT LAST_INSERT_ID()"))
            .build();
        let keyless = orders().build();

        assert!(multi_row_insert(&jdbc));
        assert!(basic_multi_row_insert(&jdbc));
        assert!(!multi_row_insert(&statement));
        assert!(basic_insert(&statement));
        assert!(multi_row_insert(&keyless));
        assert!(!basic_insert(&keyless));
    }

    #[test]
    fn test_flags_disable_kinds() {
        let table = orders()
            .primary_key("id")
            .rules(TableRules {
                insert: false,
                select_by_example: false,
                delete_by_example: false,
                ..TableRules::default()
            })
            .build();

        assert!(!applies(ArtifactKind::Insert, &table));
        assert!(!applies(ArtifactKind::InsertMultiple, &table));
        assert!(!applies(ArtifactKind::SelectByExample, &table));
        assert!(applies(ArtifactKind::ExampleWhereClause, &table));
        assert!(applies(ArtifactKind::CountByExample, &table));
    }

    #[test]
    fn test_blob_kinds_need_blob_columns() {
        let plain = orders().primary_key("id").build();
        let with_notes = orders()
            .primary_key("id")
            .column(ColumnModel::new("notes", "notes", "CLOB"))
            .build();

        assert!(!applies(ArtifactKind::ResultMapWithBlobs, &plain));
        assert!(applies(ArtifactKind::ResultMapWithBlobs, &with_notes));
        assert!(applies(ArtifactKind::UpdateByPrimaryKeyWithBlobs, &with_notes));
        assert!(update_by_primary_key_without_blobs(&with_notes));
    }

    #[test]
    fn test_markup_update_by_key_needs_base_columns() {
        let docs = TableModel::builder("docs", "Doc")
            .column(ColumnModel::new("id", "id", "INTEGER"))
            .column(ColumnModel::new("body", "body", "CLOB"))
            .primary_key("id")
            .build();

        assert!(applies(ArtifactKind::UpdateByPrimaryKey, &docs));
        assert!(applies(ArtifactKind::UpdateByPrimaryKeyWithBlobs, &docs));
        assert!(!applies(ArtifactKind::UpdateByPrimaryKeyWithoutBlobs, &docs));
    }

    #[test]
    fn test_generated_columns_are_not_settable() {
        let versioned = TableModel::builder("t", "T")
            .column(ColumnModel::new("id", "id", "INTEGER"))
            .column(ColumnModel::new("ver", "ver", "INTEGER").generated_always())
            .primary_key("id")
            .build();

        assert!(!applies(ArtifactKind::UpdateByPrimaryKey, &versioned));
        assert!(!applies(ArtifactKind::UpdateByPrimaryKeySelective, &versioned));
        assert!(!applies(ArtifactKind::UpdateByPrimaryKeyWithoutBlobs, &versioned));
        assert!(!applies(ArtifactKind::ProviderUpdateByPrimaryKeySelective, &versioned));
        assert!(applies(ArtifactKind::DeleteByPrimaryKey, &versioned));
    }
}
