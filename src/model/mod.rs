mod column;
mod table;

pub use column::{ColumnModel, ColumnRef};
pub use table::{
    FullyQualifiedTable, GeneratedKey, KeyStrategy, TableModel, TableModelBuilder, TableRules,
};
