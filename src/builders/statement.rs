use crate::clauses::WhereClause;

/// Entry point for building a SELECT statement.
/// Must call `.columns()` to proceed.
pub struct Select;

impl Select {
    pub fn new() -> Self {
        Self
    }

    /// Specify the select list, one entry per line.
    pub fn columns<I, S>(self, columns: I) -> SelectWithColumns
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SelectWithColumns {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for Select {
    fn default() -> Self {
        Self::new()
    }
}

/// SELECT builder after columns have been specified.
/// Must call `.from()` to proceed.
pub struct SelectWithColumns {
    columns: Vec<String>,
}

impl SelectWithColumns {
    /// Specify the table to select from.
    pub fn from(self, table: impl Into<String>) -> SelectWithTable {
        SelectWithTable {
            columns: self.columns,
            table: table.into(),
            where_clause: None,
        }
    }
}

/// SELECT builder after the table has been specified.
pub struct SelectWithTable {
    columns: Vec<String>,
    table: String,
    where_clause: Option<WhereClause>,
}

impl SelectWithTable {
    /// Add a WHERE clause to the statement.
    pub fn where_(mut self, clause: WhereClause) -> Self {
        self.where_clause = Some(clause);
        self
    }

    /// Build the statement text, one line per clause.
    pub fn build_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.columns.len() + 4);
        lines.push("select".to_string());
        lines.extend(self.columns.iter().cloned());
        lines.push(format!("from {}", self.table));
        if let Some(ref where_clause) = self.where_clause {
            lines.extend(where_clause.build_lines());
        }
        lines
    }
}

/// Entry point for building a DELETE statement.
pub struct Delete {
    table: String,
    where_clause: Option<WhereClause>,
}

impl Delete {
    pub fn from_table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            where_clause: None,
        }
    }

    pub fn where_(mut self, clause: WhereClause) -> Self {
        self.where_clause = Some(clause);
        self
    }

    pub fn build_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("delete from {}", self.table)];
        if let Some(ref where_clause) = self.where_clause {
            lines.extend(where_clause.build_lines());
        }
        lines
    }
}

/// Entry point for building an UPDATE statement.
/// Must call `.set()` to proceed.
pub struct Update {
    table: String,
}

impl Update {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }

    /// Specify the assignment lines, already separated.
    pub fn set(self, assignments: Vec<String>) -> UpdateWithSet {
        UpdateWithSet {
            table: self.table,
            assignments,
            where_clause: None,
        }
    }
}

/// UPDATE builder after the assignments have been specified.
pub struct UpdateWithSet {
    table: String,
    assignments: Vec<String>,
    where_clause: Option<WhereClause>,
}

impl UpdateWithSet {
    pub fn where_(mut self, clause: WhereClause) -> Self {
        self.where_clause = Some(clause);
        self
    }

    pub fn build_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("update {}", self.table)];
        for (i, assignment) in self.assignments.iter().enumerate() {
            if i == 0 {
                lines.push(format!("set {}", assignment));
            } else {
                lines.push(format!("  {}", assignment));
            }
        }
        if let Some(ref where_clause) = self.where_clause {
            lines.extend(where_clause.build_lines());
        }
        lines
    }
}

/// Entry point for building an INSERT statement.
/// Must call `.values()` to proceed.
pub struct Insert {
    table: String,
}

impl Insert {
    pub fn into_table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }

    /// Specify `(column, value)` pairs in column order.
    pub fn values(self, values: Vec<(String, String)>) -> InsertWithValues {
        InsertWithValues {
            table: self.table,
            values,
        }
    }
}

/// INSERT builder after the values have been specified.
pub struct InsertWithValues {
    table: String,
    values: Vec<(String, String)>,
}

impl InsertWithValues {
    pub fn build_lines(&self) -> Vec<String> {
        let columns: Vec<&str> = self.values.iter().map(|(c, _)| c.as_str()).collect();
        let values: Vec<&str> = self.values.iter().map(|(_, v)| v.as_str()).collect();
        vec![
            format!("insert into {} ({})", self.table, columns.join(", ")),
            format!("values ({})", values.join(", ")),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clauses::Placeholder;
    use crate::model::{ColumnModel, ColumnRef};

    fn id_clause() -> WhereClause {
        let id = ColumnModel::new("id", "id", "INTEGER");
        WhereClause::eq(ColumnRef::from_column(&id), Placeholder::for_column(&id, "id"))
    }

    #[test]
    fn test_build_simple_select() {
        let builder = Select::new().columns(["id, name"]).from("users");

        assert_eq!(builder.build_lines(), vec!["select", "id, name", "from users"]);
    }

    #[test]
    fn test_build_select_with_where() {
        let builder = Select::new()
            .columns(["id, name"])
            .from("users")
            .where_(id_clause());

        assert_eq!(
            builder.build_lines(),
            vec!["select", "id, name", "from users", "where id = #{id,jdbcType=INTEGER}"]
        );
    }

    #[test]
    fn test_build_delete_with_where() {
        let builder = Delete::from_table("users").where_(id_clause());

        assert_eq!(
            builder.build_lines(),
            vec!["delete from users", "where id = #{id,jdbcType=INTEGER}"]
        );
    }

    #[test]
    fn test_build_update() {
        let builder = Update::table("users")
            .set(vec![
                "name = #{name,jdbcType=VARCHAR},".to_string(),
                "email = #{email,jdbcType=VARCHAR}".to_string(),
            ])
            .where_(id_clause());

        assert_eq!(
            builder.build_lines(),
            vec![
                "update users",
                "set name = #{name,jdbcType=VARCHAR},",
                "  email = #{email,jdbcType=VARCHAR}",
                "where id = #{id,jdbcType=INTEGER}",
            ]
        );
    }

    #[test]
    fn test_build_insert() {
        let builder = Insert::into_table("users").values(vec![
            ("id".to_string(), "#{id,jdbcType=INTEGER}".to_string()),
            ("name".to_string(), "#{name,jdbcType=VARCHAR}".to_string()),
        ]);

        assert_eq!(
            builder.build_lines(),
            vec![
                "insert into users (id, name)",
                "values (#{id,jdbcType=INTEGER}, #{name,jdbcType=VARCHAR})",
            ]
        );
    }
}
