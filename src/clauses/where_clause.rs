use crate::model::{ColumnModel, ColumnRef};

/// A MyBatis parameter expression, e.g. `#{row.orderDate,jdbcType=DATE}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub property: String,
    pub jdbc_type: String,
    pub prefix: Option<String>,
}

impl Placeholder {
    pub fn for_column(column: &ColumnModel, property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            jdbc_type: column.jdbc_type.name().to_string(),
            prefix: None,
        }
    }

    /// Prefixes the property path, e.g. `row.` for record parameters.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn render(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("#{{{}{},jdbcType={}}}", prefix, self.property, self.jdbc_type),
            None => format!("#{{{},jdbcType={}}}", self.property, self.jdbc_type),
        }
    }
}

/// Represents a WHERE clause condition over bound parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhereClause {
    /// column = #{param}
    Eq(ColumnRef, Placeholder),
    /// clause and clause
    And(Box<WhereClause>, Box<WhereClause>),
}

impl WhereClause {
    /// Creates an equality condition: column = #{param}
    pub fn eq(column: ColumnRef, placeholder: Placeholder) -> Self {
        WhereClause::Eq(column, placeholder)
    }

    /// Combines this clause with another using AND
    pub fn and(self, other: WhereClause) -> Self {
        WhereClause::And(Box::new(self), Box::new(other))
    }

    /// Folds conditions into one clause; `None` when there are none.
    pub fn all(conditions: impl IntoIterator<Item = WhereClause>) -> Option<Self> {
        conditions.into_iter().reduce(WhereClause::and)
    }

    /// The flattened equality conditions, left to right.
    pub fn conditions(&self) -> Vec<String> {
        match self {
            WhereClause::Eq(col, placeholder) => {
                vec![format!("{} = {}", col.qualified_name(), placeholder.render())]
            }
            WhereClause::And(left, right) => {
                let mut conditions = left.conditions();
                conditions.extend(right.conditions());
                conditions
            }
        }
    }

    /// Builds the clause as statement lines: `where a = ...`, then `and b = ...`.
    pub fn build_lines(&self) -> Vec<String> {
        self.conditions()
            .into_iter()
            .enumerate()
            .map(|(i, condition)| {
                if i == 0 {
                    format!("where {}", condition)
                } else {
                    format!("  and {}", condition)
                }
            })
            .collect()
    }

    /// Builds the clause as a single SQL fragment.
    pub fn build_sql(&self) -> String {
        self.conditions().join(" and ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id_column() -> ColumnModel {
        ColumnModel::new("id", "id", "INTEGER")
    }

    fn region_column() -> ColumnModel {
        ColumnModel::new("region", "region", "VARCHAR")
    }

    #[test]
    fn test_eq_clause() {
        let col = id_column();
        let clause = WhereClause::eq(ColumnRef::from_column(&col), Placeholder::for_column(&col, "id"));

        assert_eq!(clause.build_sql(), "id = #{id,jdbcType=INTEGER}");
        assert_eq!(clause.build_lines(), vec!["where id = #{id,jdbcType=INTEGER}"]);
    }

    #[test]
    fn test_and_clause() {
        let id = id_column();
        let region = region_column();

        let clause = WhereClause::eq(ColumnRef::from_column(&id), Placeholder::for_column(&id, "id"))
            .and(WhereClause::eq(
                ColumnRef::from_column(&region),
                Placeholder::for_column(&region, "region").with_prefix("row."),
            ));

        assert_eq!(
            clause.build_sql(),
            "id = #{id,jdbcType=INTEGER} and region = #{row.region,jdbcType=VARCHAR}"
        );
        assert_eq!(
            clause.build_lines(),
            vec![
                "where id = #{id,jdbcType=INTEGER}",
                "  and region = #{row.region,jdbcType=VARCHAR}",
            ]
        );
    }

    #[test]
    fn test_all_of_nothing_is_none() {
        assert!(WhereClause::all(Vec::new()).is_none());
    }
}
