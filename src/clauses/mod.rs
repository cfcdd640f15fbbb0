mod where_clause;

pub use where_clause::{Placeholder, WhereClause};
