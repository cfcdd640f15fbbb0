use serde::{Deserialize, Serialize};

/// Represents a column's JDBC type in a dialect-agnostic way.
/// Dialects map these to their own host-language types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JdbcType {
    BigInt,
    Binary,
    Bit,
    Blob,
    Boolean,
    Char,
    Clob,
    Date,
    Decimal,
    Double,
    Float,
    Integer,
    LongVarBinary,
    LongVarChar,
    NClob,
    Numeric,
    Real,
    SmallInt,
    Time,
    Timestamp,
    TinyInt,
    VarBinary,
    VarChar,
    Other(String),
}

impl JdbcType {
    /// Returns the JDBC type name as it appears in mapping attributes.
    pub fn name(&self) -> &str {
        match self {
            JdbcType::BigInt => "BIGINT",
            JdbcType::Binary => "BINARY",
            JdbcType::Bit => "BIT",
            JdbcType::Blob => "BLOB",
            JdbcType::Boolean => "BOOLEAN",
            JdbcType::Char => "CHAR",
            JdbcType::Clob => "CLOB",
            JdbcType::Date => "DATE",
            JdbcType::Decimal => "DECIMAL",
            JdbcType::Double => "DOUBLE",
            JdbcType::Float => "FLOAT",
            JdbcType::Integer => "INTEGER",
            JdbcType::LongVarBinary => "LONGVARBINARY",
            JdbcType::LongVarChar => "LONGVARCHAR",
            JdbcType::NClob => "NCLOB",
            JdbcType::Numeric => "NUMERIC",
            JdbcType::Real => "REAL",
            JdbcType::SmallInt => "SMALLINT",
            JdbcType::Time => "TIME",
            JdbcType::Timestamp => "TIMESTAMP",
            JdbcType::TinyInt => "TINYINT",
            JdbcType::VarBinary => "VARBINARY",
            JdbcType::VarChar => "VARCHAR",
            JdbcType::Other(name) => name,
        }
    }

    /// Large-object types are kept out of the base column list.
    pub fn is_blob(&self) -> bool {
        matches!(
            self,
            JdbcType::Binary
                | JdbcType::Blob
                | JdbcType::Clob
                | JdbcType::LongVarBinary
                | JdbcType::LongVarChar
                | JdbcType::NClob
                | JdbcType::VarBinary
        )
    }

    /// Default fully qualified Java type for values of this column type.
    pub fn java_type(&self) -> &'static str {
        match self {
            JdbcType::BigInt => "java.lang.Long",
            JdbcType::Binary | JdbcType::Blob | JdbcType::LongVarBinary | JdbcType::VarBinary => {
                "byte[]"
            }
            JdbcType::Bit | JdbcType::Boolean => "java.lang.Boolean",
            JdbcType::Char
            | JdbcType::Clob
            | JdbcType::LongVarChar
            | JdbcType::NClob
            | JdbcType::VarChar => "java.lang.String",
            JdbcType::Date | JdbcType::Time | JdbcType::Timestamp => "java.util.Date",
            JdbcType::Decimal | JdbcType::Numeric => "java.math.BigDecimal",
            JdbcType::Double | JdbcType::Float => "java.lang.Double",
            JdbcType::Integer => "java.lang.Integer",
            JdbcType::Real => "java.lang.Float",
            JdbcType::SmallInt => "java.lang.Short",
            JdbcType::TinyInt => "java.lang.Byte",
            JdbcType::Other(_) => "java.lang.Object",
        }
    }

    /// Default fully qualified Kotlin type for values of this column type.
    pub fn kotlin_type(&self) -> &'static str {
        match self {
            JdbcType::BigInt => "kotlin.Long",
            JdbcType::Binary | JdbcType::Blob | JdbcType::LongVarBinary | JdbcType::VarBinary => {
                "kotlin.ByteArray"
            }
            JdbcType::Bit | JdbcType::Boolean => "kotlin.Boolean",
            JdbcType::Char
            | JdbcType::Clob
            | JdbcType::LongVarChar
            | JdbcType::NClob
            | JdbcType::VarChar => "kotlin.String",
            JdbcType::Date | JdbcType::Time | JdbcType::Timestamp => "java.util.Date",
            JdbcType::Decimal | JdbcType::Numeric => "java.math.BigDecimal",
            JdbcType::Double | JdbcType::Float => "kotlin.Double",
            JdbcType::Integer => "kotlin.Int",
            JdbcType::Real => "kotlin.Float",
            JdbcType::SmallInt => "kotlin.Short",
            JdbcType::TinyInt => "kotlin.Byte",
            JdbcType::Other(_) => "kotlin.Any",
        }
    }
}

impl From<&str> for JdbcType {
    fn from(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "BIGINT" => JdbcType::BigInt,
            "BINARY" => JdbcType::Binary,
            "BIT" => JdbcType::Bit,
            "BLOB" => JdbcType::Blob,
            "BOOLEAN" => JdbcType::Boolean,
            "CHAR" => JdbcType::Char,
            "CLOB" => JdbcType::Clob,
            "DATE" => JdbcType::Date,
            "DECIMAL" => JdbcType::Decimal,
            "DOUBLE" => JdbcType::Double,
            "FLOAT" => JdbcType::Float,
            "INTEGER" | "INT" => JdbcType::Integer,
            "LONGVARBINARY" => JdbcType::LongVarBinary,
            "LONGVARCHAR" => JdbcType::LongVarChar,
            "NCLOB" => JdbcType::NClob,
            "NUMERIC" => JdbcType::Numeric,
            "REAL" => JdbcType::Real,
            "SMALLINT" => JdbcType::SmallInt,
            "TIME" => JdbcType::Time,
            "TIMESTAMP" => JdbcType::Timestamp,
            "TINYINT" => JdbcType::TinyInt,
            "VARBINARY" => JdbcType::VarBinary,
            "VARCHAR" => JdbcType::VarChar,
            _ => JdbcType::Other(value.to_string()),
        }
    }
}

impl From<String> for JdbcType {
    fn from(value: String) -> Self {
        JdbcType::from(value.as_str())
    }
}

impl From<JdbcType> for String {
    fn from(value: JdbcType) -> Self {
        value.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(JdbcType::from("varchar"), JdbcType::VarChar);
        assert_eq!(JdbcType::from("INT"), JdbcType::Integer);
        assert_eq!(
            JdbcType::from("GEOMETRY"),
            JdbcType::Other("GEOMETRY".to_string())
        );
    }

    #[test]
    fn test_blob_types() {
        assert!(JdbcType::LongVarChar.is_blob());
        assert!(JdbcType::Blob.is_blob());
        assert!(!JdbcType::VarChar.is_blob());
        assert_eq!(JdbcType::Blob.java_type(), "byte[]");
    }
}
