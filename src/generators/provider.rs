use super::{ArtifactGenerator, ArtifactKind};
use crate::builders::ArtifactBuilder;
use crate::context::GenerationContext;
use crate::error::{GenError, Result};
use crate::fragments::{FragmentGenerator, WriteInclusion};
use crate::model::ColumnModel;
use crate::types::{CandidateArtifact, Parameter};

const SQL: &str = "org.apache.ibatis.jdbc.SQL";
const MAP: &str = "java.util.Map";
const LIST: &str = "java.util.List";

/// `sql.CALL("...")` lines for each column, guarded by a null check on the
/// record where the column is written only when present.
fn guarded_calls(
    fragments: &FragmentGenerator<'_>,
    columns: &[&ColumnModel],
    selective: bool,
    call: impl Fn(&ColumnModel) -> String,
) -> Vec<String> {
    let names = fragments.names();
    let mut lines = Vec::new();
    for column in columns {
        match fragments.write_inclusion(column, selective) {
            WriteInclusion::Excluded => {}
            WriteInclusion::Always => {
                lines.push(call(*column));
                lines.push(String::new());
            }
            WriteInclusion::WhenPresent => {
                lines.push(format!("if (row.{}() != null) {{", names.getter(column)));
                lines.push(format!("    {}", call(*column)));
                lines.push("}".to_string());
                lines.push(String::new());
            }
        }
    }
    lines
}

fn apply_where_template() -> Vec<String> {
    [
        "if (example == null) {",
        "    return;",
        "}",
        "",
        "String parmPhrase1;",
        "String parmPhrase2;",
        "String parmPhrase3;",
        "if (includeExamplePhrase) {",
        "    parmPhrase1 = \"%s #{example.oredCriteria[%d].allCriteria[%d].value}\";",
        "    parmPhrase2 = \"%s #{example.oredCriteria[%d].allCriteria[%d].value} and #{example.oredCriteria[%d].criteria[%d].secondValue}\";",
        "    parmPhrase3 = \"#{example.oredCriteria[%d].allCriteria[%d].value[%d]}\";",
        "} else {",
        "    parmPhrase1 = \"%s #{oredCriteria[%d].allCriteria[%d].value}\";",
        "    parmPhrase2 = \"%s #{oredCriteria[%d].allCriteria[%d].value} and #{oredCriteria[%d].criteria[%d].secondValue}\";",
        "    parmPhrase3 = \"#{oredCriteria[%d].allCriteria[%d].value[%d]}\";",
        "}",
        "",
        "StringBuilder sb = new StringBuilder();",
        "List<Criteria> oredCriteria = example.getOredCriteria();",
        "boolean firstCriteria = true;",
        "for (int i = 0; i < oredCriteria.size(); i++) {",
        "    Criteria criteria = oredCriteria.get(i);",
        "    if (criteria.isValid()) {",
        "        if (firstCriteria) {",
        "            firstCriteria = false;",
        "        } else {",
        "            sb.append(\" or \");",
        "        }",
        "",
        "        sb.append('(');",
        "        List<Criterion> criterions = criteria.getAllCriteria();",
        "        boolean firstCriterion = true;",
        "        for (int j = 0; j < criterions.size(); j++) {",
        "            Criterion criterion = criterions.get(j);",
        "            if (firstCriterion) {",
        "                firstCriterion = false;",
        "            } else {",
        "                sb.append(\" and \");",
        "            }",
        "",
        "            if (criterion.isNoValue()) {",
        "                sb.append(criterion.getCondition());",
        "            } else if (criterion.isSingleValue()) {",
        "                sb.append(String.format(parmPhrase1, criterion.getCondition(), i, j));",
        "            } else if (criterion.isBetweenValue()) {",
        "                sb.append(String.format(parmPhrase2, criterion.getCondition(), i, j, i, j));",
        "            } else if (criterion.isListValue()) {",
        "                sb.append(criterion.getCondition());",
        "                sb.append(\" (\");",
        "                List<?> listItems = (List<?>) criterion.getValue();",
        "                boolean comma = false;",
        "                for (int k = 0; k < listItems.size(); k++) {",
        "                    if (comma) {",
        "                        sb.append(\", \");",
        "                    } else {",
        "                        comma = true;",
        "                    }",
        "                    sb.append(String.format(parmPhrase3, i, j, k));",
        "                }",
        "                sb.append(')');",
        "            }",
        "        }",
        "        sb.append(')');",
        "    }",
        "}",
        "",
        "if (sb.length() > 0) {",
        "    sql.WHERE(sb.toString());",
        "}",
    ]
    .iter()
    .map(|line| line.to_string())
    .collect()
}

pub(super) fn produce(
    generator: &ArtifactGenerator<'_>,
    ctx: &GenerationContext<'_>,
) -> Result<Option<CandidateArtifact>> {
    let kind = generator.kind();
    let names = ctx.names();
    let table = ctx.table();
    let table_name = table.table().qualified_name();
    let record = names.record();
    let example = names.example();

    let method = |name: &str| {
        ArtifactBuilder::operation(kind, name)
            .modifier("public")
            .returns("String")
            .import(SQL)
            .line("SQL sql = new SQL();")
    };
    let by_example = |name: &str| {
        method(name)
            .parameter(Parameter::new("example", example.short_name()))
            .type_import(example)
    };
    let map_parameter = Parameter::new("parameter", "Map<String, Object>");
    let unpack_row = format!(
        "{} row = ({}) parameter.get(\"row\");",
        record.short_name(),
        record.short_name()
    );
    let unpack_example = format!(
        "{} example = ({}) parameter.get(\"example\");",
        example.short_name(),
        example.short_name()
    );

    let builder = match kind {
        ArtifactKind::ProviderCountByExample => by_example("countByExample")
            .line(format!("sql.SELECT(\"count(*)\").FROM(\"{}\");", table_name))
            .line("applyWhere(sql, example, false);")
            .line("return sql.toString();"),
        ArtifactKind::ProviderDeleteByExample => by_example("deleteByExample")
            .line(format!("sql.DELETE_FROM(\"{}\");", table_name))
            .line("applyWhere(sql, example, false);")
            .line("return sql.toString();"),
        ArtifactKind::ProviderInsertSelective => {
            let fragments = generator.fragments()?;
            let columns: Vec<&ColumnModel> = table.columns().iter().collect();
            let values = guarded_calls(&fragments, &columns, true, |c| {
                format!(
                    "sql.VALUES(\"{}\", \"{}\");",
                    c.name,
                    fragments.parameter_clause(c, None)
                )
            });
            method("insertSelective")
                .parameter(Parameter::new("row", record.short_name()))
                .type_import(record)
                .line(format!("sql.INSERT_INTO(\"{}\");", table_name))
                .line("")
                .lines(values)
                .line("return sql.toString();")
        }
        ArtifactKind::ProviderSelectByExample | ArtifactKind::ProviderSelectByExampleWithBlobs => {
            let (name, columns): (&str, Vec<&ColumnModel>) =
                if kind == ArtifactKind::ProviderSelectByExampleWithBlobs {
                    ("selectByExampleWithBLOBs", table.columns().iter().collect())
                } else {
                    ("selectByExample", table.base_columns())
                };
            let mut builder = by_example(name);
            if let Some((first, rest)) = columns.split_first() {
                builder = builder
                    .line("if (example != null && example.isDistinct()) {")
                    .line(format!("    sql.SELECT_DISTINCT(\"{}\");", first.name))
                    .line("} else {")
                    .line(format!("    sql.SELECT(\"{}\");", first.name))
                    .line("}");
                for column in rest {
                    builder = builder.line(format!("sql.SELECT(\"{}\");", column.name));
                }
            }
            builder
                .line(format!("sql.FROM(\"{}\");", table_name))
                .line("applyWhere(sql, example, false);")
                .line("")
                .line("if (example != null && example.getOrderByClause() != null) {")
                .line("    sql.ORDER_BY(example.getOrderByClause());")
                .line("}")
                .line("")
                .line("return sql.toString();")
        }
        ArtifactKind::ProviderUpdateByExampleSelective => {
            let fragments = generator.fragments()?;
            let columns = fragments.example_update_columns(true);
            let sets = guarded_calls(&fragments, &columns, true, |c| {
                format!(
                    "sql.SET(\"{} = {}\");",
                    c.name,
                    fragments.parameter_clause(c, Some("row."))
                )
            });
            ArtifactBuilder::operation(kind, "updateByExampleSelective")
                .modifier("public")
                .parameter(map_parameter)
                .returns("String")
                .imports([SQL, MAP])
                .type_import(record)
                .type_import(example)
                .line(unpack_row)
                .line(unpack_example)
                .line("")
                .line("SQL sql = new SQL();")
                .line(format!("sql.UPDATE(\"{}\");", table_name))
                .line("")
                .lines(sets)
                .line("applyWhere(sql, example, true);")
                .line("return sql.toString();")
        }
        ArtifactKind::ProviderUpdateByExample | ArtifactKind::ProviderUpdateByExampleWithBlobs => {
            let fragments = generator.fragments()?;
            let with_blobs = kind == ArtifactKind::ProviderUpdateByExampleWithBlobs;
            let name = if with_blobs {
                "updateByExampleWithBLOBs"
            } else {
                "updateByExample"
            };
            let columns = fragments.example_update_columns(with_blobs);
            let mut builder = ArtifactBuilder::operation(kind, name)
                .modifier("public")
                .parameter(map_parameter)
                .returns("String")
                .imports([SQL, MAP])
                .type_import(example)
                .line("SQL sql = new SQL();")
                .line(format!("sql.UPDATE(\"{}\");", table_name))
                .line("");
            for column in &columns {
                builder = builder.line(format!(
                    "sql.SET(\"{} = {}\");",
                    column.name,
                    fragments.parameter_clause(column, Some("row."))
                ));
            }
            builder
                .line("")
                .line(unpack_example)
                .line("applyWhere(sql, example, true);")
                .line("return sql.toString();")
        }
        ArtifactKind::ProviderUpdateByPrimaryKeySelective => {
            let fragments = generator.fragments()?;
            let predicate = match fragments.primary_key_predicate(None) {
                Some(predicate) => predicate,
                None => return Ok(None),
            };
            let columns = fragments.update_columns(true);
            let sets = guarded_calls(&fragments, &columns, true, |c| {
                format!(
                    "sql.SET(\"{} = {}\");",
                    c.name,
                    fragments.parameter_clause(c, None)
                )
            });
            let mut builder = method("updateByPrimaryKeySelective")
                .parameter(Parameter::new("row", record.short_name()))
                .type_import(record)
                .line(format!("sql.UPDATE(\"{}\");", table_name))
                .line("")
                .lines(sets);
            for condition in predicate.conditions() {
                builder = builder.line(format!("sql.WHERE(\"{}\");", condition));
            }
            builder.line("").line("return sql.toString();")
        }
        ArtifactKind::ProviderApplyWhere => ArtifactBuilder::operation(kind, "applyWhere")
            .modifier("protected")
            .parameter(Parameter::new("sql", "SQL"))
            .parameter(Parameter::new("example", example.short_name()))
            .parameter(Parameter::new("includeExamplePhrase", "boolean"))
            .returns("void")
            .imports([SQL, LIST])
            .type_import(example)
            .import(format!("{}.Criteria", example.fully_qualified()))
            .import(format!("{}.Criterion", example.fully_qualified()))
            .lines(apply_where_template()),
        _ => {
            return Err(GenError::UnsupportedArtifact {
                kind,
                dialect: ctx.profile().dialect,
            })
        }
    };

    Ok(Some(builder.build()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Dialect, NamingProfile};
    use crate::model::TableModel;
    use crate::plugins::PluginAggregator;
    use crate::traits::SilentProgress;

    fn orders() -> TableModel {
        TableModel::builder("orders", "Order")
            .packages("com.example.model", "com.example.mapper")
            .column(ColumnModel::new("id", "id", "INTEGER").identity())
            .column(ColumnModel::new("order_date", "orderDate", "DATE"))
            .column(ColumnModel::new("ticket", "ticket", "BIGINT").sequence())
            .primary_key("id")
            .build()
    }

    fn produce_kind(table: &TableModel, kind: ArtifactKind) -> Option<CandidateArtifact> {
        let profile = NamingProfile::new(Dialect::AnnotatedMapper);
        let plugins = PluginAggregator::new();
        let ctx = GenerationContext::new(table, &profile, &plugins, &SilentProgress);
        let builder = ArtifactGenerator::builder(kind);
        let builder = if kind.requires_fragments() {
            builder.with_fragments(ctx.fragments())
        } else {
            builder
        };
        builder
            .build()
            .expect("generator")
            .produce(&ctx)
            .expect("produce")
    }

    #[test]
    fn test_insert_selective_guards_optional_columns() {
        let artifact =
            produce_kind(&orders(), ArtifactKind::ProviderInsertSelective).expect("insert");
        let body = artifact.body();

        assert!(body.contains(&"if (row.getOrderDate() != null) {".to_string()));
        assert!(body.contains(
            &"    sql.VALUES(\"order_date\", \"#{orderDate,jdbcType=DATE}\");".to_string()
        ));
        assert!(body
            .contains(&"sql.VALUES(\"ticket\", \"#{ticket,jdbcType=BIGINT}\");".to_string()));
        assert!(!body.iter().any(|line| line.contains("\"id\"")));
    }

    #[test]
    fn test_update_by_primary_key_selective_ends_with_key_predicate() {
        let artifact = produce_kind(&orders(), ArtifactKind::ProviderUpdateByPrimaryKeySelective)
            .expect("update");

        assert!(artifact
            .body()
            .contains(&"sql.WHERE(\"id = #{id,jdbcType=INTEGER}\");".to_string()));
        assert_eq!(artifact.signature().returns.as_deref(), Some("String"));
    }

    #[test]
    fn test_apply_where_needs_no_fragments() {
        let artifact = produce_kind(&orders(), ArtifactKind::ProviderApplyWhere).expect("apply");

        assert_eq!(artifact.signature().name, "applyWhere");
        assert!(artifact
            .references()
            .has_import("com.example.model.OrderExample.Criteria"));
    }

    #[test]
    fn test_select_by_example_opens_with_distinct_switch() {
        let artifact =
            produce_kind(&orders(), ArtifactKind::ProviderSelectByExample).expect("select");

        assert_eq!(artifact.body()[1], "if (example != null && example.isDistinct()) {");
        assert_eq!(artifact.body()[2], "    sql.SELECT_DISTINCT(\"id\");");
        assert!(artifact.body().contains(&"sql.SELECT(\"ticket\");".to_string()));
    }
}
