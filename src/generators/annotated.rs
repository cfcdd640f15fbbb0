use super::{ArtifactGenerator, ArtifactKind};
use crate::builders::{ArtifactBuilder, Delete, Insert, Select, Update};
use crate::context::GenerationContext;
use crate::error::{GenError, Result};
use crate::fragments::{FragmentGenerator, BASE_RESULT_MAP, BLOB_RESULT_MAP};
use crate::model::ColumnModel;
use crate::types::{CandidateArtifact, Fragment, Parameter};

const SELECT: &str = "org.apache.ibatis.annotations.Select";
const INSERT: &str = "org.apache.ibatis.annotations.Insert";
const UPDATE: &str = "org.apache.ibatis.annotations.Update";
const DELETE: &str = "org.apache.ibatis.annotations.Delete";
const SELECT_PROVIDER: &str = "org.apache.ibatis.annotations.SelectProvider";
const INSERT_PROVIDER: &str = "org.apache.ibatis.annotations.InsertProvider";
const UPDATE_PROVIDER: &str = "org.apache.ibatis.annotations.UpdateProvider";
const DELETE_PROVIDER: &str = "org.apache.ibatis.annotations.DeleteProvider";
const PARAM: &str = "org.apache.ibatis.annotations.Param";
const LIST: &str = "java.util.List";

/// Wraps statement lines in a quoted string array annotation, e.g.
/// `@Delete({ "delete from orders", "where id = ..." })`.
fn statement_annotation(annotation: &str, lines: Vec<String>) -> Vec<String> {
    let last = lines.len().saturating_sub(1);
    let mut annotations = vec![format!("@{}({{", annotation)];
    for (i, line) in lines.iter().enumerate() {
        let separator = if i < last { "," } else { "" };
        annotations.push(format!("    \"{}\"{}", line.replace('"', "\\\""), separator));
    }
    annotations.push("})".to_string());
    annotations
}

/// The key parameters of a by-key operation. Composite keys are named with
/// `@Param` so the statement can address each part.
fn key_parameters(fragments: &FragmentGenerator<'_>) -> Fragment {
    let keys = fragments.table().primary_key_columns();
    let composite = keys.len() > 1;
    let mut fragment = Fragment::new();
    if composite {
        fragment = fragment.with_import(PARAM);
    }
    for column in keys {
        let property = fragments.names().property(column);
        let host = fragments.host_type(column);
        let parameter = Parameter::new(property.clone(), host.short_name());
        let parameter = if composite {
            parameter.with_annotation(format!("@Param(\"{}\")", property))
        } else {
            parameter
        };
        fragment = fragment.with_type(&host).with_parameter(parameter);
    }
    fragment
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
    let provider = names.provider();

    let provided = |annotation: &str, method: &str| {
        format!(
            "@{}(type={}.class, method=\"{}\")",
            annotation,
            provider.short_name(),
            method
        )
    };
    let row_and_example = |builder: ArtifactBuilder| {
        builder
            .parameter(
                Parameter::new("row", record.short_name()).with_annotation("@Param(\"row\")"),
            )
            .parameter(
                Parameter::new("example", example.short_name())
                    .with_annotation("@Param(\"example\")"),
            )
            .returns("int")
            .import(PARAM)
            .type_import(record)
            .type_import(example)
    };

    let builder = match kind {
        ArtifactKind::CountByExample => ArtifactBuilder::operation(kind, "countByExample")
            .annotation(provided("SelectProvider", "countByExample"))
            .parameter(Parameter::new("example", example.short_name()))
            .returns("long")
            .import(SELECT_PROVIDER)
            .type_import(example),
        ArtifactKind::DeleteByExample => ArtifactBuilder::operation(kind, "deleteByExample")
            .annotation(provided("DeleteProvider", "deleteByExample"))
            .parameter(Parameter::new("example", example.short_name()))
            .returns("int")
            .import(DELETE_PROVIDER)
            .type_import(example),
        ArtifactKind::DeleteByPrimaryKey => {
            let fragments = generator.fragments()?;
            let predicate = match fragments.primary_key_predicate(None) {
                Some(predicate) => predicate,
                None => return Ok(None),
            };
            let statement = Delete::from_table(table_name).where_(predicate);
            let mut builder = ArtifactBuilder::operation(kind, "deleteByPrimaryKey");
            for annotation in statement_annotation("Delete", statement.build_lines()) {
                builder = builder.annotation(annotation);
            }
            builder
                .fragment(key_parameters(&fragments))
                .returns("int")
                .import(DELETE)
        }
        ArtifactKind::Insert => {
            let fragments = generator.fragments()?;
            let statement = Insert::into_table(table_name).values(fragments.insert_values());
            let mut builder = ArtifactBuilder::operation(kind, "insert");
            for annotation in statement_annotation("Insert", statement.build_lines()) {
                builder = builder.annotation(annotation);
            }
            builder
                .fragment(fragments.generated_key(""))
                .parameter(Parameter::new("row", record.short_name()))
                .returns("int")
                .import(INSERT)
                .type_import(record)
        }
        ArtifactKind::InsertSelective => {
            let fragments = generator.fragments()?;
            ArtifactBuilder::operation(kind, "insertSelective")
                .annotation(provided("InsertProvider", "insertSelective"))
                .fragment(fragments.generated_key(""))
                .parameter(Parameter::new("row", record.short_name()))
                .returns("int")
                .import(INSERT_PROVIDER)
                .type_import(record)
        }
        ArtifactKind::SelectByExample | ArtifactKind::SelectByExampleWithBlobs => {
            let fragments = generator.fragments()?;
            let with_blobs = kind == ArtifactKind::SelectByExampleWithBlobs;
            let (name, id, columns): (&str, &str, Vec<&ColumnModel>) = if with_blobs {
                (
                    "selectByExampleWithBLOBs",
                    BLOB_RESULT_MAP,
                    table.columns().iter().collect(),
                )
            } else {
                ("selectByExample", BASE_RESULT_MAP, table.base_columns())
            };
            ArtifactBuilder::operation(kind, name)
                .annotation(provided("SelectProvider", name))
                .fragment(fragments.annotated_results_for(id, &columns))
                .parameter(Parameter::new("example", example.short_name()))
                .returns(format!("List<{}>", record.short_name()))
                .imports([SELECT_PROVIDER, LIST])
                .type_import(record)
                .type_import(example)
        }
        ArtifactKind::SelectByPrimaryKey => {
            let fragments = generator.fragments()?;
            let predicate = match fragments.primary_key_predicate(None) {
                Some(predicate) => predicate,
                None => return Ok(None),
            };
            let (id, columns): (&str, Vec<&ColumnModel>) = if table.has_blob_columns() {
                (BLOB_RESULT_MAP, table.columns().iter().collect())
            } else {
                (BASE_RESULT_MAP, table.base_columns())
            };
            let statement = Select::new()
                .columns([fragments.column_list(&columns)])
                .from(table_name)
                .where_(predicate);
            let results = if generator.reuses_result_structure() {
                fragments.result_map_reference_for(id)
            } else {
                fragments.annotated_results_for(id, &columns)
            };
            let mut builder = ArtifactBuilder::operation(kind, "selectByPrimaryKey");
            for annotation in statement_annotation("Select", statement.build_lines()) {
                builder = builder.annotation(annotation);
            }
            builder
                .fragment(results)
                .fragment(key_parameters(&fragments))
                .returns(record.short_name())
                .import(SELECT)
                .type_import(record)
        }
        ArtifactKind::UpdateByExampleSelective => row_and_example(
            ArtifactBuilder::operation(kind, "updateByExampleSelective")
                .annotation(provided("UpdateProvider", "updateByExampleSelective"))
                .import(UPDATE_PROVIDER),
        ),
        ArtifactKind::UpdateByExample => row_and_example(
            ArtifactBuilder::operation(kind, "updateByExample")
                .annotation(provided("UpdateProvider", "updateByExample"))
                .import(UPDATE_PROVIDER),
        ),
        ArtifactKind::UpdateByExampleWithBlobs => row_and_example(
            ArtifactBuilder::operation(kind, "updateByExampleWithBLOBs")
                .annotation(provided("UpdateProvider", "updateByExampleWithBLOBs"))
                .import(UPDATE_PROVIDER),
        ),
        ArtifactKind::UpdateByPrimaryKeySelective => {
            ArtifactBuilder::operation(kind, "updateByPrimaryKeySelective")
                .annotation(provided("UpdateProvider", "updateByPrimaryKeySelective"))
                .parameter(Parameter::new("row", record.short_name()))
                .returns("int")
                .import(UPDATE_PROVIDER)
                .type_import(record)
        }
        ArtifactKind::UpdateByPrimaryKeyWithoutBlobs | ArtifactKind::UpdateByPrimaryKeyWithBlobs => {
            let fragments = generator.fragments()?;
            let with_blobs = kind == ArtifactKind::UpdateByPrimaryKeyWithBlobs;
            let name = if with_blobs {
                "updateByPrimaryKeyWithBLOBs"
            } else {
                "updateByPrimaryKey"
            };
            let predicate = match fragments.primary_key_predicate(None) {
                Some(predicate) => predicate,
                None => return Ok(None),
            };
            let columns = fragments.update_columns(with_blobs);
            let statement = Update::table(table_name)
                .set(fragments.set_assignments(&columns, None))
                .where_(predicate);
            let mut builder = ArtifactBuilder::operation(kind, name);
            for annotation in statement_annotation("Update", statement.build_lines()) {
                builder = builder.annotation(annotation);
            }
            builder
                .parameter(Parameter::new("row", record.short_name()))
                .returns("int")
                .import(UPDATE)
                .type_import(record)
        }
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
    use crate::model::{GeneratedKey, TableModel};
    use crate::plugins::PluginAggregator;
    use crate::traits::SilentProgress;

    fn orders() -> TableModel {
        TableModel::builder("orders", "Order")
            .packages("com.example.model", "com.example.mapper")
            .column(ColumnModel::new("id", "id", "INTEGER").identity())
            .column(ColumnModel::new("order_date", "orderDate", "DATE"))
            .primary_key("id")
            .generated_key(GeneratedKey::jdbc_standard("id"))
            .build()
    }

    fn produce_with(
        table: &TableModel,
        kind: ArtifactKind,
        reuse: bool,
    ) -> Option<CandidateArtifact> {
        let profile = NamingProfile::new(Dialect::AnnotatedMapper);
        let plugins = PluginAggregator::new();
        let ctx = GenerationContext::new(table, &profile, &plugins, &SilentProgress);
        ArtifactGenerator::builder(kind)
            .with_fragments(ctx.fragments())
            .reuse_result_structure(reuse)
            .build()
            .expect("generator")
            .produce(&ctx)
            .expect("produce")
    }

    #[test]
    fn test_delete_by_primary_key_quotes_statement() {
        let artifact =
            produce_with(&orders(), ArtifactKind::DeleteByPrimaryKey, false).expect("delete");

        assert_eq!(
            artifact.signature().annotations,
            vec![
                "@Delete({",
                "    \"delete from orders\",",
                "    \"where id = #{id,jdbcType=INTEGER}\"",
                "})",
            ]
        );
        assert_eq!(artifact.signature().parameters[0].name, "id");
        assert_eq!(artifact.signature().parameters[0].type_name, "Integer");
        assert!(!artifact.references().has_import("java.lang.Integer"));
        assert!(artifact
            .references()
            .has_import("org.apache.ibatis.annotations.Delete"));
    }

    #[test]
    fn test_insert_carries_generated_key_options() {
        let artifact = produce_with(&orders(), ArtifactKind::Insert, false).expect("insert");
        let annotations = &artifact.signature().annotations;

        assert_eq!(annotations[1], "    \"insert into orders (order_date)\",");
        assert_eq!(
            annotations.last().map(String::as_str),
            Some("@Options(useGeneratedKeys=true,keyProperty=\"id\")")
        );
    }

    #[test]
    fn test_selective_operations_go_through_provider() {
        let artifact = produce_with(&orders(), ArtifactKind::InsertSelective, false)
            .expect("insert selective");

        assert_eq!(
            artifact.signature().annotations[0],
            "@InsertProvider(type=OrderSqlProvider.class, method=\"insertSelective\")"
        );
    }

    #[test]
    fn test_select_by_primary_key_reuse() {
        let inline =
            produce_with(&orders(), ArtifactKind::SelectByPrimaryKey, false).expect("select");
        assert!(inline
            .signature()
            .annotations
            .contains(&"@Results(id=\"BaseResultMap\", value = {".to_string()));

        let reused =
            produce_with(&orders(), ArtifactKind::SelectByPrimaryKey, true).expect("select");
        assert!(reused
            .signature()
            .annotations
            .contains(&"@ResultMap(\"BaseResultMap\")".to_string()));
        assert!(!reused
            .signature()
            .annotations
            .iter()
            .any(|a| a.starts_with("@Results")));
    }
}
