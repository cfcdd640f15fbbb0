use super::{chain, terminate, ArtifactGenerator, ArtifactKind};
use crate::builders::ArtifactBuilder;
use crate::context::GenerationContext;
use crate::error::{GenError, Result};
use crate::types::{CandidateArtifact, Marker, Parameter, TypeName};

const SQL_PROVIDER_ADAPTER: &str = "org.mybatis.dynamic.sql.util.SqlProviderAdapter";
const INSERT_PROVIDER: &str = "org.apache.ibatis.annotations.InsertProvider";
const SELECT_PROVIDER: &str = "org.apache.ibatis.annotations.SelectProvider";
const PARAM: &str = "org.apache.ibatis.annotations.Param";
const INSERT_STATEMENT: &str = "org.mybatis.dynamic.sql.insert.render.InsertStatementProvider";
const SELECT_STATEMENT: &str = "org.mybatis.dynamic.sql.select.render.SelectStatementProvider";
const COUNT_COMPLETER: &str = "org.mybatis.dynamic.sql.select.CountDSLCompleter";
const DELETE_COMPLETER: &str = "org.mybatis.dynamic.sql.delete.DeleteDSLCompleter";
const SELECT_COMPLETER: &str = "org.mybatis.dynamic.sql.select.SelectDSLCompleter";
const UPDATE_COMPLETER: &str = "org.mybatis.dynamic.sql.update.UpdateDSLCompleter";
const UPDATE_DSL: &str = "org.mybatis.dynamic.sql.update.UpdateDSL";
const UPDATE_MODEL: &str = "org.mybatis.dynamic.sql.update.UpdateModel";
const MYBATIS3_UTILS: &str = "org.mybatis.dynamic.sql.util.mybatis3.MyBatis3Utils";
const BASIC_COLUMN: &str = "org.mybatis.dynamic.sql.BasicColumn";
const ALIASABLE_TABLE: &str = "org.mybatis.dynamic.sql.AliasableSqlTable";
const SQL_COLUMN: &str = "org.mybatis.dynamic.sql.SqlColumn";
const JDBC_TYPE: &str = "java.sql.JDBCType";
const LIST: &str = "java.util.List";
const OPTIONAL: &str = "java.util.Optional";
const COLLECTION: &str = "java.util.Collection";

pub(crate) const COMMON_COUNT_MAPPER: &str = "org.mybatis.dynamic.sql.util.mybatis3.CommonCountMapper";
pub(crate) const COMMON_DELETE_MAPPER: &str =
    "org.mybatis.dynamic.sql.util.mybatis3.CommonDeleteMapper";
pub(crate) const COMMON_INSERT_MAPPER: &str =
    "org.mybatis.dynamic.sql.util.mybatis3.CommonInsertMapper";
pub(crate) const COMMON_UPDATE_MAPPER: &str =
    "org.mybatis.dynamic.sql.util.mybatis3.CommonUpdateMapper";

/// Marker for inserts that go through the common insert mapper; only used
/// when the table has no generated key.
pub(crate) fn insert_marker(ctx: &GenerationContext<'_>) -> Option<Marker> {
    if ctx.table().generated_key().is_some() {
        return None;
    }
    Some(Marker::with_argument(
        &TypeName::new(COMMON_INSERT_MAPPER),
        ctx.names().record(),
    ))
}

fn with_insert_marker(builder: ArtifactBuilder, ctx: &GenerationContext<'_>) -> ArtifactBuilder {
    match insert_marker(ctx) {
        Some(marker) => builder.marker(marker),
        None => builder,
    }
}

pub(super) fn produce(
    generator: &ArtifactGenerator<'_>,
    ctx: &GenerationContext<'_>,
) -> Result<Option<CandidateArtifact>> {
    let kind = generator.kind();
    let names = ctx.names();
    let table = ctx.table();
    let record = names.record();
    let short = record.short_name();
    let table_field = names.table_field();

    let builder = match kind {
        ArtifactKind::BasicInsert => {
            let fragments = generator.fragments()?;
            ArtifactBuilder::operation(kind, "insert")
                .annotation("@InsertProvider(type=SqlProviderAdapter.class, method=\"insert\")")
                .fragment(fragments.generated_key("row."))
                .parameter(Parameter::new(
                    "insertStatement",
                    format!("InsertStatementProvider<{}>", short),
                ))
                .returns("int")
                .imports([INSERT_PROVIDER, SQL_PROVIDER_ADAPTER, INSERT_STATEMENT])
                .type_import(record)
        }
        ArtifactKind::BasicInsertMultiple => {
            let fragments = generator.fragments()?;
            ArtifactBuilder::operation(kind, "insertMultiple")
                .annotation(
                    "@InsertProvider(type=SqlProviderAdapter.class, method=\"insertMultipleWithGeneratedKeys\")",
                )
                .fragment(fragments.generated_key("records."))
                .parameter(
                    Parameter::new("insertStatement", "String")
                        .with_annotation("@Param(\"insertStatement\")"),
                )
                .parameter(
                    Parameter::new("records", format!("List<{}>", short))
                        .with_annotation("@Param(\"records\")"),
                )
                .returns("int")
                .imports([INSERT_PROVIDER, SQL_PROVIDER_ADAPTER, PARAM, LIST])
                .type_import(record)
        }
        ArtifactKind::BasicSelectMany => {
            let fragments = generator.fragments()?;
            ArtifactBuilder::operation(kind, "selectMany")
                .annotation("@SelectProvider(type=SqlProviderAdapter.class, method=\"select\")")
                .fragment(fragments.annotated_results())
                .parameter(Parameter::new("selectStatement", "SelectStatementProvider"))
                .returns(format!("List<{}>", short))
                .imports([SELECT_PROVIDER, SQL_PROVIDER_ADAPTER, SELECT_STATEMENT, LIST])
                .type_import(record)
        }
        ArtifactKind::BasicSelectOne => {
            let fragments = generator.fragments()?;
            let results = if generator.reuses_result_structure() {
                fragments.result_map_reference()
            } else {
                fragments.annotated_results()
            };
            ArtifactBuilder::operation(kind, "selectOne")
                .annotation("@SelectProvider(type=SqlProviderAdapter.class, method=\"select\")")
                .fragment(results)
                .parameter(Parameter::new("selectStatement", "SelectStatementProvider"))
                .returns(format!("Optional<{}>", short))
                .imports([SELECT_PROVIDER, SQL_PROVIDER_ADAPTER, SELECT_STATEMENT, OPTIONAL])
                .type_import(record)
        }
        ArtifactKind::GeneralCount => {
            let fragments = generator.fragments()?;
            default_method(kind, "count")
                .parameter(Parameter::new("completer", "CountDSLCompleter"))
                .returns("long")
                .line(format!(
                    "return MyBatis3Utils.countFrom(this::count, {}, completer);",
                    table_field
                ))
                .fragment(fragments.table_reference())
                .imports([COUNT_COMPLETER, MYBATIS3_UTILS])
                .marker(Marker::new(&TypeName::new(COMMON_COUNT_MAPPER)))
        }
        ArtifactKind::GeneralDelete => {
            let fragments = generator.fragments()?;
            default_method(kind, "delete")
                .parameter(Parameter::new("completer", "DeleteDSLCompleter"))
                .returns("int")
                .line(format!(
                    "return MyBatis3Utils.deleteFrom(this::delete, {}, completer);",
                    table_field
                ))
                .fragment(fragments.table_reference())
                .imports([DELETE_COMPLETER, MYBATIS3_UTILS])
                .marker(Marker::new(&TypeName::new(COMMON_DELETE_MAPPER)))
        }
        ArtifactKind::DeleteByPrimaryKey => {
            let fragments = generator.fragments()?;
            default_method(kind, "deleteByPrimaryKey")
                .returns("int")
                .line("return delete(c ->")
                .fragment(fragments.primary_key_where(false))
                .line(");")
        }
        ArtifactKind::Insert => {
            let fragments = generator.fragments()?;
            let builder = default_method(kind, "insert")
                .parameter(Parameter::new("row", short))
                .returns("int")
                .line(format!(
                    "return MyBatis3Utils.insert(this::insert, row, {}, c ->",
                    table_field
                ))
                .fragment(fragments.insert_mappings(false))
                .line(");")
                .fragment(fragments.table_reference())
                .import(MYBATIS3_UTILS)
                .type_import(record);
            with_insert_marker(builder, ctx)
        }
        ArtifactKind::InsertMultiple => {
            let fragments = generator.fragments()?;
            let builder = default_method(kind, "insertMultiple")
                .parameter(Parameter::new("records", format!("Collection<{}>", short)))
                .returns("int")
                .line(format!(
                    "return MyBatis3Utils.insertMultiple(this::insertMultiple, records, {}, c ->",
                    table_field
                ))
                .fragment(fragments.insert_mappings(false))
                .line(");")
                .fragment(fragments.table_reference())
                .imports([MYBATIS3_UTILS, COLLECTION])
                .type_import(record);
            with_insert_marker(builder, ctx)
        }
        ArtifactKind::InsertSelective => {
            let fragments = generator.fragments()?;
            let builder = default_method(kind, "insertSelective")
                .parameter(Parameter::new("row", short))
                .returns("int")
                .line(format!(
                    "return MyBatis3Utils.insert(this::insert, row, {}, c ->",
                    table_field
                ))
                .fragment(fragments.insert_mappings(true))
                .line(");")
                .fragment(fragments.table_reference())
                .import(MYBATIS3_UTILS)
                .type_import(record);
            with_insert_marker(builder, ctx)
        }
        ArtifactKind::SelectList => {
            let fragments = generator.fragments()?;
            let columns = fragments.select_list();
            ArtifactBuilder::field(kind, "selectList", "BasicColumn[]")
                .line(format!("BasicColumn.columnList({});", columns.lines().join(", ")))
                .references(columns.references())
                .import(BASIC_COLUMN)
        }
        ArtifactKind::GeneralSelectOne => {
            let fragments = generator.fragments()?;
            default_method(kind, "selectOne")
                .parameter(Parameter::new("completer", "SelectDSLCompleter"))
                .returns(format!("Optional<{}>", short))
                .line(format!(
                    "return MyBatis3Utils.selectOne(this::selectOne, selectList, {}, completer);",
                    table_field
                ))
                .fragment(fragments.table_reference())
                .imports([SELECT_COMPLETER, MYBATIS3_UTILS, OPTIONAL])
                .type_import(record)
        }
        ArtifactKind::GeneralSelect => {
            let fragments = generator.fragments()?;
            default_method(kind, "select")
                .parameter(Parameter::new("completer", "SelectDSLCompleter"))
                .returns(format!("List<{}>", short))
                .line(format!(
                    "return MyBatis3Utils.selectList(this::selectMany, selectList, {}, completer);",
                    table_field
                ))
                .fragment(fragments.table_reference())
                .imports([SELECT_COMPLETER, MYBATIS3_UTILS, LIST])
                .type_import(record)
        }
        ArtifactKind::GeneralSelectDistinct => {
            let fragments = generator.fragments()?;
            default_method(kind, "selectDistinct")
                .parameter(Parameter::new("completer", "SelectDSLCompleter"))
                .returns(format!("List<{}>", short))
                .line(format!(
                    "return MyBatis3Utils.selectDistinct(this::selectMany, selectList, {}, completer);",
                    table_field
                ))
                .fragment(fragments.table_reference())
                .imports([SELECT_COMPLETER, MYBATIS3_UTILS, LIST])
                .type_import(record)
        }
        ArtifactKind::SelectByPrimaryKey => {
            let fragments = generator.fragments()?;
            default_method(kind, "selectByPrimaryKey")
                .returns(format!("Optional<{}>", short))
                .line("return selectOne(c ->")
                .fragment(fragments.primary_key_where(false))
                .line(");")
                .import(OPTIONAL)
                .type_import(record)
        }
        ArtifactKind::GeneralUpdate => {
            let fragments = generator.fragments()?;
            default_method(kind, "update")
                .parameter(Parameter::new("completer", "UpdateDSLCompleter"))
                .returns("int")
                .line(format!(
                    "return MyBatis3Utils.update(this::update, {}, completer);",
                    table_field
                ))
                .fragment(fragments.table_reference())
                .imports([UPDATE_COMPLETER, MYBATIS3_UTILS])
                .marker(Marker::new(&TypeName::new(COMMON_UPDATE_MAPPER)))
        }
        ArtifactKind::UpdateAllColumns | ArtifactKind::UpdateSelectiveColumns => {
            let fragments = generator.fragments()?;
            let selective = kind == ArtifactKind::UpdateSelectiveColumns;
            let name = if selective {
                "updateSelectiveColumns"
            } else {
                "updateAllColumns"
            };
            let columns: Vec<_> = table.columns().iter().collect();
            let sets = fragments.set_lines(&columns, selective);
            let mut body = vec!["return dsl".to_string()];
            body.extend(sets.lines().iter().cloned());

            ArtifactBuilder::operation(kind, name)
                .modifier("static")
                .parameter(Parameter::new("row", short))
                .parameter(Parameter::new("dsl", "UpdateDSL<UpdateModel>"))
                .returns("UpdateDSL<UpdateModel>")
                .lines(terminate(body, ";"))
                .references(sets.references())
                .imports([UPDATE_DSL, UPDATE_MODEL])
                .type_import(record)
        }
        ArtifactKind::UpdateByPrimaryKey | ArtifactKind::UpdateByPrimaryKeySelective => {
            let fragments = generator.fragments()?;
            let selective = kind == ArtifactKind::UpdateByPrimaryKeySelective;
            let name = if selective {
                "updateByPrimaryKeySelective"
            } else {
                "updateByPrimaryKey"
            };
            let sets = fragments.set_lines(&fragments.update_columns(true), selective);
            let predicate = fragments.primary_key_where(true);
            let mut chained = sets.lines().to_vec();
            chained.extend(predicate.lines().iter().cloned());

            default_method(kind, name)
                .parameter(Parameter::new("row", short))
                .returns("int")
                .line("return update(c ->")
                .lines(chain("c", &chained))
                .line(");")
                .references(sets.references())
                .references(predicate.references())
                .type_import(record)
        }
        ArtifactKind::SupportTable => {
            let fragments = generator.fragments()?;
            let class = names.table_class();
            let mut builder = ArtifactBuilder::field(kind, table_field, class)
                .modifier("public")
                .modifier("static")
                .modifier("final")
                .line(format!("new {}();", class))
                .line(format!(
                    "public static final class {} extends AliasableSqlTable<{}> {{",
                    class, class
                ));
            for column in table.columns() {
                let host = fragments.host_type(column);
                builder = builder
                    .line(format!(
                        "    public final SqlColumn<{}> {} = column(\"{}\", JDBCType.{});",
                        host.short_name(),
                        names.field(column),
                        column.name,
                        column.jdbc_type.name()
                    ))
                    .type_import(&host);
            }
            builder
                .line(format!("    public {}() {{", class))
                .line(format!(
                    "        super(\"{}\", {}::new);",
                    table.table().qualified_name(),
                    class
                ))
                .line("    }")
                .line("}")
                .imports([ALIASABLE_TABLE, SQL_COLUMN, JDBC_TYPE])
        }
        ArtifactKind::SupportColumn => {
            let fragments = generator.fragments()?;
            let column = generator.column()?;
            if names.collides(column) {
                log::trace!(
                    "Skipping shortcut field for {}: it shares the table qualifier's name",
                    column.name
                );
                return Ok(None);
            }
            let host = fragments.host_type(column);
            let field = names.field(column);
            ArtifactBuilder::field(kind, field.clone(), format!("SqlColumn<{}>", host.short_name()))
                .modifier("public")
                .modifier("static")
                .modifier("final")
                .line(format!("{}.{};", table_field, field))
                .import(SQL_COLUMN)
                .type_import(&host)
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

fn default_method(kind: ArtifactKind, name: &str) -> ArtifactBuilder {
    ArtifactBuilder::operation(kind, name).modifier("default")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Dialect, NamingProfile};
    use crate::model::{ColumnModel, GeneratedKey, TableModel};
    use crate::plugins::PluginAggregator;
    use crate::traits::SilentProgress;

    fn orders() -> crate::model::TableModelBuilder {
        TableModel::builder("orders", "Order")
            .packages("com.example.model", "com.example.mapper")
            .column(ColumnModel::new("id", "id", "INTEGER").identity())
            .column(ColumnModel::new("order_date", "orderDate", "DATE"))
            .primary_key("id")
    }

    fn produce_kind(table: &TableModel, kind: ArtifactKind, reuse: bool) -> CandidateArtifact {
        let profile = NamingProfile::new(Dialect::DynamicSql);
        let plugins = PluginAggregator::new();
        let ctx = GenerationContext::new(table, &profile, &plugins, &SilentProgress);
        ArtifactGenerator::builder(kind)
            .with_fragments(ctx.fragments())
            .reuse_result_structure(reuse)
            .build()
            .expect("generator")
            .produce(&ctx)
            .expect("produce")
            .expect("applicable")
    }

    #[test]
    fn test_delete_by_primary_key() {
        let artifact = produce_kind(&orders().build(), ArtifactKind::DeleteByPrimaryKey, false);

        assert_eq!(artifact.signature().parameters[0].name, "id_");
        assert_eq!(artifact.signature().parameters[0].type_name, "Integer");
        assert_eq!(
            artifact.body(),
            &["return delete(c ->", "c.where(id, isEqualTo(id_))", ");"]
        );
        assert!(artifact
            .references()
            .has_static_import("com.example.mapper.OrderDynamicSqlSupport.id"));
    }

    #[test]
    fn test_insert_carries_insert_marker_without_generated_key() {
        let artifact = produce_kind(&orders().build(), ArtifactKind::Insert, false);
        assert_eq!(artifact.markers()[0].declaration(), "CommonInsertMapper<Order>");

        let keyed = orders().generated_key(GeneratedKey::jdbc_standard("id")).build();
        let artifact = produce_kind(&keyed, ArtifactKind::Insert, false);
        assert!(artifact.markers().is_empty());
        assert!(!artifact.body().iter().any(|line| line.contains("map(id)")));
    }

    #[test]
    fn test_basic_select_one_reuse() {
        let table = orders().build();

        let reused = produce_kind(&table, ArtifactKind::BasicSelectOne, true);
        assert!(reused
            .signature()
            .annotations
            .contains(&"@ResultMap(\"OrderResult\")".to_string()));

        let inline = produce_kind(&table, ArtifactKind::BasicSelectOne, false);
        assert!(inline.signature().annotations[1].starts_with("@Results(id=\"OrderResult\""));
    }

    #[test]
    fn test_update_by_primary_key_chains_set_and_where() {
        let artifact = produce_kind(&orders().build(), ArtifactKind::UpdateByPrimaryKey, false);

        assert_eq!(
            artifact.body(),
            &[
                "return update(c ->",
                "c.set(orderDate).equalTo(row::getOrderDate)",
                ".where(id, isEqualTo(row::getId))",
                ");",
            ]
        );
    }

    #[test]
    fn test_select_list_references_every_column() {
        let artifact = produce_kind(&orders().build(), ArtifactKind::SelectList, false);

        assert_eq!(artifact.body(), &["BasicColumn.columnList(id, orderDate);"]);
        assert!(artifact.references().has_import(BASIC_COLUMN));
    }
}
