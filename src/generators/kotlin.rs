use super::dynamic_sql::{
    insert_marker, COMMON_COUNT_MAPPER, COMMON_DELETE_MAPPER, COMMON_UPDATE_MAPPER,
};
use super::{ArtifactGenerator, ArtifactKind};
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
const COUNT_COMPLETER: &str = "org.mybatis.dynamic.sql.util.kotlin.CountCompleter";
const DELETE_COMPLETER: &str = "org.mybatis.dynamic.sql.util.kotlin.DeleteCompleter";
const SELECT_COMPLETER: &str = "org.mybatis.dynamic.sql.util.kotlin.SelectCompleter";
const UPDATE_COMPLETER: &str = "org.mybatis.dynamic.sql.util.kotlin.UpdateCompleter";
const UPDATE_BUILDER: &str = "org.mybatis.dynamic.sql.util.kotlin.KotlinUpdateBuilder";
const ALIASABLE_TABLE: &str = "org.mybatis.dynamic.sql.AliasableSqlTable";
const SQL_COLUMN: &str = "org.mybatis.dynamic.sql.SqlColumn";
const BASIC_COLUMN: &str = "org.mybatis.dynamic.sql.BasicColumn";
const JDBC_TYPE: &str = "java.sql.JDBCType";

fn mybatis3(function: &str) -> String {
    format!("org.mybatis.dynamic.sql.util.kotlin.mybatis3.{}", function)
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
    let mapper = names.mapper().short_name();
    let table_field = names.table_field();

    // Extension functions hang off the mapper and delegate to a top-level helper.
    let extension = |name: &str| ArtifactBuilder::operation(kind, name).receiver(mapper);

    let builder = match kind {
        ArtifactKind::BasicInsert => {
            let fragments = generator.fragments()?;
            ArtifactBuilder::operation(kind, "insert")
                .annotation("@InsertProvider(type=SqlProviderAdapter::class, method=\"insert\")")
                .fragment(fragments.generated_key("row."))
                .parameter(Parameter::new(
                    "insertStatement",
                    format!("InsertStatementProvider<{}>", short),
                ))
                .returns("Int")
                .imports([INSERT_PROVIDER, SQL_PROVIDER_ADAPTER, INSERT_STATEMENT])
                .type_import(record)
        }
        ArtifactKind::BasicInsertMultiple => {
            let fragments = generator.fragments()?;
            ArtifactBuilder::operation(kind, "insertMultiple")
                .annotation(
                    "@InsertProvider(type=SqlProviderAdapter::class, method=\"insertMultipleWithGeneratedKeys\")",
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
                .returns("Int")
                .imports([INSERT_PROVIDER, SQL_PROVIDER_ADAPTER, PARAM])
                .type_import(record)
        }
        ArtifactKind::BasicSelectMany => {
            let fragments = generator.fragments()?;
            ArtifactBuilder::operation(kind, "selectMany")
                .annotation("@SelectProvider(type=SqlProviderAdapter::class, method=\"select\")")
                .fragment(fragments.annotated_results())
                .parameter(Parameter::new("selectStatement", "SelectStatementProvider"))
                .returns(format!("List<{}>", short))
                .imports([SELECT_PROVIDER, SQL_PROVIDER_ADAPTER, SELECT_STATEMENT])
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
                .annotation("@SelectProvider(type=SqlProviderAdapter::class, method=\"select\")")
                .fragment(results)
                .parameter(Parameter::new("selectStatement", "SelectStatementProvider"))
                .returns(format!("{}?", short))
                .imports([SELECT_PROVIDER, SQL_PROVIDER_ADAPTER, SELECT_STATEMENT])
                .type_import(record)
        }
        ArtifactKind::GeneralCount => {
            let fragments = generator.fragments()?;
            extension("count")
                .parameter(Parameter::new("completer", "CountCompleter"))
                .line(format!("countFrom(this::count, {}, completer)", table_field))
                .fragment(fragments.table_reference())
                .import(COUNT_COMPLETER)
                .import(mybatis3("countFrom"))
                .marker(Marker::new(&TypeName::new(COMMON_COUNT_MAPPER)))
        }
        ArtifactKind::GeneralDelete => {
            let fragments = generator.fragments()?;
            extension("delete")
                .parameter(Parameter::new("completer", "DeleteCompleter"))
                .line(format!("deleteFrom(this::delete, {}, completer)", table_field))
                .fragment(fragments.table_reference())
                .import(DELETE_COMPLETER)
                .import(mybatis3("deleteFrom"))
                .marker(Marker::new(&TypeName::new(COMMON_DELETE_MAPPER)))
        }
        ArtifactKind::DeleteByPrimaryKey => {
            let fragments = generator.fragments()?;
            extension("deleteByPrimaryKey")
                .line("delete {")
                .fragment(fragments.primary_key_where(false))
                .line("}")
        }
        ArtifactKind::Insert | ArtifactKind::InsertSelective => {
            let fragments = generator.fragments()?;
            let selective = kind == ArtifactKind::InsertSelective;
            let name = if selective { "insertSelective" } else { "insert" };
            let builder = extension(name)
                .parameter(Parameter::new("row", short))
                .line(format!("insert(this::insert, row, {}) {{", table_field))
                .fragment(fragments.insert_mappings(selective))
                .line("}")
                .fragment(fragments.table_reference())
                .import(mybatis3("insert"))
                .type_import(record);
            match insert_marker(ctx) {
                Some(marker) => builder.marker(marker),
                None => builder,
            }
        }
        ArtifactKind::InsertMultiple => {
            let fragments = generator.fragments()?;
            let builder = extension("insertMultiple")
                .parameter(Parameter::new("records", format!("Collection<{}>", short)))
                .line(format!(
                    "insertMultiple(this::insertMultiple, records, {}) {{",
                    table_field
                ))
                .fragment(fragments.insert_mappings(false))
                .line("}")
                .fragment(fragments.table_reference())
                .import(mybatis3("insertMultiple"))
                .type_import(record);
            match insert_marker(ctx) {
                Some(marker) => builder.marker(marker),
                None => builder,
            }
        }
        ArtifactKind::SelectList => {
            let fragments = generator.fragments()?;
            let columns = fragments.select_list();
            ArtifactBuilder::field(kind, "columnList", "List<BasicColumn>")
                .modifier("private")
                .line(format!("listOf({})", columns.lines().join(", ")))
                .references(columns.references())
                .import(BASIC_COLUMN)
        }
        ArtifactKind::GeneralSelectOne => {
            let fragments = generator.fragments()?;
            extension("selectOne")
                .parameter(Parameter::new("completer", "SelectCompleter"))
                .line(format!(
                    "selectOne(this::selectOne, columnList, {}, completer)",
                    table_field
                ))
                .fragment(fragments.table_reference())
                .import(SELECT_COMPLETER)
                .import(mybatis3("selectOne"))
        }
        ArtifactKind::GeneralSelect => {
            let fragments = generator.fragments()?;
            extension("select")
                .parameter(Parameter::new("completer", "SelectCompleter"))
                .line(format!(
                    "selectList(this::selectMany, columnList, {}, completer)",
                    table_field
                ))
                .fragment(fragments.table_reference())
                .import(SELECT_COMPLETER)
                .import(mybatis3("selectList"))
        }
        ArtifactKind::GeneralSelectDistinct => {
            let fragments = generator.fragments()?;
            extension("selectDistinct")
                .parameter(Parameter::new("completer", "SelectCompleter"))
                .line(format!(
                    "selectDistinct(this::selectMany, columnList, {}, completer)",
                    table_field
                ))
                .fragment(fragments.table_reference())
                .import(SELECT_COMPLETER)
                .import(mybatis3("selectDistinct"))
        }
        ArtifactKind::SelectByPrimaryKey => {
            let fragments = generator.fragments()?;
            extension("selectByPrimaryKey")
                .line("selectOne {")
                .fragment(fragments.primary_key_where(false))
                .line("}")
        }
        ArtifactKind::GeneralUpdate => {
            let fragments = generator.fragments()?;
            extension("update")
                .parameter(Parameter::new("completer", "UpdateCompleter"))
                .line(format!("update(this::update, {}, completer)", table_field))
                .fragment(fragments.table_reference())
                .import(UPDATE_COMPLETER)
                .import(mybatis3("update"))
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
            ArtifactBuilder::operation(kind, name)
                .receiver("KotlinUpdateBuilder")
                .parameter(Parameter::new("row", short))
                .line("apply {")
                .fragment(fragments.set_lines(&columns, selective))
                .line("}")
                .import(UPDATE_BUILDER)
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
            extension(name)
                .parameter(Parameter::new("row", short))
                .line("update {")
                .fragment(fragments.set_lines(&fragments.update_columns(true), selective))
                .fragment(fragments.primary_key_where(true))
                .line("}")
                .type_import(record)
        }
        ArtifactKind::SupportTable => {
            let fragments = generator.fragments()?;
            let class = names.table_class();
            let mut builder = ArtifactBuilder::field(kind, table_field, class)
                .line(format!("{}()", class))
                .line(format!(
                    "class {} : AliasableSqlTable<{}>(\"{}\", ::{}) {{",
                    class,
                    class,
                    table.table().qualified_name(),
                    class
                ));
            for column in table.columns() {
                let host = fragments.host_type(column);
                builder = builder
                    .line(format!(
                        "    val {} = column<{}>(name = \"{}\", jdbcType = JDBCType.{})",
                        names.field(column),
                        host.short_name(),
                        column.name,
                        column.jdbc_type.name()
                    ))
                    .type_import(&host);
            }
            builder
                .line("}")
                .imports([ALIASABLE_TABLE, JDBC_TYPE])
        }
        ArtifactKind::SupportColumn => {
            let fragments = generator.fragments()?;
            let column = generator.column()?;
            if names.collides(column) {
                log::trace!(
                    "Skipping shortcut property for {}: it shares the table qualifier's name",
                    column.name
                );
                return Ok(None);
            }
            let host = fragments.host_type(column);
            let field = names.field(column);
            ArtifactBuilder::field(kind, field.clone(), format!("SqlColumn<{}>", host.short_name()))
                .line(format!("{}.{}", table_field, field))
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
