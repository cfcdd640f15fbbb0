use super::{ArtifactGenerator, ArtifactKind};
use crate::builders::{ArtifactBuilder, Delete, Insert, Select, Update};
use crate::context::GenerationContext;
use crate::error::{GenError, Result};
use crate::fragments::{
    FragmentGenerator, WriteInclusion, BASE_COLUMN_LIST, BASE_RESULT_MAP, BLOB_COLUMN_LIST,
    BLOB_RESULT_MAP, EXAMPLE_WHERE_CLAUSE, UPDATE_BY_EXAMPLE_WHERE_CLAUSE,
};
use crate::model::{ColumnModel, KeyStrategy};
use crate::types::CandidateArtifact;

fn include(refid: &str) -> String {
    format!("<include refid=\"{}\" />", refid)
}

fn indent(lines: Vec<String>) -> impl Iterator<Item = String> {
    lines.into_iter().map(|line| format!("  {}", line))
}

/// `<if test="...">` around an include of a where clause template.
fn conditional_include(test: &str, refid: &str) -> Vec<String> {
    vec![
        format!("<if test=\"{}\">", test),
        format!("  {}", include(refid)),
        "</if>".to_string(),
    ]
}

/// Criteria template shared by the by-example statements. `collection` is
/// the path to the criteria list on the parameter object.
fn example_where_template(collection: &str) -> Vec<String> {
    vec![
        "<where>".to_string(),
        format!(
            "  <foreach collection=\"{}\" item=\"criteria\" separator=\"or\">",
            collection
        ),
        "    <if test=\"criteria.valid\">".to_string(),
        "      <trim prefix=\"(\" prefixOverrides=\"and\" suffix=\")\">".to_string(),
        "        <foreach collection=\"criteria.criteria\" item=\"criterion\">".to_string(),
        "          <choose>".to_string(),
        "            <when test=\"criterion.noValue\">".to_string(),
        "              and ${criterion.condition}".to_string(),
        "            </when>".to_string(),
        "            <when test=\"criterion.singleValue\">".to_string(),
        "              and ${criterion.condition} #{criterion.value}".to_string(),
        "            </when>".to_string(),
        "            <when test=\"criterion.betweenValue\">".to_string(),
        "              and ${criterion.condition} #{criterion.value} and #{criterion.secondValue}"
            .to_string(),
        "            </when>".to_string(),
        "            <when test=\"criterion.listValue\">".to_string(),
        "              and ${criterion.condition}".to_string(),
        "              <foreach close=\")\" collection=\"criterion.value\" item=\"listItem\" open=\"(\" separator=\",\">"
            .to_string(),
        "                #{listItem}".to_string(),
        "              </foreach>".to_string(),
        "            </when>".to_string(),
        "          </choose>".to_string(),
        "        </foreach>".to_string(),
        "      </trim>".to_string(),
        "    </if>".to_string(),
        "  </foreach>".to_string(),
        "</where>".to_string(),
    ]
}

/// Parameter type of a by-key statement: the key's own type for a single
/// column key, a map for composite keys.
fn key_parameter_type(fragments: &FragmentGenerator<'_>) -> String {
    match fragments.table().primary_key_columns().as_slice() {
        [column] => fragments.host_type(column).fully_qualified().to_string(),
        _ => "map".to_string(),
    }
}

/// Select list lines: includes of the shared lists, or the columns inline.
fn select_columns(
    generator: &ArtifactGenerator<'_>,
    fragments: &FragmentGenerator<'_>,
    with_blobs: bool,
) -> Vec<String> {
    let table = fragments.table();
    if generator.reuses_column_list() {
        let mut lines = vec![include(BASE_COLUMN_LIST)];
        if with_blobs {
            lines.push(",".to_string());
            lines.push(include(BLOB_COLUMN_LIST));
        }
        lines
    } else {
        let columns: Vec<&ColumnModel> = if with_blobs {
            table.columns().iter().collect()
        } else {
            table.base_columns()
        };
        vec![fragments.column_list(&columns)]
    }
}

/// `<if test="prop != null">` blocks for a selective write. Columns that are
/// written unconditionally are emitted bare.
fn selective_lines(
    fragments: &FragmentGenerator<'_>,
    columns: &[&ColumnModel],
    prefix: Option<&str>,
    render: impl Fn(&ColumnModel) -> String,
) -> Vec<String> {
    let names = fragments.names();
    let mut lines = Vec::new();
    for column in columns {
        match fragments.write_inclusion(column, true) {
            WriteInclusion::Excluded => {}
            WriteInclusion::Always => lines.push(render(*column)),
            WriteInclusion::WhenPresent => {
                lines.push(format!(
                    "<if test=\"{}{} != null\">",
                    prefix.unwrap_or(""),
                    names.property(column)
                ));
                lines.push(format!("  {}", render(*column)));
                lines.push("</if>".to_string());
            }
        }
    }
    lines
}

pub(super) fn produce(
    generator: &ArtifactGenerator<'_>,
    ctx: &GenerationContext<'_>,
) -> Result<Option<CandidateArtifact>> {
    let kind = generator.kind();
    let names = ctx.names();
    let table = ctx.table();
    let table_name = table.table().qualified_name();
    let record = names.record().fully_qualified();
    let example = names.example().fully_qualified();

    let select = |id: &str, parameter_type: &str, result_map: &str| {
        let builder = ArtifactBuilder::element(kind, "select")
            .attribute("id", id)
            .attribute("parameterType", parameter_type);
        if generator.reuses_result_structure() {
            builder.attribute("resultMap", result_map)
        } else {
            builder.attribute("resultType", record)
        }
    };

    let builder = match kind {
        ArtifactKind::ResultMap => {
            let fragments = generator.fragments()?;
            ArtifactBuilder::element(kind, "resultMap")
                .attribute("id", BASE_RESULT_MAP)
                .attribute("type", record)
                .lines(fragments.result_entries(&table.base_columns()))
        }
        ArtifactKind::ResultMapWithBlobs => {
            let fragments = generator.fragments()?;
            let builder = ArtifactBuilder::element(kind, "resultMap")
                .attribute("id", BLOB_RESULT_MAP)
                .attribute("type", record);
            // Without the base map to extend, the base entries are repeated.
            let builder = if generator.reuses_result_structure() {
                builder.attribute("extends", BASE_RESULT_MAP)
            } else {
                builder.lines(fragments.result_entries(&table.base_columns()))
            };
            builder.lines(fragments.result_entries(&table.blob_columns()))
        }
        ArtifactKind::ExampleWhereClause => ArtifactBuilder::element(kind, "sql")
            .attribute("id", EXAMPLE_WHERE_CLAUSE)
            .lines(example_where_template("oredCriteria")),
        ArtifactKind::UpdateByExampleWhereClause => ArtifactBuilder::element(kind, "sql")
            .attribute("id", UPDATE_BY_EXAMPLE_WHERE_CLAUSE)
            .lines(example_where_template("example.oredCriteria")),
        ArtifactKind::BaseColumnList => {
            let fragments = generator.fragments()?;
            ArtifactBuilder::element(kind, "sql")
                .attribute("id", BASE_COLUMN_LIST)
                .line(fragments.column_list(&table.base_columns()))
        }
        ArtifactKind::BlobColumnList => {
            let fragments = generator.fragments()?;
            ArtifactBuilder::element(kind, "sql")
                .attribute("id", BLOB_COLUMN_LIST)
                .line(fragments.column_list(&table.blob_columns()))
        }
        ArtifactKind::SelectByExample | ArtifactKind::SelectByExampleWithBlobs => {
            let fragments = generator.fragments()?;
            let with_blobs = kind == ArtifactKind::SelectByExampleWithBlobs;
            let (id, result_map) = if with_blobs {
                ("selectByExampleWithBLOBs", BLOB_RESULT_MAP)
            } else {
                ("selectByExample", BASE_RESULT_MAP)
            };
            select(id, example, result_map)
                .line("select")
                .lines(["<if test=\"distinct\">", "  distinct", "</if>"])
                .lines(select_columns(generator, &fragments, with_blobs))
                .line(format!("from {}", table_name))
                .lines(conditional_include("_parameter != null", EXAMPLE_WHERE_CLAUSE))
                .lines([
                    "<if test=\"orderByClause != null\">",
                    "  order by ${orderByClause}",
                    "</if>",
                ])
        }
        ArtifactKind::SelectByPrimaryKey => {
            let fragments = generator.fragments()?;
            let with_blobs = table.has_blob_columns();
            let result_map = if with_blobs {
                BLOB_RESULT_MAP
            } else {
                BASE_RESULT_MAP
            };
            let predicate = match fragments.primary_key_predicate(None) {
                Some(predicate) => predicate,
                None => return Ok(None),
            };
            let statement = Select::new()
                .columns(select_columns(generator, &fragments, with_blobs))
                .from(table_name)
                .where_(predicate);
            select(
                "selectByPrimaryKey",
                &key_parameter_type(&fragments),
                result_map,
            )
            .lines(statement.build_lines())
        }
        ArtifactKind::DeleteByPrimaryKey => {
            let fragments = generator.fragments()?;
            let predicate = match fragments.primary_key_predicate(None) {
                Some(predicate) => predicate,
                None => return Ok(None),
            };
            ArtifactBuilder::element(kind, "delete")
                .attribute("id", "deleteByPrimaryKey")
                .attribute("parameterType", key_parameter_type(&fragments))
                .lines(Delete::from_table(table_name).where_(predicate).build_lines())
        }
        ArtifactKind::DeleteByExample => ArtifactBuilder::element(kind, "delete")
            .attribute("id", "deleteByExample")
            .attribute("parameterType", example)
            .line(format!("delete from {}", table_name))
            .lines(conditional_include("_parameter != null", EXAMPLE_WHERE_CLAUSE)),
        ArtifactKind::CountByExample => ArtifactBuilder::element(kind, "select")
            .attribute("id", "countByExample")
            .attribute("parameterType", example)
            .attribute("resultType", "java.lang.Long")
            .line(format!("select count(*) from {}", table_name))
            .lines(conditional_include("_parameter != null", EXAMPLE_WHERE_CLAUSE)),
        ArtifactKind::Insert | ArtifactKind::InsertSelective => {
            let fragments = generator.fragments()?;
            let id = if kind == ArtifactKind::InsertSelective {
                "insertSelective"
            } else {
                "insert"
            };
            let mut builder = ArtifactBuilder::element(kind, "insert")
                .attribute("id", id)
                .attribute("parameterType", record);

            if let Some(key) = table.generated_key() {
                if let Some(column) = table.column(&key.column) {
                    let key_property = names.property(column);
                    builder = match &key.strategy {
                        KeyStrategy::JdbcStandard => builder
                            .attribute("keyColumn", column.name.as_str())
                            .attribute("keyProperty", key_property)
                            .attribute("useGeneratedKeys", "true"),
                        KeyStrategy::Statement(statement) => builder
                            .line(format!(
                                "<selectKey keyProperty=\"{}\" order=\"AFTER\" resultType=\"{}\">",
                                key_property,
                                fragments.host_type(column).fully_qualified()
                            ))
                            .line(format!("  {}", statement))
                            .line("</selectKey>"),
                    };
                }
            }

            if kind == ArtifactKind::Insert {
                builder.lines(
                    Insert::into_table(table_name)
                        .values(fragments.insert_values())
                        .build_lines(),
                )
            } else {
                let columns: Vec<_> = table.columns().iter().collect();
                let column_names =
                    selective_lines(&fragments, &columns, None, |c| format!("{},", c.name));
                let values = selective_lines(&fragments, &columns, None, |c| {
                    format!("{},", fragments.parameter_clause(c, None))
                });
                builder
                    .line(format!("insert into {}", table_name))
                    .line("<trim prefix=\"(\" suffix=\")\" suffixOverrides=\",\">")
                    .lines(indent(column_names))
                    .line("</trim>")
                    .line("<trim prefix=\"values (\" suffix=\")\" suffixOverrides=\",\">")
                    .lines(indent(values))
                    .line("</trim>")
            }
        }
        ArtifactKind::UpdateByExampleSelective => {
            let fragments = generator.fragments()?;
            let columns = fragments.example_update_columns(true);
            let sets = selective_lines(&fragments, &columns, Some("row."), |c| {
                format!("{} = {},", c.name, fragments.parameter_clause(c, Some("row.")))
            });
            ArtifactBuilder::element(kind, "update")
                .attribute("id", "updateByExampleSelective")
                .attribute("parameterType", "map")
                .line(format!("update {}", table_name))
                .line("<set>")
                .lines(indent(sets))
                .line("</set>")
                .lines(conditional_include("example != null", UPDATE_BY_EXAMPLE_WHERE_CLAUSE))
        }
        ArtifactKind::UpdateByExample | ArtifactKind::UpdateByExampleWithBlobs => {
            let fragments = generator.fragments()?;
            let with_blobs = kind == ArtifactKind::UpdateByExampleWithBlobs;
            let id = if with_blobs {
                "updateByExampleWithBLOBs"
            } else {
                "updateByExample"
            };
            let columns = fragments.example_update_columns(with_blobs);
            let statement =
                Update::table(table_name).set(fragments.set_assignments(&columns, Some("row.")));
            ArtifactBuilder::element(kind, "update")
                .attribute("id", id)
                .attribute("parameterType", "map")
                .lines(statement.build_lines())
                .lines(conditional_include("example != null", UPDATE_BY_EXAMPLE_WHERE_CLAUSE))
        }
        ArtifactKind::UpdateByPrimaryKeySelective => {
            let fragments = generator.fragments()?;
            let predicate = match fragments.primary_key_predicate(None) {
                Some(predicate) => predicate,
                None => return Ok(None),
            };
            let columns = fragments.update_columns(true);
            let sets = selective_lines(&fragments, &columns, None, |c| {
                format!("{} = {},", c.name, fragments.parameter_clause(c, None))
            });
            ArtifactBuilder::element(kind, "update")
                .attribute("id", "updateByPrimaryKeySelective")
                .attribute("parameterType", record)
                .line(format!("update {}", table_name))
                .line("<set>")
                .lines(indent(sets))
                .line("</set>")
                .lines(predicate.build_lines())
        }
        ArtifactKind::UpdateByPrimaryKeyWithoutBlobs | ArtifactKind::UpdateByPrimaryKeyWithBlobs => {
            let fragments = generator.fragments()?;
            let with_blobs = kind == ArtifactKind::UpdateByPrimaryKeyWithBlobs;
            let id = if with_blobs {
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
            ArtifactBuilder::element(kind, "update")
                .attribute("id", id)
                .attribute("parameterType", record)
                .lines(statement.build_lines())
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
