//! One table run: validate the model, run each dialect's generators in their
//! fixed order, then drop containers that came out empty or were vetoed.

use crate::config::{Dialect, NamingProfile, ROOT_INTERFACE};
use crate::context::GenerationContext;
use crate::error::Result;
use crate::generators::{ArtifactGenerator, ArtifactGeneratorBuilder, ArtifactKind};
use crate::model::TableModel;
use crate::plugins::PluginAggregator;
use crate::traits::ProgressCallback;
use crate::types::{ContainerKind, Marker, OutputContainer, TypeName};

use ArtifactKind::*;

/// The dynamic SQL client catalogue, shared by the Java and Kotlin dialects.
/// `BasicSelectOne` is run separately so it can learn whether `BasicSelectMany`
/// was accepted.
const DSL_HEAD: [ArtifactKind; 3] = [BasicInsert, BasicInsertMultiple, BasicSelectMany];
const DSL_TAIL: [ArtifactKind; 16] = [
    GeneralCount,
    GeneralDelete,
    DeleteByPrimaryKey,
    Insert,
    InsertMultiple,
    InsertSelective,
    SelectList,
    GeneralSelectOne,
    GeneralSelect,
    GeneralSelectDistinct,
    SelectByPrimaryKey,
    GeneralUpdate,
    UpdateAllColumns,
    UpdateSelectiveColumns,
    UpdateByPrimaryKey,
    UpdateByPrimaryKeySelective,
];

const PROVIDER_BY_EXAMPLE: [ArtifactKind; 7] = [
    ProviderCountByExample,
    ProviderDeleteByExample,
    ProviderSelectByExampleWithBlobs,
    ProviderSelectByExample,
    ProviderUpdateByExampleSelective,
    ProviderUpdateByExampleWithBlobs,
    ProviderUpdateByExample,
];

/// Generates every output container for one table.
///
/// The table is validated before any container is created. Containers with
/// no accepted artifacts are omitted; the rest pass through the container
/// hook and are dropped if a plugin rejects them.
pub fn assemble(
    table: &TableModel,
    profile: &NamingProfile,
    plugins: &PluginAggregator,
    progress: &dyn ProgressCallback,
) -> Result<Vec<OutputContainer>> {
    table.validate()?;

    let ctx = GenerationContext::new(table, profile, plugins, progress);
    let table_name = table.table().qualified_name();
    progress.start_task(&format!(
        "Generating {} artifacts for table {}",
        profile.dialect, table_name
    ));

    let containers = match profile.dialect {
        Dialect::DynamicSql => dynamic_sql(
            &ctx,
            ContainerKind::MapperInterface,
            ContainerKind::SupportClass,
        )?,
        Dialect::Kotlin => dynamic_sql(
            &ctx,
            ContainerKind::KotlinMapperFile,
            ContainerKind::KotlinSupportFile,
        )?,
        Dialect::XmlMapper => vec![xml_document(&ctx)?],
        Dialect::AnnotatedMapper => {
            let mapper = annotated_mapper(&ctx)?;
            progress.start_task(&format!("Generating SQL provider for table {}", table_name));
            vec![mapper, sql_provider(&ctx)?]
        }
    };

    Ok(finish(&ctx, containers))
}

/// Runs one kind with the run's fragment generator attached.
fn run(
    ctx: &GenerationContext<'_>,
    container: &mut OutputContainer,
    kind: ArtifactKind,
) -> Result<bool> {
    run_with(ctx, container, ArtifactGenerator::builder(kind))
}

fn run_with<'c>(
    ctx: &'c GenerationContext<'_>,
    container: &mut OutputContainer,
    builder: ArtifactGeneratorBuilder<'c>,
) -> Result<bool> {
    builder
        .with_fragments(ctx.fragments())
        .build()?
        .execute(ctx, container)
}

fn run_all(
    ctx: &GenerationContext<'_>,
    container: &mut OutputContainer,
    kinds: &[ArtifactKind],
) -> Result<()> {
    for kind in kinds {
        run(ctx, container, *kind)?;
    }
    Ok(())
}

fn add_root_interface(ctx: &GenerationContext<'_>, container: &mut OutputContainer) {
    if let Some(root) = ctx.table().property(ROOT_INTERFACE) {
        container.add_marker(Marker::new(&TypeName::new(root)));
    }
}

fn dynamic_sql(
    ctx: &GenerationContext<'_>,
    mapper_kind: ContainerKind,
    support_kind: ContainerKind,
) -> Result<Vec<OutputContainer>> {
    let names = ctx.names();

    let mut mapper = OutputContainer::new(mapper_kind, names.mapper().fully_qualified());
    add_root_interface(ctx, &mut mapper);
    run_all(ctx, &mut mapper, &DSL_HEAD)?;
    let reuse = ctx.profile().reuse_result_structures && mapper.contains(BasicSelectMany);
    run_with(
        ctx,
        &mut mapper,
        ArtifactGenerator::builder(BasicSelectOne).reuse_result_structure(reuse),
    )?;
    run_all(ctx, &mut mapper, &DSL_TAIL)?;

    ctx.progress().start_task(&format!(
        "Generating support declarations for table {}",
        ctx.table().table().qualified_name()
    ));
    let mut support = OutputContainer::new(support_kind, names.support().fully_qualified());
    run(ctx, &mut support, SupportTable)?;
    for column in ctx.table().columns() {
        run_with(
            ctx,
            &mut support,
            ArtifactGenerator::builder(SupportColumn).for_column(column),
        )?;
    }

    Ok(vec![mapper, support])
}

fn xml_document(ctx: &GenerationContext<'_>) -> Result<OutputContainer> {
    let mapper_type = ctx.names().mapper().fully_qualified();
    let mut document = OutputContainer::new(ContainerKind::MapperDocument, mapper_type);
    document.add_attribute("namespace", mapper_type);

    run(ctx, &mut document, ResultMap)?;
    let base_map = document.contains(ResultMap);
    run_with(
        ctx,
        &mut document,
        ArtifactGenerator::builder(ResultMapWithBlobs).reuse_result_structure(base_map),
    )?;
    let blob_map = document.contains(ResultMapWithBlobs);

    run_all(
        ctx,
        &mut document,
        &[ExampleWhereClause, UpdateByExampleWhereClause, BaseColumnList, BlobColumnList],
    )?;
    let base_list = document.contains(BaseColumnList);
    let blob_list = base_list && document.contains(BlobColumnList);

    let select = |kind: ArtifactKind, with_blobs: bool| {
        let (result_map, column_list) = if with_blobs {
            (blob_map, blob_list)
        } else {
            (base_map, base_list)
        };
        ArtifactGenerator::builder(kind)
            .reuse_result_structure(result_map)
            .reuse_column_list(column_list)
    };
    let has_blobs = ctx.table().has_blob_columns();
    run_with(ctx, &mut document, select(SelectByExampleWithBlobs, true))?;
    run_with(ctx, &mut document, select(SelectByExample, false))?;
    run_with(ctx, &mut document, select(SelectByPrimaryKey, has_blobs))?;

    run_all(
        ctx,
        &mut document,
        &[
            DeleteByPrimaryKey,
            DeleteByExample,
            Insert,
            InsertSelective,
            CountByExample,
            UpdateByExampleSelective,
            UpdateByExampleWithBlobs,
            UpdateByExample,
            UpdateByPrimaryKeySelective,
            UpdateByPrimaryKeyWithBlobs,
            UpdateByPrimaryKeyWithoutBlobs,
        ],
    )?;

    Ok(document)
}

fn annotated_mapper(ctx: &GenerationContext<'_>) -> Result<OutputContainer> {
    let mut mapper = OutputContainer::new(
        ContainerKind::MapperInterface,
        ctx.names().mapper().fully_qualified(),
    );
    add_root_interface(ctx, &mut mapper);

    run_all(
        ctx,
        &mut mapper,
        &[
            CountByExample,
            DeleteByExample,
            DeleteByPrimaryKey,
            Insert,
            InsertSelective,
            SelectByExampleWithBlobs,
            SelectByExample,
        ],
    )?;
    let shared = if ctx.table().has_blob_columns() {
        SelectByExampleWithBlobs
    } else {
        SelectByExample
    };
    let reuse = ctx.profile().reuse_result_structures && mapper.contains(shared);
    run_with(
        ctx,
        &mut mapper,
        ArtifactGenerator::builder(SelectByPrimaryKey).reuse_result_structure(reuse),
    )?;
    run_all(
        ctx,
        &mut mapper,
        &[
            UpdateByExampleSelective,
            UpdateByExampleWithBlobs,
            UpdateByExample,
            UpdateByPrimaryKeySelective,
            UpdateByPrimaryKeyWithBlobs,
            UpdateByPrimaryKeyWithoutBlobs,
        ],
    )?;

    Ok(mapper)
}

fn sql_provider(ctx: &GenerationContext<'_>) -> Result<OutputContainer> {
    let mut provider = OutputContainer::new(
        ContainerKind::SqlProvider,
        ctx.names().provider().fully_qualified(),
    );

    run_all(
        ctx,
        &mut provider,
        &[
            ProviderCountByExample,
            ProviderDeleteByExample,
            ProviderInsertSelective,
            ProviderSelectByExampleWithBlobs,
            ProviderSelectByExample,
            ProviderUpdateByExampleSelective,
            ProviderUpdateByExampleWithBlobs,
            ProviderUpdateByExample,
            ProviderUpdateByPrimaryKeySelective,
        ],
    )?;

    if PROVIDER_BY_EXAMPLE.iter().any(|kind| provider.contains(*kind)) {
        run(ctx, &mut provider, ProviderApplyWhere)?;
    }

    Ok(provider)
}

fn finish(ctx: &GenerationContext<'_>, containers: Vec<OutputContainer>) -> Vec<OutputContainer> {
    let plugins = ctx.plugins();
    containers
        .into_iter()
        .filter_map(|mut container| {
            if container.is_empty() {
                log::debug!("Omitting empty container {}", container.type_name());
                return None;
            }
            if !plugins.container_generated(&mut container, ctx.table()) {
                log::debug!(
                    "{} vetoed {}",
                    container.kind().hook_name(),
                    container.type_name()
                );
                return None;
            }
            Some(container)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColumnModel, GeneratedKey};
    use crate::plugins::RecordingPlugin;
    use crate::traits::SilentProgress;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct CollectingProgress {
        messages: Mutex<Vec<String>>,
    }

    impl ProgressCallback for CollectingProgress {
        fn start_task(&self, message: &str) {
            self.messages
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(message.to_string());
        }
    }

    fn orders() -> TableModel {
        TableModel::builder("orders", "Order")
            .packages("com.example.model", "com.example.mapper")
            .column(ColumnModel::new("id", "id", "INTEGER").identity())
            .column(ColumnModel::new("order_date", "orderDate", "DATE"))
            .column(ColumnModel::new("notes", "notes", "LONGVARCHAR"))
            .primary_key("id")
            .generated_key(GeneratedKey::jdbc_standard("id"))
            .build()
    }

    fn assemble_with(
        table: &TableModel,
        dialect: Dialect,
        plugins: &PluginAggregator,
    ) -> Vec<OutputContainer> {
        assemble(table, &NamingProfile::new(dialect), plugins, &SilentProgress)
            .expect("assemble")
    }

    #[test]
    fn test_malformed_table_fails_before_generation() {
        let table = TableModel::builder("orders", "Order")
            .column(ColumnModel::new("id", "id", "INTEGER"))
            .primary_key("missing")
            .build();
        let recorder = Arc::new(RecordingPlugin::new());
        let plugins = PluginAggregator::new().with_plugin(recorder.clone());

        let result = assemble(
            &table,
            &NamingProfile::new(Dialect::DynamicSql),
            &plugins,
            &SilentProgress,
        );

        assert!(result.is_err());
        assert!(recorder.recorded_hooks().is_empty());
    }

    #[test]
    fn test_dynamic_sql_order_and_markers() {
        let containers = assemble_with(&orders(), Dialect::DynamicSql, &PluginAggregator::new());
        assert_eq!(containers.len(), 2);

        let mapper = &containers[0];
        assert_eq!(mapper.kind(), ContainerKind::MapperInterface);
        assert_eq!(mapper.artifacts()[0].kind(), BasicInsert);
        assert!(mapper.has_marker("CommonCountMapper"));
        assert!(mapper.has_marker("CommonDeleteMapper"));
        assert!(mapper.has_marker("CommonUpdateMapper"));
        // A generated key means inserts go through the basic insert instead.
        assert!(!mapper.has_marker("CommonInsertMapper<Order>"));

        let support = &containers[1];
        assert_eq!(support.kind(), ContainerKind::SupportClass);
        assert_eq!(support.len(), 4);
    }

    #[test]
    fn test_root_interface_marker() {
        let table = TableModel::builder("orders", "Order")
            .packages("com.example.model", "com.example.mapper")
            .column(ColumnModel::new("id", "id", "INTEGER"))
            .property(ROOT_INTERFACE, "com.example.BaseMapper")
            .build();

        let containers = assemble_with(&table, Dialect::Kotlin, &PluginAggregator::new());

        assert!(containers[0].has_marker("BaseMapper"));
        assert!(containers[0].references().has_import("com.example.BaseMapper"));
        assert!(containers[0].has_marker("CommonInsertMapper<Order>"));
    }

    #[test]
    fn test_vetoed_container_is_dropped() {
        let recorder =
            Arc::new(RecordingPlugin::new().veto_container(ContainerKind::SupportClass));
        let plugins = PluginAggregator::new().with_plugin(recorder.clone());

        let containers = assemble_with(&orders(), Dialect::DynamicSql, &plugins);

        assert_eq!(containers.len(), 1);
        assert_eq!(containers[0].kind(), ContainerKind::MapperInterface);
        recorder.assert_hook_called("dynamicSqlSupportGenerated");
    }

    #[test]
    fn test_xml_selects_reuse_only_accepted_elements() {
        let recorder = Arc::new(RecordingPlugin::new().veto(BaseColumnList));
        let plugins = PluginAggregator::new().with_plugin(recorder);

        let containers = assemble_with(&orders(), Dialect::XmlMapper, &plugins);
        let document = &containers[0];
        assert_eq!(document.attribute("namespace"), Some("com.example.mapper.OrderMapper"));

        let select = document
            .artifacts_of(SelectByExample)
            .next()
            .expect("select by example");
        assert_eq!(select.signature().attribute("resultMap"), Some("BaseResultMap"));
        assert!(select.body().contains(&"id, order_date".to_string()));

        let blob_map = document
            .artifacts_of(ResultMapWithBlobs)
            .next()
            .expect("blob result map");
        assert_eq!(blob_map.signature().attribute("extends"), Some("BaseResultMap"));
    }

    #[test]
    fn test_provider_apply_where_follows_by_example_methods() {
        let containers =
            assemble_with(&orders(), Dialect::AnnotatedMapper, &PluginAggregator::new());
        let provider = &containers[1];
        assert_eq!(provider.kind(), ContainerKind::SqlProvider);
        assert!(provider.contains(ProviderApplyWhere));

        let mut rules = crate::model::TableRules::default();
        rules.count_by_example = false;
        rules.delete_by_example = false;
        rules.select_by_example = false;
        rules.update_by_example = false;
        let table = TableModel::builder("orders", "Order")
            .packages("com.example.model", "com.example.mapper")
            .column(ColumnModel::new("id", "id", "INTEGER"))
            .column(ColumnModel::new("order_date", "orderDate", "DATE"))
            .primary_key("id")
            .rules(rules)
            .build();

        let containers =
            assemble_with(&table, Dialect::AnnotatedMapper, &PluginAggregator::new());
        let provider = containers
            .iter()
            .find(|c| c.kind() == ContainerKind::SqlProvider)
            .expect("provider");
        assert!(!provider.contains(ProviderApplyWhere));
        assert!(provider.contains(ProviderInsertSelective));
    }

    #[test]
    fn test_progress_reports_each_container_phase() {
        for dialect in [Dialect::DynamicSql, Dialect::Kotlin, Dialect::AnnotatedMapper] {
            let progress = CollectingProgress::default();
            assemble(
                &orders(),
                &NamingProfile::new(dialect),
                &PluginAggregator::new(),
                &progress,
            )
            .expect("assemble");

            let messages = progress.messages.lock().expect("messages");
            assert_eq!(messages.len(), 2, "{} phases: {:?}", dialect, messages);
        }
    }

    #[test]
    fn test_markup_update_by_key_follows_base_columns() {
        let docs = TableModel::builder("docs", "Doc")
            .packages("com.example.model", "com.example.mapper")
            .column(ColumnModel::new("id", "id", "INTEGER"))
            .column(ColumnModel::new("body", "body", "CLOB"))
            .primary_key("id")
            .build();

        for dialect in [Dialect::XmlMapper, Dialect::AnnotatedMapper] {
            let containers = assemble_with(&docs, dialect, &PluginAggregator::new());
            assert!(!containers[0].contains(UpdateByPrimaryKeyWithoutBlobs));
            assert!(containers[0].contains(UpdateByPrimaryKeyWithBlobs));
        }
    }

    #[test]
    fn test_no_update_by_key_when_only_generated_columns_remain() {
        let versioned = TableModel::builder("t", "T")
            .packages("com.example.model", "com.example.mapper")
            .column(ColumnModel::new("id", "id", "INTEGER"))
            .column(ColumnModel::new("ver", "ver", "INTEGER").generated_always())
            .primary_key("id")
            .build();

        for dialect in [
            Dialect::DynamicSql,
            Dialect::Kotlin,
            Dialect::XmlMapper,
            Dialect::AnnotatedMapper,
        ] {
            let containers = assemble_with(&versioned, dialect, &PluginAggregator::new());
            for container in &containers {
                for kind in [
                    UpdateByPrimaryKey,
                    UpdateByPrimaryKeySelective,
                    UpdateByPrimaryKeyWithoutBlobs,
                    ProviderUpdateByPrimaryKeySelective,
                ] {
                    assert!(!container.contains(kind), "{} emitted {}", dialect, kind);
                }
            }
            assert!(containers[0].contains(DeleteByPrimaryKey));
        }
    }
}
