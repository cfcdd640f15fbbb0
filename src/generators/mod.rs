//! Artifact generators: one per artifact kind, dispatched by dialect.

mod annotated;
mod dynamic_sql;
mod kotlin;
mod provider;
mod xml;

use std::fmt;

use crate::config::Dialect;
use crate::context::GenerationContext;
use crate::error::{GenError, Result};
use crate::fragments::FragmentGenerator;
use crate::model::ColumnModel;
use crate::rules;
use crate::types::{CandidateArtifact, OutputContainer};

/// Every artifact the engine knows how to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactKind {
    // Low-level mapper operations of the dynamic SQL dialects
    BasicInsert,
    BasicInsertMultiple,
    BasicSelectMany,
    BasicSelectOne,
    // DSL operations
    GeneralCount,
    GeneralDelete,
    GeneralSelect,
    GeneralSelectDistinct,
    GeneralSelectOne,
    GeneralUpdate,
    UpdateAllColumns,
    UpdateSelectiveColumns,
    SelectList,
    // Operations common to several dialects
    Insert,
    InsertMultiple,
    InsertSelective,
    SelectByPrimaryKey,
    DeleteByPrimaryKey,
    UpdateByPrimaryKey,
    UpdateByPrimaryKeySelective,
    UpdateByPrimaryKeyWithoutBlobs,
    UpdateByPrimaryKeyWithBlobs,
    // Example-driven operations
    CountByExample,
    DeleteByExample,
    SelectByExample,
    SelectByExampleWithBlobs,
    UpdateByExample,
    UpdateByExampleWithBlobs,
    UpdateByExampleSelective,
    // Shared markup elements
    ResultMap,
    ResultMapWithBlobs,
    ExampleWhereClause,
    UpdateByExampleWhereClause,
    BaseColumnList,
    BlobColumnList,
    // Support declarations
    SupportTable,
    SupportColumn,
    // SQL provider methods
    ProviderCountByExample,
    ProviderDeleteByExample,
    ProviderInsertSelective,
    ProviderSelectByExample,
    ProviderSelectByExampleWithBlobs,
    ProviderUpdateByExample,
    ProviderUpdateByExampleWithBlobs,
    ProviderUpdateByExampleSelective,
    ProviderUpdateByPrimaryKeySelective,
    ProviderApplyWhere,
}

impl ArtifactKind {
    /// Name of the plugin hook that candidates of this kind pass through.
    pub fn hook_name(&self) -> &'static str {
        use ArtifactKind::*;

        match self {
            BasicInsert => "clientBasicInsertMethodGenerated",
            BasicInsertMultiple => "clientBasicInsertMultipleMethodGenerated",
            BasicSelectMany => "clientBasicSelectManyMethodGenerated",
            BasicSelectOne => "clientBasicSelectOneMethodGenerated",
            GeneralCount => "clientGeneralCountMethodGenerated",
            GeneralDelete => "clientGeneralDeleteMethodGenerated",
            GeneralSelect => "clientGeneralSelectMethodGenerated",
            GeneralSelectDistinct => "clientGeneralSelectDistinctMethodGenerated",
            GeneralSelectOne => "clientSelectOneMethodGenerated",
            GeneralUpdate => "clientGeneralUpdateMethodGenerated",
            UpdateAllColumns => "clientUpdateAllColumnsMethodGenerated",
            UpdateSelectiveColumns => "clientUpdateSelectiveColumnsMethodGenerated",
            SelectList => "clientSelectListFieldGenerated",
            Insert => "clientInsertMethodGenerated",
            InsertMultiple => "clientInsertMultipleMethodGenerated",
            InsertSelective => "clientInsertSelectiveMethodGenerated",
            SelectByPrimaryKey => "clientSelectByPrimaryKeyMethodGenerated",
            DeleteByPrimaryKey => "clientDeleteByPrimaryKeyMethodGenerated",
            UpdateByPrimaryKey => "clientUpdateByPrimaryKeyMethodGenerated",
            UpdateByPrimaryKeySelective => "clientUpdateByPrimaryKeySelectiveMethodGenerated",
            UpdateByPrimaryKeyWithoutBlobs => "clientUpdateByPrimaryKeyWithoutBLOBsMethodGenerated",
            UpdateByPrimaryKeyWithBlobs => "clientUpdateByPrimaryKeyWithBLOBsMethodGenerated",
            CountByExample => "clientCountByExampleMethodGenerated",
            DeleteByExample => "clientDeleteByExampleMethodGenerated",
            SelectByExample => "clientSelectByExampleWithoutBLOBsMethodGenerated",
            SelectByExampleWithBlobs => "clientSelectByExampleWithBLOBsMethodGenerated",
            UpdateByExample => "clientUpdateByExampleWithoutBLOBsMethodGenerated",
            UpdateByExampleWithBlobs => "clientUpdateByExampleWithBLOBsMethodGenerated",
            UpdateByExampleSelective => "clientUpdateByExampleSelectiveMethodGenerated",
            ResultMap => "sqlMapResultMapWithoutBLOBsElementGenerated",
            ResultMapWithBlobs => "sqlMapResultMapWithBLOBsElementGenerated",
            ExampleWhereClause => "sqlMapExampleWhereClauseElementGenerated",
            UpdateByExampleWhereClause => "sqlMapUpdateByExampleWhereClauseElementGenerated",
            BaseColumnList => "sqlMapBaseColumnListElementGenerated",
            BlobColumnList => "sqlMapBlobColumnListElementGenerated",
            SupportTable => "dynamicSqlSupportTableGenerated",
            SupportColumn => "dynamicSqlSupportColumnGenerated",
            ProviderCountByExample => "providerCountByExampleMethodGenerated",
            ProviderDeleteByExample => "providerDeleteByExampleMethodGenerated",
            ProviderInsertSelective => "providerInsertSelectiveMethodGenerated",
            ProviderSelectByExample => "providerSelectByExampleWithoutBLOBsMethodGenerated",
            ProviderSelectByExampleWithBlobs => "providerSelectByExampleWithBLOBsMethodGenerated",
            ProviderUpdateByExample => "providerUpdateByExampleWithoutBLOBsMethodGenerated",
            ProviderUpdateByExampleWithBlobs => "providerUpdateByExampleWithBLOBsMethodGenerated",
            ProviderUpdateByExampleSelective => "providerUpdateByExampleSelectiveMethodGenerated",
            ProviderUpdateByPrimaryKeySelective => {
                "providerUpdateByPrimaryKeySelectiveMethodGenerated"
            }
            ProviderApplyWhere => "providerApplyWhereMethodGenerated",
        }
    }

    /// Kinds whose bodies are built from shared fragments.
    pub fn requires_fragments(&self) -> bool {
        !matches!(
            self,
            ArtifactKind::ExampleWhereClause
                | ArtifactKind::UpdateByExampleWhereClause
                | ArtifactKind::ProviderApplyWhere
        )
    }

    /// Methods of the SQL provider class that backs an annotated mapper.
    pub fn is_provider_method(&self) -> bool {
        use ArtifactKind::*;

        matches!(
            self,
            ProviderCountByExample
                | ProviderDeleteByExample
                | ProviderInsertSelective
                | ProviderSelectByExample
                | ProviderSelectByExampleWithBlobs
                | ProviderUpdateByExample
                | ProviderUpdateByExampleWithBlobs
                | ProviderUpdateByExampleSelective
                | ProviderUpdateByPrimaryKeySelective
                | ProviderApplyWhere
        )
    }

    /// True when `dialect` has a generator for this kind.
    pub fn offered_by(&self, dialect: Dialect) -> bool {
        use ArtifactKind::*;

        match dialect {
            Dialect::DynamicSql | Dialect::Kotlin => matches!(
                self,
                BasicInsert
                    | BasicInsertMultiple
                    | BasicSelectMany
                    | BasicSelectOne
                    | GeneralCount
                    | GeneralDelete
                    | GeneralSelect
                    | GeneralSelectDistinct
                    | GeneralSelectOne
                    | GeneralUpdate
                    | UpdateAllColumns
                    | UpdateSelectiveColumns
                    | SelectList
                    | Insert
                    | InsertMultiple
                    | InsertSelective
                    | SelectByPrimaryKey
                    | DeleteByPrimaryKey
                    | UpdateByPrimaryKey
                    | UpdateByPrimaryKeySelective
                    | SupportTable
                    | SupportColumn
            ),
            Dialect::XmlMapper => matches!(
                self,
                ResultMap
                    | ResultMapWithBlobs
                    | ExampleWhereClause
                    | UpdateByExampleWhereClause
                    | BaseColumnList
                    | BlobColumnList
                    | SelectByExample
                    | SelectByExampleWithBlobs
                    | SelectByPrimaryKey
                    | DeleteByPrimaryKey
                    | DeleteByExample
                    | Insert
                    | InsertSelective
                    | CountByExample
                    | UpdateByExampleSelective
                    | UpdateByExample
                    | UpdateByExampleWithBlobs
                    | UpdateByPrimaryKeySelective
                    | UpdateByPrimaryKeyWithoutBlobs
                    | UpdateByPrimaryKeyWithBlobs
            ),
            Dialect::AnnotatedMapper => matches!(
                self,
                CountByExample
                    | DeleteByExample
                    | DeleteByPrimaryKey
                    | Insert
                    | InsertSelective
                    | SelectByExample
                    | SelectByExampleWithBlobs
                    | SelectByPrimaryKey
                    | UpdateByExampleSelective
                    | UpdateByExample
                    | UpdateByExampleWithBlobs
                    | UpdateByPrimaryKeySelective
                    | UpdateByPrimaryKeyWithoutBlobs
                    | UpdateByPrimaryKeyWithBlobs
            ) || self.is_provider_method(),
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Produces, gates and commits one artifact kind.
/// Created through [`ArtifactGenerator::builder`].
#[derive(Debug, Clone, Copy)]
pub struct ArtifactGenerator<'a> {
    kind: ArtifactKind,
    fragments: Option<FragmentGenerator<'a>>,
    column: Option<&'a ColumnModel>,
    reuse_result_structure: bool,
    reuse_column_list: bool,
}

impl<'a> ArtifactGenerator<'a> {
    pub fn builder(kind: ArtifactKind) -> ArtifactGeneratorBuilder<'a> {
        ArtifactGeneratorBuilder {
            kind,
            fragments: None,
            column: None,
            reuse_result_structure: false,
            reuse_column_list: false,
        }
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    pub fn reuses_result_structure(&self) -> bool {
        self.reuse_result_structure
    }

    pub fn reuses_column_list(&self) -> bool {
        self.reuse_column_list
    }

    fn fragments(&self) -> Result<FragmentGenerator<'a>> {
        self.fragments.ok_or(GenError::MissingCollaborator {
            kind: self.kind,
            collaborator: "fragment generator",
        })
    }

    fn column(&self) -> Result<&'a ColumnModel> {
        self.column.ok_or(GenError::MissingCollaborator {
            kind: self.kind,
            collaborator: "column",
        })
    }

    /// Builds the candidate, or `None` when the kind does not apply to the table.
    pub fn produce(&self, ctx: &GenerationContext<'_>) -> Result<Option<CandidateArtifact>> {
        let dialect = ctx.profile().dialect;
        if !self.kind.offered_by(dialect) {
            return Err(GenError::UnsupportedArtifact {
                kind: self.kind,
                dialect,
            });
        }

        if !rules::applies(self.kind, ctx.table()) {
            log::trace!(
                "{} does not apply to {}",
                self.kind,
                ctx.table().table().qualified_name()
            );
            return Ok(None);
        }

        match dialect {
            Dialect::DynamicSql => dynamic_sql::produce(self, ctx),
            Dialect::Kotlin => kotlin::produce(self, ctx),
            Dialect::XmlMapper => xml::produce(self, ctx),
            Dialect::AnnotatedMapper if self.kind.is_provider_method() => {
                provider::produce(self, ctx)
            }
            Dialect::AnnotatedMapper => annotated::produce(self, ctx),
        }
    }

    /// Runs the candidate through the plugin chain.
    pub fn gate(
        &self,
        candidate: &mut CandidateArtifact,
        container: &OutputContainer,
        ctx: &GenerationContext<'_>,
    ) -> bool {
        ctx.plugins()
            .artifact_generated(candidate, container, ctx.table())
    }

    /// Produces, gates and, when accepted, commits the artifact to `container`.
    /// Returns whether an artifact was added.
    pub fn execute(
        &self,
        ctx: &GenerationContext<'_>,
        container: &mut OutputContainer,
    ) -> Result<bool> {
        let mut candidate = match self.produce(ctx)? {
            Some(candidate) => candidate,
            None => return Ok(false),
        };

        if !self.gate(&mut candidate, container, ctx) {
            log::debug!(
                "{} vetoed for {}",
                candidate.kind().hook_name(),
                container.type_name()
            );
            return Ok(false);
        }

        log::debug!(
            "{} accepted into {}",
            candidate.signature().name,
            container.type_name()
        );
        container.accept(candidate);
        Ok(true)
    }
}

/// Builder for [`ArtifactGenerator`].
/// Call `.build()` once every collaborator the kind needs has been supplied.
pub struct ArtifactGeneratorBuilder<'a> {
    kind: ArtifactKind,
    fragments: Option<FragmentGenerator<'a>>,
    column: Option<&'a ColumnModel>,
    reuse_result_structure: bool,
    reuse_column_list: bool,
}

impl<'a> ArtifactGeneratorBuilder<'a> {
    pub fn with_fragments(mut self, fragments: FragmentGenerator<'a>) -> Self {
        self.fragments = Some(fragments);
        self
    }

    /// The column a per-column artifact describes.
    pub fn for_column(mut self, column: &'a ColumnModel) -> Self {
        self.column = Some(column);
        self
    }

    /// Reference the shared result structure instead of declaring one inline.
    pub fn reuse_result_structure(mut self, reuse: bool) -> Self {
        self.reuse_result_structure = reuse;
        self
    }

    /// Include the shared column list instead of spelling the columns out.
    pub fn reuse_column_list(mut self, reuse: bool) -> Self {
        self.reuse_column_list = reuse;
        self
    }

    pub fn build(self) -> Result<ArtifactGenerator<'a>> {
        if self.kind.requires_fragments() && self.fragments.is_none() {
            return Err(GenError::MissingCollaborator {
                kind: self.kind,
                collaborator: "fragment generator",
            });
        }
        if self.kind == ArtifactKind::SupportColumn && self.column.is_none() {
            return Err(GenError::MissingCollaborator {
                kind: self.kind,
                collaborator: "column",
            });
        }

        Ok(ArtifactGenerator {
            kind: self.kind,
            fragments: self.fragments,
            column: self.column,
            reuse_result_structure: self.reuse_result_structure,
            reuse_column_list: self.reuse_column_list,
        })
    }
}

/// Prefixes the first line with `head`; used to open method chains.
fn chain(head: &str, lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                format!("{}{}", head, line)
            } else {
                line.clone()
            }
        })
        .collect()
}

/// Appends `suffix` to the last line.
fn terminate(mut lines: Vec<String>, suffix: &str) -> Vec<String> {
    if let Some(last) = lines.last_mut() {
        last.push_str(suffix);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NamingProfile;
    use crate::model::TableModel;
    use crate::plugins::{PluginAggregator, RecordingPlugin};
    use crate::traits::SilentProgress;
    use crate::types::ContainerKind;
    use std::sync::Arc;

    fn orders() -> TableModel {
        TableModel::builder("orders", "Order")
            .packages("com.example.model", "com.example.mapper")
            .column(ColumnModel::new("id", "id", "INTEGER"))
            .column(ColumnModel::new("order_date", "orderDate", "DATE"))
            .primary_key("id")
            .build()
    }

    #[test]
    fn test_build_without_fragments_is_a_fault() {
        let result = ArtifactGenerator::builder(ArtifactKind::Insert).build();

        match result {
            Err(GenError::MissingCollaborator { kind, collaborator }) => {
                assert_eq!(kind, ArtifactKind::Insert);
                assert_eq!(collaborator, "fragment generator");
            }
            other => panic!("expected missing collaborator, got {:?}", other),
        }
    }

    #[test]
    fn test_fixed_template_kinds_need_no_fragments() {
        assert!(ArtifactGenerator::builder(ArtifactKind::ExampleWhereClause)
            .build()
            .is_ok());
    }

    #[test]
    fn test_unsupported_kind_for_dialect_is_a_fault() {
        let table = orders();
        let profile = NamingProfile::new(Dialect::XmlMapper);
        let plugins = PluginAggregator::new();
        let ctx = GenerationContext::new(&table, &profile, &plugins, &SilentProgress);

        let generator = ArtifactGenerator::builder(ArtifactKind::GeneralCount)
            .with_fragments(ctx.fragments())
            .build()
            .expect("generator");

        assert!(matches!(
            generator.produce(&ctx),
            Err(GenError::UnsupportedArtifact {
                kind: ArtifactKind::GeneralCount,
                dialect: Dialect::XmlMapper,
            })
        ));
    }

    #[test]
    fn test_execute_respects_rules_and_plugins() {
        let table = TableModel::builder("orders", "Order")
            .column(ColumnModel::new("id", "id", "INTEGER"))
            .build();
        let profile = NamingProfile::new(Dialect::DynamicSql);
        let recorder = Arc::new(RecordingPlugin::new().veto(ArtifactKind::GeneralCount));
        let plugins = PluginAggregator::new().with_plugin(recorder.clone());
        let ctx = GenerationContext::new(&table, &profile, &plugins, &SilentProgress);
        let mut container = OutputContainer::new(ContainerKind::MapperInterface, "OrderMapper");

        let by_key = ArtifactGenerator::builder(ArtifactKind::DeleteByPrimaryKey)
            .with_fragments(ctx.fragments())
            .build()
            .expect("generator");
        assert!(!by_key.execute(&ctx, &mut container).expect("execute"));
        recorder.assert_hook_count("clientDeleteByPrimaryKeyMethodGenerated", 0);

        let count = ArtifactGenerator::builder(ArtifactKind::GeneralCount)
            .with_fragments(ctx.fragments())
            .build()
            .expect("generator");
        assert!(!count.execute(&ctx, &mut container).expect("execute"));
        recorder.assert_hook_called("clientGeneralCountMethodGenerated");

        let delete = ArtifactGenerator::builder(ArtifactKind::GeneralDelete)
            .with_fragments(ctx.fragments())
            .build()
            .expect("generator");
        assert!(delete.execute(&ctx, &mut container).expect("execute"));
        assert_eq!(container.len(), 1);
        assert!(container.has_marker("CommonDeleteMapper"));
    }
}
