use std::sync::Arc;

use crate::model::TableModel;
use crate::traits::Plugin;
use crate::types::{CandidateArtifact, OutputContainer};

/// Ordered chain of plugins.
///
/// Every plugin runs for every hook, in registration order, and sees the
/// mutations made by the plugins before it. The answer is the AND of all
/// plugin answers, so one rejection discards the item while later plugins
/// still observe it.
#[derive(Clone, Default)]
pub struct PluginAggregator {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, plugin: Arc<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    pub fn with_plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.add(plugin);
        self
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn artifact_generated(
        &self,
        candidate: &mut CandidateArtifact,
        container: &OutputContainer,
        table: &TableModel,
    ) -> bool {
        let mut keep = true;
        for plugin in &self.plugins {
            if !plugin.artifact_generated(candidate, container, table) {
                log::debug!(
                    "Plugin {} rejected {} in {}",
                    plugin.name(),
                    candidate.kind().hook_name(),
                    container.type_name()
                );
                keep = false;
            }
        }
        keep
    }

    pub fn container_generated(&self, container: &mut OutputContainer, table: &TableModel) -> bool {
        let mut keep = true;
        for plugin in &self.plugins {
            if !plugin.container_generated(container, table) {
                log::debug!(
                    "Plugin {} rejected {} for {}",
                    plugin.name(),
                    container.kind().hook_name(),
                    container.type_name()
                );
                keep = false;
            }
        }
        keep
    }
}

impl std::fmt::Debug for PluginAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.plugins.iter().map(|p| p.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::ArtifactBuilder;
    use crate::generators::ArtifactKind;
    use crate::model::ColumnModel;
    use crate::plugins::RecordingPlugin;
    use crate::types::ContainerKind;

    struct Renamer;

    impl Plugin for Renamer {
        fn name(&self) -> &str {
            "renamer"
        }

        fn artifact_generated(
            &self,
            candidate: &mut CandidateArtifact,
            _container: &OutputContainer,
            _table: &TableModel,
        ) -> bool {
            candidate.signature_mut().name = "renamed".to_string();
            true
        }
    }

    fn table() -> TableModel {
        TableModel::builder("orders", "Order")
            .column(ColumnModel::new("id", "id", "INTEGER"))
            .build()
    }

    #[test]
    fn test_every_plugin_runs_after_a_rejection() {
        let vetoing = Arc::new(RecordingPlugin::new().veto(ArtifactKind::GeneralCount));
        let observing = Arc::new(RecordingPlugin::new());
        let aggregator = PluginAggregator::new()
            .with_plugin(vetoing.clone())
            .with_plugin(observing.clone());

        let container = OutputContainer::new(ContainerKind::MapperInterface, "OrderMapper");
        let mut candidate = ArtifactBuilder::operation(ArtifactKind::GeneralCount, "count").build();

        assert!(!aggregator.artifact_generated(&mut candidate, &container, &table()));
        vetoing.assert_hook_count("clientGeneralCountMethodGenerated", 1);
        observing.assert_hook_count("clientGeneralCountMethodGenerated", 1);
    }

    #[test]
    fn test_mutations_are_visible_to_later_plugins() {
        let observing = Arc::new(RecordingPlugin::new());
        let aggregator = PluginAggregator::new()
            .with_plugin(Arc::new(Renamer))
            .with_plugin(observing.clone());

        let container = OutputContainer::new(ContainerKind::MapperInterface, "OrderMapper");
        let mut candidate = ArtifactBuilder::operation(ArtifactKind::GeneralCount, "count").build();

        assert!(aggregator.artifact_generated(&mut candidate, &container, &table()));
        assert_eq!(candidate.signature().name, "renamed");
        assert_eq!(observing.recorded_hooks()[0].artifact_name.as_deref(), Some("renamed"));
    }

    #[test]
    fn test_empty_chain_keeps_everything() {
        let aggregator = PluginAggregator::new();
        let mut container = OutputContainer::new(ContainerKind::SqlProvider, "OrderSqlProvider");

        assert!(aggregator.is_empty());
        assert!(aggregator.container_generated(&mut container, &table()));
    }
}
