use std::sync::Arc;

use crate::assembler;
use crate::config::NamingProfile;
use crate::error::{GenError, Result};
use crate::model::TableModel;
use crate::plugins::PluginAggregator;
use crate::traits::{LogProgress, Plugin, ProgressCallback};
use crate::types::OutputContainer;

/// Main entry point for mappergen.
/// Holds a naming profile, the plugin chain and a progress sink, and runs
/// table generation against them. Cloning is cheap; clones share everything.
#[derive(Clone)]
pub struct MapperGenerator {
    profile: Arc<NamingProfile>,
    plugins: Arc<PluginAggregator>,
    progress: Arc<dyn ProgressCallback>,
}

impl MapperGenerator {
    /// Create a generator with no plugins that reports progress through `log`.
    ///
    /// # Example
    /// ```
    /// use mappergen::{Dialect, MapperGenerator, NamingProfile};
    ///
    /// let generator = MapperGenerator::new(NamingProfile::new(Dialect::DynamicSql));
    /// assert_eq!(generator.profile().dialect, Dialect::DynamicSql);
    /// ```
    pub fn new(profile: NamingProfile) -> Self {
        Self {
            profile: Arc::new(profile),
            plugins: Arc::new(PluginAggregator::new()),
            progress: Arc::new(LogProgress),
        }
    }

    /// Create a generator from a JSON naming profile.
    pub fn from_json(profile: &str) -> Result<Self> {
        Ok(Self::new(NamingProfile::from_json(profile)?))
    }

    /// Append a plugin to the chain. Plugins run in the order they are added.
    pub fn with_plugin(self, plugin: Arc<dyn Plugin>) -> Self {
        let mut plugins = (*self.plugins).clone();
        plugins.add(plugin);
        Self {
            plugins: Arc::new(plugins),
            ..self
        }
    }

    /// Replace the plugin chain.
    pub fn with_plugins(self, plugins: PluginAggregator) -> Self {
        Self {
            plugins: Arc::new(plugins),
            ..self
        }
    }

    /// Replace the progress sink.
    pub fn with_progress(self, progress: Arc<dyn ProgressCallback>) -> Self {
        Self { progress, ..self }
    }

    pub fn profile(&self) -> &NamingProfile {
        &self.profile
    }

    /// Generate every output container for one table.
    pub fn generate(&self, table: &TableModel) -> Result<Vec<OutputContainer>> {
        assembler::assemble(table, &self.profile, &self.plugins, self.progress.as_ref())
    }

    /// Generate many tables concurrently on the blocking pool, one task per
    /// table. Results come back in input order; a failure only affects its
    /// own table.
    pub async fn generate_all(&self, tables: Vec<TableModel>) -> Vec<Result<Vec<OutputContainer>>> {
        let handles: Vec<_> = tables
            .into_iter()
            .map(|table| {
                let generator = self.clone();
                tokio::task::spawn_blocking(move || generator.generate(&table))
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    log::error!("Table generation task failed: {}", e);
                    Err(GenError::WorkerFailed(e.to_string()))
                }
            };
            results.push(result);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Dialect;
    use crate::generators::ArtifactKind;
    use crate::model::ColumnModel;
    use crate::plugins::RecordingPlugin;
    use crate::traits::SilentProgress;

    fn orders() -> TableModel {
        TableModel::builder("orders", "Order")
            .packages("com.example.model", "com.example.mapper")
            .column(ColumnModel::new("id", "id", "INTEGER"))
            .column(ColumnModel::new("order_date", "orderDate", "DATE"))
            .primary_key("id")
            .build()
    }

    #[test]
    fn test_plugins_are_appended_in_order() {
        let first = Arc::new(RecordingPlugin::named("first"));
        let second = Arc::new(RecordingPlugin::named("second").veto(ArtifactKind::GeneralCount));
        let generator = MapperGenerator::new(NamingProfile::new(Dialect::DynamicSql))
            .with_progress(Arc::new(SilentProgress))
            .with_plugin(first.clone())
            .with_plugin(second.clone());

        let containers = generator.generate(&orders()).expect("generate");

        assert!(!containers[0].contains(ArtifactKind::GeneralCount));
        first.assert_hook_count("clientGeneralCountMethodGenerated", 1);
        second.assert_hook_count("clientGeneralCountMethodGenerated", 1);
    }

    #[test]
    fn test_clones_share_configuration() {
        let generator = MapperGenerator::from_json(r#"{ "dialect": "kotlin" }"#)
            .expect("profile")
            .with_progress(Arc::new(SilentProgress));
        let clone = generator.clone();

        assert_eq!(clone.profile(), generator.profile());
        assert_eq!(
            clone.generate(&orders()).expect("clone"),
            generator.generate(&orders()).expect("original")
        );
    }

    #[tokio::test]
    async fn test_generate_all_keeps_input_order() {
        let broken = TableModel::builder("broken", "Broken").build();
        let generator = MapperGenerator::new(NamingProfile::new(Dialect::XmlMapper))
            .with_progress(Arc::new(SilentProgress));

        let results = generator.generate_all(vec![orders(), broken, orders()]).await;

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(GenError::MalformedTable { .. })));
        assert!(results[2].is_ok());
    }
}
