use crate::config::NamingProfile;
use crate::fragments::{FragmentGenerator, TableNames};
use crate::model::TableModel;
use crate::plugins::PluginAggregator;
use crate::traits::ProgressCallback;

/// Everything one table run needs.
/// Created fresh for each table and never shared across runs.
pub struct GenerationContext<'a> {
    table: &'a TableModel,
    profile: &'a NamingProfile,
    plugins: &'a PluginAggregator,
    progress: &'a dyn ProgressCallback,
    names: TableNames,
}

impl<'a> GenerationContext<'a> {
    pub fn new(
        table: &'a TableModel,
        profile: &'a NamingProfile,
        plugins: &'a PluginAggregator,
        progress: &'a dyn ProgressCallback,
    ) -> Self {
        Self {
            names: TableNames::new(table, profile),
            table,
            profile,
            plugins,
            progress,
        }
    }

    pub fn table(&self) -> &'a TableModel {
        self.table
    }

    pub fn profile(&self) -> &'a NamingProfile {
        self.profile
    }

    pub fn plugins(&self) -> &'a PluginAggregator {
        self.plugins
    }

    pub fn progress(&self) -> &'a dyn ProgressCallback {
        self.progress
    }

    pub fn names(&self) -> &TableNames {
        &self.names
    }

    /// A fragment generator bound to this run.
    pub fn fragments(&self) -> FragmentGenerator<'_> {
        FragmentGenerator::new(self.table, &self.names, self.profile.dialect)
    }
}
