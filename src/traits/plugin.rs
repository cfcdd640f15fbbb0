use crate::model::TableModel;
use crate::types::{CandidateArtifact, OutputContainer};

/// Trait for generation extensions.
/// Plugins are responsible for:
/// - Observing every candidate artifact before it is committed
/// - Mutating candidates and containers in place
/// - Vetoing artifacts or whole containers by returning `false`
///
/// The hook an artifact passes through is named by `candidate.kind().hook_name()`.
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    /// Called once per candidate artifact. Return `false` to discard it.
    fn artifact_generated(
        &self,
        _candidate: &mut CandidateArtifact,
        _container: &OutputContainer,
        _table: &TableModel,
    ) -> bool {
        true
    }

    /// Called once per non-empty container. Return `false` to discard it.
    fn container_generated(&self, _container: &mut OutputContainer, _table: &TableModel) -> bool {
        true
    }
}
